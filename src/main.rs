// ==========================================
// 蛋鸡舍排产优化系统 - 命令行入口
// ==========================================
// 用法: layer-house-planner [db_path] <request.json>
// 输出: 优化响应 JSON（stdout）
// ==========================================

use std::sync::{Arc, Mutex};

use anyhow::{bail, Context, Result};
use layer_house_planner::config::{ConfigManager, OptimizerConfigReader};
use layer_house_planner::db::{ensure_schema, get_default_db_path, open_sqlite_connection};
use layer_house_planner::{logging, OptimizationRequest, PlanningApi};

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (db_path, request_path) = match args.as_slice() {
        [request] => (get_default_db_path(), request.clone()),
        [db, request] => (db.clone(), request.clone()),
        _ => bail!("用法: layer-house-planner [db_path] <request.json>"),
    };

    tracing::info!("==================================================");
    tracing::info!("{} v{}", layer_house_planner::APP_NAME, layer_house_planner::VERSION);
    tracing::info!("使用数据库: {}", db_path);
    tracing::info!("==================================================");

    let raw = tokio::fs::read_to_string(&request_path)
        .await
        .with_context(|| format!("无法读取请求文件: {}", request_path))?;
    let request: OptimizationRequest =
        serde_json::from_str(&raw).with_context(|| format!("请求文件格式错误: {}", request_path))?;

    let conn = open_sqlite_connection(&db_path).with_context(|| format!("无法打开数据库: {}", db_path))?;
    ensure_schema(&conn)?;
    let conn = Arc::new(Mutex::new(conn));

    // 配置: config_kv 覆写默认值
    let config_manager = ConfigManager::from_connection(conn.clone()).map_err(|e| anyhow::anyhow!(e))?;
    let config = config_manager
        .load_optimizer_config()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    let snapshot = config_manager
        .get_config_snapshot()
        .await
        .map_err(|e| anyhow::anyhow!(e))?;
    tracing::info!(config = %snapshot, "生效配置");

    let api = PlanningApi::from_connection(conn, config);

    // 搜索为纯计算,放到阻塞线程
    let response = tokio::task::spawn_blocking(move || api.optimize(&request))
        .await
        .context("优化任务异常退出")??;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
