// ==========================================
// 蛋鸡舍排产优化系统 - SQLite 基础设施
// ==========================================
// 职责: 打开连接（统一 busy_timeout）、默认库路径、建表
// 红线: 仓储与配置管理器共用同一连接时只在此处设置连接参数
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 连接被占用时的等待上限（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

/// 应用连接参数（每个连接单独生效）
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))
}

pub fn open_sqlite_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}

/// 默认数据库路径
///
/// 优先读取环境变量 LAYER_HOUSE_PLANNER_DB_PATH,
/// 否则使用用户数据目录下的 layer-house-planner/planner.db
pub fn get_default_db_path() -> String {
    if let Ok(path) = std::env::var("LAYER_HOUSE_PLANNER_DB_PATH") {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }

    let mut path = PathBuf::from("./planner.db");
    if let Some(data_dir) = dirs::data_dir() {
        let dir = data_dir.join("layer-house-planner");
        // 目录创建失败时回退到当前目录
        if std::fs::create_dir_all(&dir).is_ok() {
            path = dir.join("planner.db");
        }
    }
    path.to_string_lossy().to_string()
}

/// 建表（幂等）
///
/// - house: 鸡舍, 三个阶段标志位 0/1
/// - batch: 批次, birth_date 为 YYYY-MM-DD 文本
/// - growth_curve_sample: 生长曲线, yield_pct 为百分比, loss_rate 为比例
/// - config_kv: 配置键值
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS house (
            house_id INTEGER PRIMARY KEY,
            name TEXT,
            capacity INTEGER NOT NULL,
            rearing_flag INTEGER NOT NULL DEFAULT 0,
            production_flag INTEGER NOT NULL DEFAULT 0,
            pre_cull_flag INTEGER NOT NULL DEFAULT 0,
            needs_disinfection INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS batch (
            batch_id INTEGER PRIMARY KEY,
            name TEXT,
            breed_id INTEGER NOT NULL,
            curve_id INTEGER NOT NULL,
            population INTEGER NOT NULL,
            birth_date TEXT,
            house_id INTEGER,
            production_age_weeks INTEGER NOT NULL DEFAULT 19
        );

        CREATE TABLE IF NOT EXISTS growth_curve_sample (
            curve_id INTEGER NOT NULL,
            age_weeks INTEGER NOT NULL,
            yield_pct REAL NOT NULL,
            loss_rate REAL NOT NULL,
            PRIMARY KEY (curve_id, age_weeks)
        );

        CREATE TABLE IF NOT EXISTS config_kv (
            scope_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            PRIMARY KEY (scope_id, key)
        );
        "#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        configure_sqlite_connection(&conn).unwrap();
        ensure_schema(&conn).unwrap();
        ensure_schema(&conn).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name IN ('house','batch','growth_curve_sample','config_kv')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 4);
    }

    #[test]
    fn test_default_db_path_ends_with_db_file() {
        let path = get_default_db_path();
        assert!(path.ends_with(".db"));
    }
}
