// ==========================================
// 蛋鸡舍排产优化系统 - 演示数据库初始化
// ==========================================
// 用法: seed_demo_db [db_path]
// 写入: 4 个鸡舍、3 个批次、1 条生长曲线,并打印示例请求
// ==========================================

use std::error::Error;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Local};
use serde_json::json;

use layer_house_planner::db::{ensure_schema, get_default_db_path, open_sqlite_connection};
use layer_house_planner::domain::{BatchRecord, CurveSample, HousePhase, HouseRecord};
use layer_house_planner::repository::{BatchRepository, GrowthCurveRepository, HouseRepository};

const DEMO_CURVE_ID: i64 = 1;

fn main() -> Result<(), Box<dyn Error>> {
    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;
    conn.execute_batch("DELETE FROM house; DELETE FROM batch; DELETE FROM growth_curve_sample;")?;
    let conn = Arc::new(Mutex::new(conn));

    let houses = HouseRepository::from_connection(conn.clone());
    let batches = BatchRepository::from_connection(conn.clone());
    let curves = GrowthCurveRepository::from_connection(conn);

    // 鸡舍
    let house_plan = [
        (1, "育成一号", 60_000, HousePhase::Rearing),
        (2, "产蛋一号", 55_000, HousePhase::Production),
        (3, "产蛋二号", 55_000, HousePhase::Production),
        (4, "淘汰前一号", 50_000, HousePhase::PreCull),
    ];
    for (house_id, name, capacity, phase) in house_plan {
        houses.upsert(&HouseRecord {
            house_id,
            name: Some(name.to_string()),
            capacity,
            phase,
            needs_disinfection: false,
        })?;
    }

    // 批次（按今天倒推出生日期）
    let today = Local::now().date_naive();
    let batch_plan = [
        (101, 52_000, 17, Some(1)),
        (102, 50_000, 45, Some(2)),
        (103, 42_000, 80, Some(4)),
    ];
    for (batch_id, population, age_weeks, house_id) in batch_plan {
        batches.upsert(&BatchRecord {
            batch_id,
            name: Some(format!("批次{}", batch_id)),
            breed_id: 1,
            curve_id: DEMO_CURVE_ID,
            population,
            birth_date: Some(today - Duration::weeks(age_weeks)),
            house_id,
            production_age_weeks: None,
        })?;
    }

    // 生长曲线: 19 周开产, 28 周达峰, 之后缓慢下降
    for age_weeks in 0..=100u32 {
        let yield_rate = match age_weeks {
            0..=18 => 0.0,
            19..=27 => 0.10 + 0.10 * f64::from(age_weeks - 19),
            28..=60 => 0.93,
            _ => (0.93 - 0.006 * f64::from(age_weeks - 60)).max(0.5),
        };
        let loss_rate = if age_weeks < 19 { 0.0015 } else { 0.0008 };
        curves.upsert_sample(
            DEMO_CURVE_ID,
            &CurveSample {
                age_weeks,
                yield_rate,
                loss_rate,
            },
        )?;
    }

    let request = json!({
        "house_ids": [1, 2, 3, 4],
        "batch_ids": [101, 102, 103],
        "projection_time": 5,
        "initial_date": today.format("%Y-%m-%d").to_string(),
    });

    println!("演示数据已写入: {}", db_path);
    println!("示例请求:");
    println!("{}", serde_json::to_string_pretty(&request)?);
    Ok(())
}
