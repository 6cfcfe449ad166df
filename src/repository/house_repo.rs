// ==========================================
// 蛋鸡舍排产优化系统 - 鸡舍数据仓储
// ==========================================
// 表: house
// 阶段由三个 0/1 标志位推导（淘汰前 > 产蛋 > 育雏育成）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::records::HouseRecord;
use crate::domain::types::{HouseId, HousePhase};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::{Arc, Mutex};

// ==========================================
// HouseRepository - 鸡舍仓储
// ==========================================
pub struct HouseRepository {
    conn: Arc<Mutex<Connection>>,
}

impl HouseRepository {
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = crate::db::open_sqlite_connection(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Self {
        Self { conn }
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入或覆盖鸡舍
    pub fn upsert(&self, record: &HouseRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        let (rearing, production, pre_cull) = phase_flags(record.phase);
        conn.execute(
            r#"
            INSERT INTO house (
                house_id, name, capacity,
                rearing_flag, production_flag, pre_cull_flag,
                needs_disinfection
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(house_id) DO UPDATE SET
                name = excluded.name,
                capacity = excluded.capacity,
                rearing_flag = excluded.rearing_flag,
                production_flag = excluded.production_flag,
                pre_cull_flag = excluded.pre_cull_flag,
                needs_disinfection = excluded.needs_disinfection
            "#,
            params![
                record.house_id,
                record.name,
                record.capacity,
                rearing,
                production,
                pre_cull,
                record.needs_disinfection as i32,
            ],
        )?;
        Ok(())
    }

    /// 按ID列表查询（按 house_id 升序,不存在的ID被忽略）
    pub fn find_by_ids(&self, house_ids: &[HouseId]) -> RepositoryResult<Vec<HouseRecord>> {
        if house_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.get_conn()?;
        let placeholders = vec!["?"; house_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT house_id, name, capacity,
                   rearing_flag, production_flag, pre_cull_flag,
                   needs_disinfection
            FROM house
            WHERE house_id IN ({})
            ORDER BY house_id
            "#,
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(house_ids.iter()), map_house_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// 全部鸡舍
    pub fn list_all(&self) -> RepositoryResult<Vec<HouseRecord>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT house_id, name, capacity,
                   rearing_flag, production_flag, pre_cull_flag,
                   needs_disinfection
            FROM house
            ORDER BY house_id
            "#,
        )?;
        let rows = stmt.query_map([], map_house_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn map_house_row(row: &Row<'_>) -> rusqlite::Result<HouseRecord> {
    let rearing: i64 = row.get(3)?;
    let production: i64 = row.get(4)?;
    let pre_cull: i64 = row.get(5)?;
    let needs_disinfection: i64 = row.get(6)?;
    Ok(HouseRecord {
        house_id: row.get(0)?,
        name: row.get(1)?,
        capacity: row.get(2)?,
        phase: HousePhase::from_flags(rearing != 0, production != 0, pre_cull != 0),
        needs_disinfection: needs_disinfection != 0,
    })
}

fn phase_flags(phase: HousePhase) -> (i32, i32, i32) {
    match phase {
        HousePhase::Rearing => (1, 0, 0),
        HousePhase::Production => (0, 1, 0),
        HousePhase::PreCull => (0, 0, 1),
        HousePhase::Unassigned => (0, 0, 0),
    }
}
