// ==========================================
// 蛋鸡舍排产优化系统 - 批次数据仓储
// ==========================================
// 表: batch
// birth_date 以 YYYY-MM-DD 文本存储,无法解析时返回 None
// （由初始化阶段判定为验证错误）
// 红线: Repository 不含业务逻辑
// ==========================================

use crate::domain::records::BatchRecord;
use crate::domain::types::BatchId;
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::sync::{Arc, Mutex};
use tracing::warn;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ==========================================
// BatchRepository - 批次仓储
// ==========================================
pub struct BatchRepository {
    conn: Arc<Mutex<Connection>>,
}

impl BatchRepository {
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

    /// 写入或覆盖批次
    pub fn upsert(&self, record: &BatchRecord) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO batch (
                batch_id, name, breed_id, curve_id, population,
                birth_date, house_id, production_age_weeks
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, COALESCE(?8, 19))
            ON CONFLICT(batch_id) DO UPDATE SET
                name = excluded.name,
                breed_id = excluded.breed_id,
                curve_id = excluded.curve_id,
                population = excluded.population,
                birth_date = excluded.birth_date,
                house_id = excluded.house_id,
                production_age_weeks = excluded.production_age_weeks
            "#,
            params![
                record.batch_id,
                record.name,
                record.breed_id,
                record.curve_id,
                record.population,
                record.birth_date.map(|d| d.format(DATE_FORMAT).to_string()),
                record.house_id,
                record.production_age_weeks,
            ],
        )?;
        Ok(())
    }

    /// 按ID列表查询（按 batch_id 升序,不存在的ID被忽略）
    pub fn find_by_ids(&self, batch_ids: &[BatchId]) -> RepositoryResult<Vec<BatchRecord>> {
        if batch_ids.is_empty() {
            return Ok(Vec::new());
        }
        let conn = self.get_conn()?;
        let placeholders = vec!["?"; batch_ids.len()].join(", ");
        let sql = format!(
            r#"
            SELECT batch_id, name, breed_id, curve_id, population,
                   birth_date, house_id, production_age_weeks
            FROM batch
            WHERE batch_id IN ({})
            ORDER BY batch_id
            "#,
            placeholders
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(batch_ids.iter()), map_batch_row)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }
}

fn map_batch_row(row: &Row<'_>) -> rusqlite::Result<BatchRecord> {
    let batch_id: BatchId = row.get(0)?;
    let raw_birth: Option<String> = row.get(5)?;
    let birth_date = raw_birth.as_deref().and_then(|s| {
        let parsed = NaiveDate::parse_from_str(s.trim(), DATE_FORMAT).ok();
        if parsed.is_none() {
            warn!(batch_id, birth_date = s, "出生日期无法解析");
        }
        parsed
    });

    Ok(BatchRecord {
        batch_id,
        name: row.get(1)?,
        breed_id: row.get(2)?,
        curve_id: row.get(3)?,
        population: row.get(4)?,
        birth_date,
        house_id: row.get(6)?,
        production_age_weeks: row.get(7)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> BatchRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        BatchRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_upsert_round_trips_dates() {
        let repo = repo();
        let record = BatchRecord {
            batch_id: 7,
            name: Some("B7".to_string()),
            breed_id: 1,
            curve_id: 3,
            population: 45_000,
            birth_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            house_id: Some(2),
            production_age_weeks: None,
        };
        repo.upsert(&record).unwrap();

        let loaded = repo.find_by_ids(&[7]).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].birth_date, record.birth_date);
        assert_eq!(loaded[0].house_id, Some(2));
        assert_eq!(loaded[0].production_age_weeks, Some(19));
    }

    #[test]
    fn test_unparseable_birth_date_is_none() {
        let repo = repo();
        {
            let conn = repo.get_conn().unwrap();
            conn.execute(
                "INSERT INTO batch (batch_id, breed_id, curve_id, population, birth_date) VALUES (1, 1, 1, 100, 'not-a-date')",
                [],
            )
            .unwrap();
        }
        let loaded = repo.find_by_ids(&[1]).unwrap();
        assert_eq!(loaded[0].birth_date, None);
        assert_eq!(loaded[0].house_id, None);
    }
}
