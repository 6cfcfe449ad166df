// ==========================================
// 蛋鸡舍排产优化系统 - 生长曲线仓储
// ==========================================
// 表: growth_curve_sample
// yield_pct 为百分比（读取时转换为比例）, loss_rate 为比例
// ==========================================

use crate::domain::growth_curve::{CurveId, CurveSample, GrowthCurve, GrowthCurveCatalog};
use crate::repository::error::{RepositoryError, RepositoryResult};
use rusqlite::{params, Connection};
use std::collections::BTreeSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

pub struct GrowthCurveRepository {
    conn: Arc<Mutex<Connection>>,
}

impl GrowthCurveRepository {
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

    /// 写入单个采样点（yield 以百分比存储）
    pub fn upsert_sample(&self, curve_id: CurveId, sample: &CurveSample) -> RepositoryResult<()> {
        let conn = self.get_conn()?;
        conn.execute(
            r#"
            INSERT INTO growth_curve_sample (curve_id, age_weeks, yield_pct, loss_rate)
            VALUES (?1, ?2, ?3, ?4)
            ON CONFLICT(curve_id, age_weeks) DO UPDATE SET
                yield_pct = excluded.yield_pct,
                loss_rate = excluded.loss_rate
            "#,
            params![curve_id, sample.age_weeks, sample.yield_rate * 100.0, sample.loss_rate],
        )?;
        Ok(())
    }

    /// 查询单条曲线（按周龄升序）
    ///
    /// # 返回
    /// - Ok(None): 该曲线没有采样点
    pub fn find_curve(&self, curve_id: CurveId) -> RepositoryResult<Option<GrowthCurve>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT age_weeks, yield_pct, loss_rate
            FROM growth_curve_sample
            WHERE curve_id = ?1
            ORDER BY age_weeks
            "#,
        )?;
        let samples = stmt
            .query_map(params![curve_id], |row| {
                let yield_pct: f64 = row.get(1)?;
                Ok(CurveSample {
                    age_weeks: row.get(0)?,
                    yield_rate: yield_pct / 100.0,
                    loss_rate: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if samples.is_empty() {
            return Ok(None);
        }
        Ok(Some(GrowthCurve::new(curve_id, samples)))
    }

    /// 加载曲线目录（缺失的曲线记录告警后跳过）
    pub fn load_catalog(&self, curve_ids: &[CurveId]) -> RepositoryResult<GrowthCurveCatalog> {
        let mut catalog = GrowthCurveCatalog::new();
        let unique: BTreeSet<CurveId> = curve_ids.iter().copied().collect();
        for curve_id in unique {
            match self.find_curve(curve_id)? {
                Some(curve) => {
                    debug!(curve_id, samples = curve.samples().len(), "加载生长曲线");
                    catalog.insert(curve);
                }
                None => warn!(curve_id, "生长曲线不存在"),
            }
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> GrowthCurveRepository {
        let conn = Connection::open_in_memory().unwrap();
        crate::db::ensure_schema(&conn).unwrap();
        GrowthCurveRepository::from_connection(Arc::new(Mutex::new(conn)))
    }

    #[test]
    fn test_yield_percent_is_converted_to_fraction() {
        let repo = repo();
        repo.upsert_sample(1, &CurveSample { age_weeks: 30, yield_rate: 0.925, loss_rate: 0.001 })
            .unwrap();
        repo.upsert_sample(1, &CurveSample { age_weeks: 20, yield_rate: 0.5, loss_rate: 0.002 })
            .unwrap();

        let curve = repo.find_curve(1).unwrap().unwrap();
        let ages: Vec<_> = curve.samples().iter().map(|s| s.age_weeks).collect();
        assert_eq!(ages, vec![20, 30]);
        assert!((curve.samples()[1].yield_rate - 0.925).abs() < 1e-9);
    }

    #[test]
    fn test_load_catalog_skips_missing_curves() {
        let repo = repo();
        repo.upsert_sample(2, &CurveSample { age_weeks: 20, yield_rate: 0.5, loss_rate: 0.0 })
            .unwrap();

        let catalog = repo.load_catalog(&[2, 2, 9]).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get(2).is_some());
        assert!(catalog.get(9).is_none());
    }
}
