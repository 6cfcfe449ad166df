// ==========================================
// 蛋鸡舍排产优化系统 - 批次领域模型
// ==========================================
// 红线: house_id 非空 ⇔ 对应鸡舍 occupant == batch_id
// 红线: population >= 0, 归零时由 Farm 腾空其鸡舍
// ==========================================

use crate::domain::growth_curve::{CurveId, GrowthCurve};
use crate::domain::types::{BatchId, HouseId, HousePhase};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// 默认开产周龄
pub const DEFAULT_PRODUCTION_AGE_WEEKS: u32 = 19;

// ==========================================
// Batch - 鸡群批次
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Batch {
    // ===== 标识 =====
    pub batch_id: BatchId,
    pub name: Option<String>,
    pub breed_id: i64,
    pub curve_id: CurveId,

    // ===== 数量 =====
    pub population: u32,

    // ===== 时间 =====
    pub birth_date: NaiveDate,
    pub production_age_weeks: u32, // 育成 → 产蛋 的周龄阈值
    pub as_of_date: NaiveDate,
    pub age_days: i64,
    pub age_weeks: i64,

    // ===== 空间 =====
    pub phase: HousePhase,
    pub house_id: Option<HouseId>,

    // ===== 出售 =====
    pub is_being_liquidated: bool,

    // ===== 最近一次动态结果 =====
    pub last_yield: u64,
    pub last_losses: u32,

    // ===== 生长曲线（分支间共享,只读） =====
    #[serde(skip)]
    pub growth_curve: Option<Arc<GrowthCurve>>,
}

impl Batch {
    /// 创建未分配的批次
    pub fn new(
        batch_id: BatchId,
        breed_id: i64,
        curve_id: CurveId,
        population: u32,
        birth_date: NaiveDate,
        as_of_date: NaiveDate,
    ) -> Self {
        let mut batch = Self {
            batch_id,
            name: None,
            breed_id,
            curve_id,
            population,
            birth_date,
            production_age_weeks: DEFAULT_PRODUCTION_AGE_WEEKS,
            as_of_date,
            age_days: 0,
            age_weeks: 0,
            phase: HousePhase::Unassigned,
            house_id: None,
            is_being_liquidated: false,
            last_yield: 0,
            last_losses: 0,
            growth_curve: None,
        };
        batch.set_date(as_of_date);
        batch
    }

    pub fn with_growth_curve(mut self, curve: Option<Arc<GrowthCurve>>) -> Self {
        self.growth_curve = curve;
        self
    }

    /// 设置模拟日期并重算日龄/周龄
    pub fn set_date(&mut self, date: NaiveDate) {
        self.as_of_date = date;
        self.age_days = (date - self.birth_date).num_days();
        self.age_weeks = self.age_days.div_euclid(7);
    }

    /// 是否已达开产周龄
    pub fn is_production_age(&self) -> bool {
        self.age_weeks >= i64::from(self.production_age_weeks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_age_weeks_is_floored() {
        let mut batch = Batch::new(1, 1, 1, 1000, date(2024, 1, 1), date(2024, 1, 1));
        assert_eq!(batch.age_weeks, 0);

        batch.set_date(date(2024, 1, 14));
        assert_eq!(batch.age_days, 13);
        assert_eq!(batch.age_weeks, 1);

        batch.set_date(date(2024, 1, 15));
        assert_eq!(batch.age_weeks, 2);
    }

    #[test]
    fn test_set_date_is_idempotent() {
        let mut batch = Batch::new(1, 1, 1, 1000, date(2023, 6, 1), date(2024, 1, 1));
        batch.set_date(date(2024, 2, 1));
        let first = (batch.age_days, batch.age_weeks, batch.phase);
        batch.set_date(date(2024, 2, 1));
        assert_eq!(first, (batch.age_days, batch.age_weeks, batch.phase));
    }

    #[test]
    fn test_production_age_threshold() {
        let birth = date(2024, 1, 1);
        let batch = Batch::new(1, 1, 1, 1000, birth, birth + chrono::Duration::weeks(19));
        assert!(batch.is_production_age());

        let younger = Batch::new(2, 1, 1, 1000, birth, birth + chrono::Duration::days(19 * 7 - 1));
        assert!(!younger.is_production_age());
    }
}
