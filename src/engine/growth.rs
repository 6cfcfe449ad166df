// ==========================================
// 蛋鸡舍排产优化系统 - 生长/产出模型
// ==========================================
// 输入: 批次 + 模拟日期
// 输出: (产出, 死淘)
// 规则:
// 1) age_weeks = floor(日龄 / 7)
// 2) 取周龄最接近的曲线采样点（等距取第一个）
// 3) 未达开产周龄: 产出率强制为 0, 死淘率照常
// 4) losses = round(population * loss_rate)
//    yield  = round(population * yield_rate)  （按扣减前数量计算）
// 无曲线时返回 0/0 并记录告警,不报错
// ==========================================

use crate::domain::batch::Batch;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

// ==========================================
// YieldOutcome - 单周期产出结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct YieldOutcome {
    pub yield_units: u64,
    pub losses: u32,
    pub curve_missing: bool,
}

// ==========================================
// GrowthModel - 生长/产出模型
// ==========================================
pub struct GrowthModel {
    // 纯函数模型，不需要注入依赖
}

impl GrowthModel {
    pub fn new() -> Self {
        Self {}
    }

    /// 计算批次在给定日期的产出与死淘（无副作用）
    pub fn evaluate(&self, batch: &Batch, date: NaiveDate) -> YieldOutcome {
        if batch.population == 0 {
            return YieldOutcome::default();
        }

        let curve = match batch.growth_curve.as_deref() {
            Some(curve) if !curve.is_empty() => curve,
            _ => {
                debug!(
                    batch_id = batch.batch_id,
                    curve_id = batch.curve_id,
                    "批次缺少生长曲线,产出与死淘按 0 计"
                );
                return YieldOutcome {
                    curve_missing: true,
                    ..YieldOutcome::default()
                };
            }
        };

        let age_weeks = (date - batch.birth_date).num_days().div_euclid(7);
        let Some(sample) = curve.closest_sample(age_weeks) else {
            return YieldOutcome::default();
        };

        let yield_rate = if age_weeks < i64::from(batch.production_age_weeks) {
            0.0
        } else {
            sample.yield_rate
        };

        let population = f64::from(batch.population);
        let losses = round_units(population * sample.loss_rate).min(u64::from(batch.population));
        let yield_units = round_units(population * yield_rate);

        YieldOutcome {
            yield_units,
            losses: losses as u32,
            curve_missing: false,
        }
    }
}

impl Default for GrowthModel {
    fn default() -> Self {
        Self::new()
    }
}

/// 四舍六入五成双,负值与非有限值按 0 计
fn round_units(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round_ties_even() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::growth_curve::{CurveSample, GrowthCurve};
    use std::sync::Arc;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn curve() -> Arc<GrowthCurve> {
        Arc::new(GrowthCurve::new(
            1,
            vec![
                CurveSample { age_weeks: 10, yield_rate: 0.0, loss_rate: 0.002 },
                CurveSample { age_weeks: 20, yield_rate: 0.50, loss_rate: 0.001 },
                CurveSample { age_weeks: 30, yield_rate: 0.90, loss_rate: 0.0005 },
            ],
        ))
    }

    fn batch_born(birth: NaiveDate, population: u32) -> Batch {
        Batch::new(1, 1, 1, population, birth, birth).with_growth_curve(Some(curve()))
    }

    #[test]
    fn test_yield_uses_pre_loss_population() {
        let birth = date(2023, 1, 1);
        let batch = batch_born(birth, 10_000);
        let outcome = GrowthModel::new().evaluate(&batch, birth + chrono::Duration::weeks(30));

        assert_eq!(outcome.losses, 5);
        assert_eq!(outcome.yield_units, 9_000);
        assert!(!outcome.curve_missing);
    }

    #[test]
    fn test_pre_production_age_has_losses_but_no_yield() {
        let birth = date(2023, 1, 1);
        let batch = batch_born(birth, 10_000);
        // 18 周 → 最近采样点 20 周,但未达 19 周开产
        let outcome = GrowthModel::new().evaluate(&batch, birth + chrono::Duration::weeks(18));

        assert_eq!(outcome.yield_units, 0);
        assert_eq!(outcome.losses, 10);
    }

    #[test]
    fn test_missing_curve_degrades_to_zero() {
        let birth = date(2023, 1, 1);
        let batch = Batch::new(1, 1, 77, 10_000, birth, birth);
        let outcome = GrowthModel::new().evaluate(&batch, birth + chrono::Duration::weeks(30));

        assert_eq!(outcome, YieldOutcome { yield_units: 0, losses: 0, curve_missing: true });
    }

    #[test]
    fn test_evaluate_has_no_side_effects() {
        let birth = date(2023, 1, 1);
        let batch = batch_born(birth, 10_000);
        let model = GrowthModel::new();
        let first = model.evaluate(&batch, birth + chrono::Duration::weeks(25));
        let second = model.evaluate(&batch, birth + chrono::Duration::weeks(25));

        assert_eq!(first, second);
        assert_eq!(batch.population, 10_000);
    }

    #[test]
    fn test_round_half_to_even() {
        assert_eq!(round_units(2.5), 2);
        assert_eq!(round_units(3.5), 4);
        assert_eq!(round_units(-1.0), 0);
    }
}
