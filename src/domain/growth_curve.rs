// ==========================================
// 蛋鸡舍排产优化系统 - 生长曲线领域模型
// ==========================================
// 曲线按周龄升序排列: (age_weeks, yield_rate, loss_rate)
// yield_rate / loss_rate 均为比例 (0.0 - 1.0)
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// 曲线ID（品种/来源标准）
pub type CurveId = i64;

// ==========================================
// CurveSample - 曲线采样点
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveSample {
    pub age_weeks: u32,  // 周龄
    pub yield_rate: f64, // 产蛋率
    pub loss_rate: f64,  // 死淘率
}

// ==========================================
// GrowthCurve - 生长曲线
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthCurve {
    pub curve_id: CurveId,
    samples: Vec<CurveSample>,
}

impl GrowthCurve {
    /// 创建曲线（按周龄稳定排序）
    pub fn new(curve_id: CurveId, mut samples: Vec<CurveSample>) -> Self {
        samples.sort_by_key(|s| s.age_weeks);
        Self { curve_id, samples }
    }

    pub fn samples(&self) -> &[CurveSample] {
        &self.samples
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// 查找与给定周龄最接近的采样点
    ///
    /// 距离相同时取曲线顺序中的第一个
    pub fn closest_sample(&self, age_weeks: i64) -> Option<&CurveSample> {
        self.samples
            .iter()
            .min_by_key(|s| (i64::from(s.age_weeks) - age_weeks).abs())
    }
}

// ==========================================
// GrowthCurveCatalog - 曲线目录
// ==========================================
// 搜索分支之间共享只读曲线
#[derive(Debug, Clone, Default)]
pub struct GrowthCurveCatalog {
    curves: BTreeMap<CurveId, Arc<GrowthCurve>>,
}

impl GrowthCurveCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, curve: GrowthCurve) {
        self.curves.insert(curve.curve_id, Arc::new(curve));
    }

    pub fn get(&self, curve_id: CurveId) -> Option<Arc<GrowthCurve>> {
        self.curves.get(&curve_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}

impl FromIterator<GrowthCurve> for GrowthCurveCatalog {
    fn from_iter<I: IntoIterator<Item = GrowthCurve>>(iter: I) -> Self {
        let mut catalog = Self::new();
        for curve in iter {
            catalog.insert(curve);
        }
        catalog
    }
}
