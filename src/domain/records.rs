// ==========================================
// 蛋鸡舍排产优化系统 - 外部输入记录
// ==========================================
// 由数据访问层提供,初始化时转换为 House / Batch
// ==========================================

use crate::domain::growth_curve::CurveId;
use crate::domain::types::{BatchId, HouseId, HousePhase};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 鸡舍记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HouseRecord {
    pub house_id: HouseId,
    pub name: Option<String>,
    pub capacity: u32,
    pub phase: HousePhase,
    pub needs_disinfection: bool,
}

/// 批次记录
///
/// birth_date 为 None 表示源数据无法解析出生日期
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: BatchId,
    pub name: Option<String>,
    pub breed_id: i64,
    pub curve_id: CurveId,
    pub population: u32,
    pub birth_date: Option<NaiveDate>,
    pub house_id: Option<HouseId>,
    pub production_age_weeks: Option<u32>,
}
