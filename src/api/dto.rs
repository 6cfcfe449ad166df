// ==========================================
// 蛋鸡舍排产优化系统 - 请求/响应 DTO
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::types::{ActionCode, BatchId, HouseId, HousePhase, Period};
use crate::engine::solution::ActionRecord;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==========================================
// OptimizationRequest - 优化请求
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationRequest {
    pub house_ids: Vec<HouseId>,
    #[serde(default)]
    pub batch_ids: Vec<BatchId>,
    pub projection_time: Period, // 规划周期数
    pub initial_date: NaiveDate,

    // ===== 购入参数（缺省取配置） =====
    #[serde(default)]
    pub breed_id: Option<i64>,
    #[serde(default)]
    pub curve_id: Option<i64>,
    #[serde(default)]
    pub buy_quantity: Option<u32>,
}

// ==========================================
// SolutionRow - 结果表行
// ==========================================
// 每个周期每个鸡舍一行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRow {
    pub period: Period,
    pub date: NaiveDate,
    pub house_id: HouseId,
    pub house_phase: HousePhase,
    pub batch_id: Option<BatchId>,
    pub age_days: Option<i64>,
    pub age_weeks: Option<i64>,
    pub action: ActionCode,
    pub population_before: u32,
    pub losses: u32,
    pub population_after: u32,
    pub yield_units: u64,
    pub transferred_from: Option<HouseId>, // 本周期由其他鸡舍转入
}

// ==========================================
// OptimizationResponse - 优化响应
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResponse {
    pub run_id: Uuid,
    pub max_value: u64,
    pub actions: Vec<ActionRecord>,
    pub table: Vec<SolutionRow>,
    pub config_snapshot: OptimizerConfig, // 本次运行生效的配置（含请求覆写）
}
