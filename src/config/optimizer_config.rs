// ==========================================
// 蛋鸡舍排产优化系统 - 优化器配置
// ==========================================
// 默认值与现场口径一致, 可由 config_kv 与请求参数覆写
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// OptimizerConfig - 优化器配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    // ===== 购入 =====
    pub buy_threshold: u32,          // 允许购入的最小鸡舍容量: 60000
    pub buy_quantity: u32,           // 每次购入数量: 60000
    pub buy_cooldown_periods: u32,   // 两次购入最小间隔: 14 个周期
    pub default_breed_id: i64,       // 购入品种: 1
    pub default_curve_id: i64,       // 购入批次生长曲线: 1

    // ===== 出售 =====
    pub sell_quantity: u32,          // 每周期出售数量: 2500

    // ===== 生命周期 =====
    pub disinfection_days: i64,           // 消毒周期: 30 天
    pub rearing_max_age_weeks: u32,       // 育成舍最大周龄（初始化校正）: 19
    pub default_production_age_weeks: u32, // 开产周龄: 19

    // ===== 运行边界 =====
    pub parallel_workers: usize,     // 候选并行评估线程数（<=1 串行）
    pub max_horizon_periods: u32,    // 最大规划周期: 120
    pub max_houses: usize,           // 最大鸡舍数量: 12
}

impl OptimizerConfig {
    pub const DEFAULT: OptimizerConfig = OptimizerConfig {
        buy_threshold: 60_000,
        buy_quantity: 60_000,
        buy_cooldown_periods: 14,
        default_breed_id: 1,
        default_curve_id: 1,
        sell_quantity: 2_500,
        disinfection_days: 30,
        rearing_max_age_weeks: 19,
        default_production_age_weeks: 19,
        parallel_workers: 1,
        max_horizon_periods: 120,
        max_houses: 12,
    };
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
