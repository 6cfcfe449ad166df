// ==========================================
// 蛋鸡舍排产优化系统 - 优化器配置读取 Trait
// ==========================================
// 职责: 定义优化器所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::optimizer_config::OptimizerConfig;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// OptimizerConfigReader Trait
// ==========================================
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait OptimizerConfigReader: Send + Sync {
    // ===== 购入配置 =====

    /// 允许购入的最小鸡舍容量（默认 60000）
    async fn get_buy_threshold(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 每次购入数量（默认 60000）
    async fn get_buy_quantity(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 两次购入的最小间隔周期（默认 14）
    async fn get_buy_cooldown_periods(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 购入品种（默认 1）
    async fn get_default_breed_id(&self) -> Result<i64, Box<dyn Error + Send + Sync>>;

    /// 购入批次生长曲线（默认 1）
    async fn get_default_curve_id(&self) -> Result<i64, Box<dyn Error + Send + Sync>>;

    // ===== 出售配置 =====

    /// 每周期出售数量（默认 2500）
    async fn get_sell_quantity(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    // ===== 生命周期配置 =====

    /// 消毒周期天数（默认 30）
    async fn get_disinfection_days(&self) -> Result<i64, Box<dyn Error + Send + Sync>>;

    /// 育成舍最大周龄（默认 19）
    async fn get_rearing_max_age_weeks(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 开产周龄（默认 19）
    async fn get_default_production_age_weeks(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    // ===== 运行配置 =====

    /// 并行评估线程数（默认 1）
    async fn get_parallel_workers(&self) -> Result<usize, Box<dyn Error + Send + Sync>>;

    /// 最大规划周期（默认 120）
    async fn get_max_horizon_periods(&self) -> Result<u32, Box<dyn Error + Send + Sync>>;

    /// 最大鸡舍数量（默认 12）
    async fn get_max_houses(&self) -> Result<usize, Box<dyn Error + Send + Sync>>;

    /// 汇总为完整配置
    async fn load_optimizer_config(&self) -> Result<OptimizerConfig, Box<dyn Error + Send + Sync>> {
        Ok(OptimizerConfig {
            buy_threshold: self.get_buy_threshold().await?,
            buy_quantity: self.get_buy_quantity().await?,
            buy_cooldown_periods: self.get_buy_cooldown_periods().await?,
            default_breed_id: self.get_default_breed_id().await?,
            default_curve_id: self.get_default_curve_id().await?,
            sell_quantity: self.get_sell_quantity().await?,
            disinfection_days: self.get_disinfection_days().await?,
            rearing_max_age_weeks: self.get_rearing_max_age_weeks().await?,
            default_production_age_weeks: self.get_default_production_age_weeks().await?,
            parallel_workers: self.get_parallel_workers().await?,
            max_horizon_periods: self.get_max_horizon_periods().await?,
            max_houses: self.get_max_houses().await?,
        })
    }
}
