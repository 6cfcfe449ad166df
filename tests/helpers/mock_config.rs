// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use layer_house_planner::config::{OptimizerConfig, OptimizerConfigReader};
use std::error::Error;

/// Mock 配置结构（直接返回内存中的配置）
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub config: OptimizerConfig,
}

impl MockConfig {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl OptimizerConfigReader for MockConfig {
    async fn get_buy_threshold(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.config.buy_threshold)
    }

    async fn get_buy_quantity(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.config.buy_quantity)
    }

    async fn get_buy_cooldown_periods(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.config.buy_cooldown_periods)
    }

    async fn get_default_breed_id(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
        Ok(self.config.default_breed_id)
    }

    async fn get_default_curve_id(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
        Ok(self.config.default_curve_id)
    }

    async fn get_sell_quantity(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.config.sell_quantity)
    }

    async fn get_disinfection_days(&self) -> Result<i64, Box<dyn Error + Send + Sync>> {
        Ok(self.config.disinfection_days)
    }

    async fn get_rearing_max_age_weeks(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.config.rearing_max_age_weeks)
    }

    async fn get_default_production_age_weeks(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.config.default_production_age_weeks)
    }

    async fn get_parallel_workers(&self) -> Result<usize, Box<dyn Error + Send + Sync>> {
        Ok(self.config.parallel_workers)
    }

    async fn get_max_horizon_periods(&self) -> Result<u32, Box<dyn Error + Send + Sync>> {
        Ok(self.config.max_horizon_periods)
    }

    async fn get_max_houses(&self) -> Result<usize, Box<dyn Error + Send + Sync>> {
        Ok(self.config.max_houses)
    }
}
