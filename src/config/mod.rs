// ==========================================
// 蛋鸡舍排产优化系统 - 配置层
// ==========================================
// 职责: 优化器参数管理,支持 config_kv 覆写
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod config_reader_trait;
pub mod optimizer_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use config_reader_trait::OptimizerConfigReader;
pub use optimizer_config::OptimizerConfig;
