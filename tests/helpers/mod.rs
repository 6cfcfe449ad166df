// ==========================================
// 集成测试辅助模块
// ==========================================
#![allow(dead_code)]

pub mod farm_builder;
pub mod mock_config;
