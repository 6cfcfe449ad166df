// ==========================================
// 蛋鸡舍排产优化系统 - 核心库
// ==========================================
// 技术栈: Rust + SQLite
// 系统定位: 鸡舍/批次分配的多周期产出优化（显式状态 DP）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 鸡舍、批次、生长曲线、养殖场注册表
pub mod domain;

// 数据仓储层 - 初始记录读取
pub mod repository;

// 引擎层 - 初始化、生长模型、状态生成、搜索、回溯
pub mod engine;

// 配置层 - 优化器参数
pub mod config;

// 数据库基础设施（连接初始化/建表）
pub mod db;

// 日志系统
pub mod logging;

// API 层 - 优化请求入口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{ActionCode, BatchId, HouseActivation, HouseId, HousePhase, Period};

// 领域实体
pub use domain::{Batch, BatchRecord, Farm, GrowthCurve, GrowthCurveCatalog, House, HouseRecord};

// 引擎
pub use engine::{
    ActionRecord, EngineError, FarmInitializer, GrowthModel, OptimalPlan, SearchDriver,
    SolutionExtractor, StateGenerator, SystemState, TransitionEvaluator,
};

// 配置
pub use config::{ConfigManager, OptimizerConfig};

// API
pub use api::{OptimizationRequest, OptimizationResponse, PlanningApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "蛋鸡舍排产优化系统";
