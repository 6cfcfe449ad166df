// ==========================================
// 蛋鸡舍排产优化系统 - API 层
// ==========================================
// 职责: 接收优化请求,组织仓储与引擎,输出动作序列与结果表
// ==========================================

pub mod dto;
pub mod error;
pub mod planning_api;

// 重导出核心类型
pub use dto::{OptimizationRequest, OptimizationResponse, SolutionRow};
pub use error::{ApiError, ApiResult};
pub use planning_api::{build_solution_table, PlanningApi};
