// ==========================================
// 蛋鸡舍排产优化系统 - 引擎层
// ==========================================
// 职责: 初始化校正、生长模型、状态生成、转移评估、DP 搜索、最优解回溯
// 红线: 引擎不拼 SQL, 输入只来自领域对象与配置
// ==========================================

pub mod error;
pub mod growth;
pub mod initializer;
pub mod search;
pub mod solution;
pub mod state_generator;
pub mod transition;

// 重导出核心引擎
pub use error::{EngineError, EngineResult};
pub use growth::{GrowthModel, YieldOutcome};
pub use initializer::FarmInitializer;
pub use search::{period_date, DpEntry, DpLayer, DpTable, SearchDriver};
pub use solution::{ActionRecord, OptimalPlan, SolutionExtractor};
pub use state_generator::{HouseDecision, StateGenerator, SystemState};
pub use transition::TransitionEvaluator;
