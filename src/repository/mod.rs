// ==========================================
// 蛋鸡舍排产优化系统 - 数据仓储层
// ==========================================
// 职责: 读取鸡舍、批次、生长曲线的初始记录
// 约束: 所有查询使用参数化,防止 SQL 注入
// 红线: Repository 不含业务逻辑
// ==========================================

pub mod batch_repo;
pub mod error;
pub mod growth_curve_repo;
pub mod house_repo;

// 重导出核心仓储
pub use batch_repo::BatchRepository;
pub use error::{RepositoryError, RepositoryResult};
pub use growth_curve_repo::GrowthCurveRepository;
pub use house_repo::HouseRepository;
