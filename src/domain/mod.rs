// ==========================================
// 蛋鸡舍排产优化系统 - 领域模型层
// ==========================================
// 职责: 定义鸡舍、批次、生长曲线与养殖场注册表
// 红线: 不含数据访问逻辑,不含搜索逻辑
// ==========================================

pub mod batch;
pub mod error;
pub mod farm;
pub mod growth_curve;
pub mod house;
pub mod records;
pub mod types;

// 重导出核心类型
pub use batch::Batch;
pub use error::{DomainError, DomainResult};
pub use farm::{Farm, PurchaseOrder};
pub use growth_curve::{CurveId, CurveSample, GrowthCurve, GrowthCurveCatalog};
pub use house::House;
pub use records::{BatchRecord, HouseRecord};
pub use types::{ActionCode, BatchId, HouseActivation, HouseId, HousePhase, Period};
