// ==========================================
// 蛋鸡舍排产优化系统 - 引擎层错误类型
// ==========================================
// 初始化阶段错误在任何周期运行前中止
// 搜索阶段错误中止整个优化（不返回部分结果）
// ==========================================

use crate::domain::error::DomainError;
use crate::domain::types::Period;
use thiserror::Error;

/// 引擎层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// 初始数据缺失或非法
    #[error("数据验证失败: {0}")]
    Validation(String),

    /// 规划期末 DP 层为空
    #[error("无可行状态: period={period}")]
    NoFeasibleState { period: Period },

    /// 领域操作失败（分配冲突、消毒未完成等）
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Result 类型别名
pub type EngineResult<T> = Result<T, EngineError>;
