// ==========================================
// 蛋鸡舍排产优化系统 - API层错误类型
// ==========================================
// 职责: 汇总仓储层与引擎层错误,转换为调用方可读的错误消息
// ==========================================

use crate::engine::error::EngineError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 请求错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    // ==========================================
    // 优化错误
    // ==========================================
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("分配冲突: {0}")]
    AllocationError(String),

    #[error("鸡舍消毒进行中: {0}")]
    DisinfectionInProgress(String),

    #[error("无可行状态: period={0}")]
    NoFeasibleState(u32),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::DatabaseConnectionError(msg) => ApiError::DatabaseConnectionError(msg),
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::DatabaseQueryError(msg) => ApiError::DatabaseError(msg),
            RepositoryError::ConstraintViolation(msg) => {
                ApiError::DatabaseError(format!("约束违反: {}", msg))
            }
            RepositoryError::FieldValueError { column, message } => {
                ApiError::ValidationError(format!("存量数据第 {} 列错误: {}", column, message))
            }
        }
    }
}

// ==========================================
// 从 EngineError 转换
// ==========================================
impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        use crate::domain::error::DomainError;

        match err {
            EngineError::Validation(msg) => ApiError::ValidationError(msg),
            EngineError::NoFeasibleState { period } => ApiError::NoFeasibleState(period),
            EngineError::Domain(domain) => match domain {
                DomainError::HouseOccupied { .. } | DomainError::OverCapacity { .. } => {
                    ApiError::AllocationError(domain.to_string())
                }
                DomainError::DisinfectionInProgress { .. } => {
                    ApiError::DisinfectionInProgress(domain.to_string())
                }
                DomainError::HouseNotFound(_) | DomainError::BatchNotFound(_) => {
                    ApiError::InternalError(domain.to_string())
                }
            },
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
