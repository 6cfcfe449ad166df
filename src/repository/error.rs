// ==========================================
// 蛋鸡舍排产优化系统 - 仓储层错误类型
// ==========================================
// 职责: 把 rusqlite 错误归类为 连接 / 锁 / 查询 / 约束 / 字段值
// ==========================================

use rusqlite::ErrorCode;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    #[error("约束违反: {0}")]
    ConstraintViolation(String),

    // 存量数据类型不符或越界（如负数容量）
    #[error("字段值错误 (column={column}): {message}")]
    FieldValueError { column: usize, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(failure, msg) => {
                let msg = msg.unwrap_or_else(|| failure.to_string());
                match failure.code {
                    ErrorCode::ConstraintViolation => RepositoryError::ConstraintViolation(msg),
                    ErrorCode::CannotOpen | ErrorCode::NotADatabase => {
                        RepositoryError::DatabaseConnectionError(msg)
                    }
                    _ => RepositoryError::DatabaseQueryError(msg),
                }
            }
            rusqlite::Error::IntegralValueOutOfRange(column, value) => RepositoryError::FieldValueError {
                column,
                message: format!("数值 {} 超出范围", value),
            },
            rusqlite::Error::FromSqlConversionFailure(column, _, cause) => {
                RepositoryError::FieldValueError {
                    column,
                    message: cause.to_string(),
                }
            }
            rusqlite::Error::InvalidColumnType(column, name, ty) => RepositoryError::FieldValueError {
                column,
                message: format!("列 {} 类型为 {}", name, ty),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
