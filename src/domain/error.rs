// ==========================================
// 蛋鸡舍排产优化系统 - 领域层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use crate::domain::types::{BatchId, HouseId};
use chrono::NaiveDate;
use thiserror::Error;

/// 领域层错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    // ===== 分配错误 (AllocationError) =====
    #[error("鸡舍已被占用: house_id={house_id}, occupant={occupant}")]
    HouseOccupied { house_id: HouseId, occupant: BatchId },

    #[error("超出鸡舍容量: house_id={house_id}, capacity={capacity}, population={population}")]
    OverCapacity {
        house_id: HouseId,
        capacity: u32,
        population: u32,
    },

    // ===== 消毒错误 =====
    #[error("鸡舍消毒进行中: house_id={house_id}, due={due}")]
    DisinfectionInProgress { house_id: HouseId, due: NaiveDate },

    // ===== 引用错误 =====
    #[error("鸡舍不存在: house_id={0}")]
    HouseNotFound(HouseId),

    #[error("批次不存在: batch_id={0}")]
    BatchNotFound(BatchId),
}

impl DomainError {
    /// 是否属于分配错误（搜索期间可降级为空操作）
    pub fn is_allocation_error(&self) -> bool {
        matches!(
            self,
            DomainError::HouseOccupied { .. } | DomainError::OverCapacity { .. }
        )
    }
}

/// Result 类型别名
pub type DomainResult<T> = Result<T, DomainError>;
