// ==========================================
// 蛋鸡舍排产优化系统 - 鸡舍领域模型
// ==========================================
// 红线: occupant 非空 ⇒ active == true
// 红线: needs_disinfection == true ⇒ occupant 为空
// ==========================================
// 消毒完成是惰性的: 只有在显式激活检查时才会从
// ACTIVE_DISINFECTING 转为 INACTIVE
// ==========================================

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::types::{BatchId, HouseActivation, HouseId, HousePhase};
use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// 默认消毒周期（天）
pub const DEFAULT_DISINFECTION_DAYS: i64 = 30;

// ==========================================
// House - 鸡舍
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct House {
    // ===== 标识 =====
    pub house_id: HouseId,
    pub name: Option<String>,

    // ===== 物理属性 =====
    pub capacity: u32,      // 最大在舍数量
    pub phase: HousePhase,  // 鸡舍阶段

    // ===== 占用与激活 =====
    pub occupant: Option<BatchId>,
    pub active: bool,

    // ===== 消毒 =====
    pub needs_disinfection: bool,
    pub disinfection_due: Option<NaiveDate>,
    pub disinfection_days: i64,

    // ===== 模拟日期 =====
    pub as_of_date: NaiveDate,
}

impl House {
    /// 创建空置、洁净的鸡舍
    pub fn new(house_id: HouseId, capacity: u32, phase: HousePhase, as_of_date: NaiveDate) -> Self {
        Self {
            house_id,
            name: None,
            capacity,
            phase,
            occupant: None,
            active: false,
            needs_disinfection: false,
            disinfection_due: None,
            disinfection_days: DEFAULT_DISINFECTION_DAYS,
            as_of_date,
        }
    }

    /// 设置模拟日期
    ///
    /// 加载时即标记待消毒但尚无到期日的鸡舍,在首次设置日期时排定到期日
    pub fn set_date(&mut self, date: NaiveDate) {
        self.as_of_date = date;
        if self.needs_disinfection && self.disinfection_due.is_none() {
            self.active = true;
            self.disinfection_due = Some(date + Duration::days(self.disinfection_days));
        }
    }

    /// 当前激活状态（只读,不触发消毒完成）
    pub fn activation_state(&self) -> HouseActivation {
        if self.needs_disinfection {
            HouseActivation::ActiveDisinfecting
        } else if self.active {
            HouseActivation::ActiveOccupied
        } else {
            HouseActivation::Inactive
        }
    }

    /// 消毒是否已到期（未排定消毒视为已完成）
    pub fn disinfection_complete(&self) -> bool {
        match self.disinfection_due {
            Some(due) => self.as_of_date >= due,
            None => true,
        }
    }

    /// 排定消毒: 消毒期间鸡舍视为激活
    pub fn schedule_disinfection(&mut self) {
        self.needs_disinfection = true;
        self.disinfection_due = Some(self.as_of_date + Duration::days(self.disinfection_days));
        self.active = true;
    }

    /// 激活检查: 消毒到期则转为 INACTIVE（洁净可用）
    pub fn check_activation(&mut self) -> HouseActivation {
        if self.needs_disinfection && self.disinfection_complete() {
            self.needs_disinfection = false;
            self.disinfection_due = None;
            self.active = false;
            tracing::debug!(house_id = self.house_id, date = %self.as_of_date, "消毒完成,鸡舍转为空闲");
        }
        self.activation_state()
    }

    /// 设为激活
    ///
    /// # 返回
    /// - Err(DisinfectionInProgress): 消毒尚未到期
    pub fn mark_active(&mut self) -> DomainResult<()> {
        if self.needs_disinfection {
            if !self.disinfection_complete() {
                return Err(DomainError::DisinfectionInProgress {
                    house_id: self.house_id,
                    due: self.disinfection_due.unwrap_or(self.as_of_date),
                });
            }
            self.needs_disinfection = false;
            self.disinfection_due = None;
        }
        self.active = true;
        Ok(())
    }

    /// 设为空闲（仅适用于无批次的鸡舍,不触发消毒）
    pub fn mark_inactive(&mut self) {
        if self.occupant.is_some() {
            return;
        }
        self.active = false;
        self.needs_disinfection = false;
        self.disinfection_due = None;
    }

    /// 是否可作为转场/购入目标
    ///
    /// 条件: 无批次、容量足够、未激活（或消毒已到期）
    pub fn is_available_for(&self, population: u32) -> bool {
        if self.occupant.is_some() || self.capacity < population {
            return false;
        }
        match self.activation_state() {
            HouseActivation::Inactive => true,
            HouseActivation::ActiveDisinfecting => self.disinfection_complete(),
            HouseActivation::ActiveOccupied => false,
        }
    }
}
