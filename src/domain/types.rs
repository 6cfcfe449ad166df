// ==========================================
// 蛋鸡舍排产优化系统 - 领域类型定义
// ==========================================
// 依据: 鸡舍/批次生命周期 (育雏育成 → 产蛋 → 淘汰前)
// 红线: 动作编码为封闭枚举,不使用自由文本
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// 鸡舍ID
pub type HouseId = i64;

/// 批次ID
pub type BatchId = i64;

/// 规划周期序号（1..=horizon，0 表示初始状态）
pub type Period = u32;

// ==========================================
// 生命周期阶段 (House Phase)
// ==========================================
// 批次阶段与其所在鸡舍阶段保持一致
// 序列化格式: SCREAMING_SNAKE_CASE (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HousePhase {
    Rearing,    // 育雏育成
    Production, // 产蛋
    PreCull,    // 淘汰前
    Unassigned, // 未指定
}

impl HousePhase {
    /// 转场目标阶段
    ///
    /// # 返回
    /// - Some(phase): 下一阶段
    /// - None: 已是最后阶段（只能出售）或未指定阶段
    pub fn next(&self) -> Option<HousePhase> {
        match self {
            HousePhase::Rearing => Some(HousePhase::Production),
            HousePhase::Production => Some(HousePhase::PreCull),
            HousePhase::PreCull | HousePhase::Unassigned => None,
        }
    }

    /// 从三个阶段标志位推导鸡舍阶段
    ///
    /// 多个标志同时置位时,靠后的阶段优先（淘汰前 > 产蛋 > 育雏育成）
    pub fn from_flags(rearing: bool, production: bool, pre_cull: bool) -> Self {
        if pre_cull {
            HousePhase::PreCull
        } else if production {
            HousePhase::Production
        } else if rearing {
            HousePhase::Rearing
        } else {
            HousePhase::Unassigned
        }
    }

    /// 从字符串解析阶段
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_uppercase().as_str() {
            "REARING" => HousePhase::Rearing,
            "PRODUCTION" => HousePhase::Production,
            "PRE_CULL" => HousePhase::PreCull,
            _ => HousePhase::Unassigned,
        }
    }

    /// 转换为数据库存储的字符串
    pub fn to_db_str(&self) -> &'static str {
        match self {
            HousePhase::Rearing => "REARING",
            HousePhase::Production => "PRODUCTION",
            HousePhase::PreCull => "PRE_CULL",
            HousePhase::Unassigned => "UNASSIGNED",
        }
    }
}

impl fmt::Display for HousePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_str())
    }
}

// ==========================================
// 鸡舍激活状态 (House Activation)
// ==========================================
// INACTIVE → ACTIVE_OCCUPIED (allocate)
// ACTIVE_OCCUPIED → ACTIVE_DISINFECTING (vacate)
// ACTIVE_DISINFECTING → INACTIVE (消毒到期 + 显式激活检查)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HouseActivation {
    Inactive,
    ActiveOccupied,
    ActiveDisinfecting,
}

impl fmt::Display for HouseActivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HouseActivation::Inactive => write!(f, "INACTIVE"),
            HouseActivation::ActiveOccupied => write!(f, "ACTIVE_OCCUPIED"),
            HouseActivation::ActiveDisinfecting => write!(f, "ACTIVE_DISINFECTING"),
        }
    }
}

// ==========================================
// 鸡舍动作 (Action Code)
// ==========================================
// 顺序即 DP 层内的规范排序,IDLE 排在 BUY 之前
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionCode {
    Remain,    // 留舍
    Transfer,  // 转入下一阶段鸡舍
    Sell,      // 出售/淘汰
    Disinfect, // 消毒
    Idle,      // 空置
    Buy,       // 购入新批次
}

impl ActionCode {
    /// 单字母编码（报表使用）
    pub fn short_code(&self) -> &'static str {
        match self {
            ActionCode::Remain => "R",
            ActionCode::Transfer => "T",
            ActionCode::Sell => "S",
            ActionCode::Disinfect => "D",
            ActionCode::Idle => "I",
            ActionCode::Buy => "B",
        }
    }
}

impl fmt::Display for ActionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCode::Remain => write!(f, "REMAIN"),
            ActionCode::Transfer => write!(f, "TRANSFER"),
            ActionCode::Sell => write!(f, "SELL"),
            ActionCode::Disinfect => write!(f, "DISINFECT"),
            ActionCode::Idle => write!(f, "IDLE"),
            ActionCode::Buy => write!(f, "BUY"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_from_flags_precedence() {
        assert_eq!(HousePhase::from_flags(true, false, false), HousePhase::Rearing);
        assert_eq!(HousePhase::from_flags(true, true, false), HousePhase::Production);
        assert_eq!(HousePhase::from_flags(true, true, true), HousePhase::PreCull);
        assert_eq!(HousePhase::from_flags(false, false, false), HousePhase::Unassigned);
    }

    #[test]
    fn test_phase_next_chain() {
        assert_eq!(HousePhase::Rearing.next(), Some(HousePhase::Production));
        assert_eq!(HousePhase::Production.next(), Some(HousePhase::PreCull));
        assert_eq!(HousePhase::PreCull.next(), None);
    }

    #[test]
    fn test_idle_sorts_before_buy() {
        assert!(ActionCode::Idle < ActionCode::Buy);
    }
}
