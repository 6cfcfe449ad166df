// ==========================================
// 蛋鸡舍排产优化系统 - 动作/状态生成器
// ==========================================
// 职责: 按鸡舍枚举合法动作,生成候选系统状态（笛卡尔积）
// 规则:
// - 空舍 + 待消毒            → {DISINFECT}
// - 空舍 + 洁净 + 育成 + 容量达标 + 冷却期外 → {IDLE, BUY}
// - 空舍 + 其他              → {IDLE}
// - 育成批次 未达开产周龄     → {REMAIN}; 已达 → {TRANSFER}
// - 产蛋批次                 → {REMAIN, TRANSFER}
// - 淘汰前批次 出售中         → {SELL}; 否则 → {REMAIN, SELL}
// 红线: 系统状态按 house_id 规范排序,作为 DP 去重键
// ==========================================

use crate::domain::farm::Farm;
use crate::domain::house::House;
use crate::domain::types::{ActionCode, BatchId, HouseId, HousePhase, Period};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use tracing::debug;

// ==========================================
// HouseDecision - 单个鸡舍在某周期的决策
// ==========================================
// 字段顺序决定排序: period → house_id → batch_id → action
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HouseDecision {
    pub period: Period,
    pub house_id: HouseId,
    pub batch_id: Option<BatchId>, // BUY 时为 None（新批次ID在评估时产生）
    pub action: ActionCode,
}

impl HouseDecision {
    pub fn new(period: Period, house_id: HouseId, batch_id: Option<BatchId>, action: ActionCode) -> Self {
        Self {
            period,
            house_id,
            batch_id,
            action,
        }
    }
}

// ==========================================
// SystemState - 系统状态（DP 键）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SystemState {
    pub period: Period,
    pub decisions: Vec<HouseDecision>,
}

impl SystemState {
    /// 规范化构造: 按 house_id 排序
    pub fn new(period: Period, mut decisions: Vec<HouseDecision>) -> Self {
        decisions.sort_by_key(|d| d.house_id);
        Self { period, decisions }
    }

    /// 第 0 周期的初始状态（无决策）
    pub fn initial() -> Self {
        Self {
            period: 0,
            decisions: Vec::new(),
        }
    }

    pub fn decision_for(&self, house_id: HouseId) -> Option<&HouseDecision> {
        self.decisions.iter().find(|d| d.house_id == house_id)
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={} [", self.period)?;
        for (i, d) in self.decisions.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match d.batch_id {
                Some(batch_id) => write!(f, "{}:{}@{}", d.house_id, d.action.short_code(), batch_id)?,
                None => write!(f, "{}:{}", d.house_id, d.action.short_code())?,
            }
        }
        write!(f, "]")
    }
}

// ==========================================
// StateGenerator - 候选状态生成器
// ==========================================
pub struct StateGenerator {
    buy_threshold: u32,
    buy_cooldown_periods: u32,
}

impl StateGenerator {
    pub fn new(buy_threshold: u32, buy_cooldown_periods: u32) -> Self {
        Self {
            buy_threshold,
            buy_cooldown_periods,
        }
    }

    /// 单个鸡舍的合法动作列表
    pub fn legal_actions(&self, farm: &Farm, house: &House, period: Period) -> Vec<HouseDecision> {
        let house_id = house.house_id;

        let Some(batch) = farm.occupant_of(house_id) else {
            if house.needs_disinfection {
                return vec![HouseDecision::new(period, house_id, None, ActionCode::Disinfect)];
            }
            let mut actions = vec![HouseDecision::new(period, house_id, None, ActionCode::Idle)];
            if house.phase == HousePhase::Rearing
                && house.capacity >= self.buy_threshold
                && farm.can_buy(period, self.buy_cooldown_periods)
            {
                actions.push(HouseDecision::new(period, house_id, None, ActionCode::Buy));
            }
            return actions;
        };

        let occupant = Some(batch.batch_id);
        let decide = |action| HouseDecision::new(period, house_id, occupant, action);

        match batch.phase {
            HousePhase::Rearing => {
                if batch.is_production_age() {
                    vec![decide(ActionCode::Transfer)]
                } else {
                    vec![decide(ActionCode::Remain)]
                }
            }
            HousePhase::Production => vec![decide(ActionCode::Remain), decide(ActionCode::Transfer)],
            HousePhase::PreCull => {
                if batch.is_being_liquidated {
                    vec![decide(ActionCode::Sell)]
                } else {
                    vec![decide(ActionCode::Remain), decide(ActionCode::Sell)]
                }
            }
            HousePhase::Unassigned => vec![decide(ActionCode::Remain)],
        }
    }

    /// 生成全部候选系统状态
    ///
    /// # 返回
    /// 去重后的候选状态（按规范顺序升序）
    pub fn generate(&self, farm: &Farm, period: Period) -> Vec<SystemState> {
        let per_house: Vec<Vec<HouseDecision>> = farm
            .houses()
            .map(|house| self.legal_actions(farm, house, period))
            .collect();
        let house_count = per_house.len();

        let mut unique = BTreeSet::new();
        for combination in cartesian_product(&per_house) {
            if combination.len() != house_count {
                continue;
            }
            unique.insert(SystemState::new(period, combination));
        }

        debug!(period, house_count, candidates = unique.len(), "生成候选状态");
        unique.into_iter().collect()
    }
}

/// 笛卡尔积（任一列表为空时结果为空）
fn cartesian_product(lists: &[Vec<HouseDecision>]) -> Vec<Vec<HouseDecision>> {
    let mut combinations: Vec<Vec<HouseDecision>> = vec![Vec::with_capacity(lists.len())];
    for options in lists {
        let mut next = Vec::with_capacity(combinations.len() * options.len());
        for prefix in &combinations {
            for option in options {
                let mut combination = prefix.clone();
                combination.push(*option);
                next.push(combination);
            }
        }
        combinations = next;
    }
    combinations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::batch::Batch;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn generator() -> StateGenerator {
        StateGenerator::new(60_000, 14)
    }

    fn farm_with(houses: &[(HouseId, u32, HousePhase)]) -> Farm {
        let today = date(2024, 5, 1);
        let mut farm = Farm::new(today);
        for (id, capacity, phase) in houses {
            farm.insert_house(House::new(*id, *capacity, *phase, today));
        }
        farm
    }

    fn actions_of(farm: &Farm, house_id: HouseId) -> Vec<ActionCode> {
        let house = farm.house(house_id).unwrap();
        generator()
            .legal_actions(farm, house, 1)
            .into_iter()
            .map(|d| d.action)
            .collect()
    }

    #[test]
    fn test_empty_rearing_house_offers_buy() {
        let farm = farm_with(&[(1, 60_000, HousePhase::Rearing), (2, 50_000, HousePhase::Rearing)]);
        assert_eq!(actions_of(&farm, 1), vec![ActionCode::Idle, ActionCode::Buy]);
        assert_eq!(actions_of(&farm, 2), vec![ActionCode::Idle]);
    }

    #[test]
    fn test_buy_cooldown_suppresses_buy() {
        let mut farm = farm_with(&[(1, 60_000, HousePhase::Rearing)]);
        farm.record_purchase(1, 9, 99);
        let house = farm.house(1).unwrap();
        let actions: Vec<_> = generator()
            .legal_actions(&farm, house, 10)
            .into_iter()
            .map(|d| d.action)
            .collect();
        assert_eq!(actions, vec![ActionCode::Idle]);
    }

    #[test]
    fn test_disinfecting_house_only_disinfects() {
        let mut farm = farm_with(&[(1, 60_000, HousePhase::Rearing)]);
        farm.insert_batch(Batch::new(10, 1, 1, 100, date(2024, 1, 1), date(2024, 5, 1)));
        farm.allocate(10, 1).unwrap();
        farm.vacate(1).unwrap();
        assert_eq!(actions_of(&farm, 1), vec![ActionCode::Disinfect]);
    }

    #[test]
    fn test_occupied_house_actions_by_phase() {
        let mut farm = farm_with(&[
            (1, 1000, HousePhase::Rearing),
            (2, 1000, HousePhase::Rearing),
            (3, 1000, HousePhase::Production),
            (4, 1000, HousePhase::PreCull),
        ]);
        farm.insert_batch(Batch::new(10, 1, 1, 500, date(2024, 4, 1), date(2024, 5, 1)));
        farm.insert_batch(Batch::new(11, 1, 1, 500, date(2023, 10, 1), date(2024, 5, 1)));
        farm.insert_batch(Batch::new(12, 1, 1, 500, date(2023, 1, 1), date(2024, 5, 1)));
        farm.insert_batch(Batch::new(13, 1, 1, 500, date(2022, 1, 1), date(2024, 5, 1)));
        farm.allocate(10, 1).unwrap();
        farm.allocate(11, 2).unwrap();
        farm.allocate(12, 3).unwrap();
        farm.allocate(13, 4).unwrap();

        assert_eq!(actions_of(&farm, 1), vec![ActionCode::Remain]);
        assert_eq!(actions_of(&farm, 2), vec![ActionCode::Transfer]);
        assert_eq!(actions_of(&farm, 3), vec![ActionCode::Remain, ActionCode::Transfer]);
        assert_eq!(actions_of(&farm, 4), vec![ActionCode::Remain, ActionCode::Sell]);

        farm.sell(13, 10).unwrap();
        assert_eq!(actions_of(&farm, 4), vec![ActionCode::Sell]);
    }

    #[test]
    fn test_generate_is_cartesian_product() {
        let mut farm = farm_with(&[
            (1, 60_000, HousePhase::Rearing),
            (2, 1000, HousePhase::Production),
            (3, 1000, HousePhase::PreCull),
        ]);
        farm.insert_batch(Batch::new(12, 1, 1, 500, date(2023, 1, 1), date(2024, 5, 1)));
        farm.allocate(12, 2).unwrap();

        let states = generator().generate(&farm, 1);
        // 2 (IDLE/BUY) × 2 (REMAIN/TRANSFER) × 1 (IDLE)
        assert_eq!(states.len(), 4);
        for state in &states {
            assert_eq!(state.decisions.len(), 3);
            let ids: Vec<_> = state.decisions.iter().map(|d| d.house_id).collect();
            assert_eq!(ids, vec![1, 2, 3]);
        }
        // 候选按规范顺序升序输出
        let mut sorted = states.clone();
        sorted.sort();
        assert_eq!(states, sorted);
    }

    #[test]
    fn test_state_canonical_order_and_display() {
        let state = SystemState::new(
            2,
            vec![
                HouseDecision::new(2, 5, Some(7), ActionCode::Remain),
                HouseDecision::new(2, 1, None, ActionCode::Idle),
            ],
        );
        assert_eq!(state.decisions[0].house_id, 1);
        assert_eq!(state.decision_for(5).map(|d| d.action), Some(ActionCode::Remain));
        assert_eq!(state.to_string(), "t=2 [1:I, 5:R@7]");
    }
}
