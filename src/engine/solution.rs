// ==========================================
// 蛋鸡舍排产优化系统 - 最优解提取
// ==========================================
// 职责: 在规划期末选取累计产出最大的状态,
//       沿前驱下标迭代回溯得到周期 1..=horizon 的动作序列
// 红线: 期末层为空 → NoFeasibleState
// ==========================================

use crate::domain::farm::Farm;
use crate::domain::types::{ActionCode, BatchId, HouseId, Period};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::search::{period_date, DpTable};
use crate::engine::state_generator::SystemState;
use crate::engine::transition::TransitionEvaluator;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ==========================================
// ActionRecord - 对外输出的动作记录
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub period: Period,
    pub house_id: HouseId,
    pub batch_id: Option<BatchId>, // BUY 时为评估阶段生成的新批次ID
    pub action: ActionCode,
}

// ==========================================
// OptimalPlan - 最优方案
// ==========================================
#[derive(Debug, Clone)]
pub struct OptimalPlan {
    pub max_value: u64,
    pub initial_date: NaiveDate,
    pub states: Vec<SystemState>, // 周期 1..=horizon
    pub actions: Vec<ActionRecord>,
    pub snapshots: Vec<Farm>, // 与 states 一一对应
}

impl OptimalPlan {
    pub fn horizon(&self) -> Period {
        self.states.len() as Period
    }

    /// 周期 t 执行后的 Farm 快照
    pub fn snapshot(&self, period: Period) -> Option<&Farm> {
        period
            .checked_sub(1)
            .and_then(|idx| self.snapshots.get(idx as usize))
    }
}

// ==========================================
// SolutionExtractor - 最优解提取器
// ==========================================
pub struct SolutionExtractor;

impl SolutionExtractor {
    pub fn extract(table: &DpTable) -> EngineResult<OptimalPlan> {
        let horizon = table.horizon();
        let last = table
            .layer(horizon)
            .filter(|_| horizon >= 1)
            .ok_or(EngineError::NoFeasibleState { period: horizon })?;
        let (mut idx, best) = last
            .best()
            .ok_or(EngineError::NoFeasibleState { period: horizon })?;
        let max_value = best.value;

        // 迭代回溯
        let mut states = Vec::with_capacity(horizon as usize);
        let mut snapshots = Vec::with_capacity(horizon as usize);
        for period in (1..=horizon).rev() {
            let entry = table
                .layer(period)
                .and_then(|layer| layer.entry(idx))
                .ok_or(EngineError::NoFeasibleState { period })?;
            states.push(entry.state.clone());
            snapshots.push(entry.farm.clone());
            idx = entry.predecessor.ok_or(EngineError::NoFeasibleState { period })?;
        }
        states.reverse();
        snapshots.reverse();

        let actions = states
            .iter()
            .zip(&snapshots)
            .flat_map(|(state, farm)| {
                state.decisions.iter().map(move |d| ActionRecord {
                    period: d.period,
                    house_id: d.house_id,
                    batch_id: match d.action {
                        ActionCode::Buy => farm.purchase_for(d.period, d.house_id),
                        _ => d.batch_id,
                    },
                    action: d.action,
                })
            })
            .collect::<Vec<_>>();

        info!(horizon, max_value, actions = actions.len(), "最优解回溯完成");

        Ok(OptimalPlan {
            max_value,
            initial_date: table.initial_date,
            states,
            actions,
            snapshots,
        })
    }

    /// 从初始 Farm 逐周期重放状态序列,独立累计产出
    pub fn replay(
        initial_farm: &Farm,
        initial_date: NaiveDate,
        states: &[SystemState],
        evaluator: &TransitionEvaluator,
    ) -> EngineResult<u64> {
        let mut farm = initial_farm.clone();
        let mut total = 0u64;
        for state in states {
            farm.advance_date(period_date(initial_date, state.period));
            let (score, next) = evaluator.evaluate(state, farm)?;
            total = total.saturating_add(score);
            farm = next;
        }
        if let Some(violation) = farm.invariant_violations().first() {
            warn!(violation = %violation, "重放结束时发现不一致");
        }
        Ok(total)
    }
}
