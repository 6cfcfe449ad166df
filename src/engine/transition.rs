// ==========================================
// 蛋鸡舍排产优化系统 - 状态转移评估器
// ==========================================
// 职责: 在 Farm 私有副本上执行候选状态的全部动作,
//       推进生长动态,返回本周期产出合计与变更后的 Farm
// 动作:
// - DISINFECT: 排定消毒（已排定则执行激活检查）
// - IDLE / REMAIN: 空操作
// - BUY: 购入并分配新批次,记录 (period, house_id) → batch_id
// - TRANSFER: 转入下一阶段第一个可用鸡舍,无可用时降级为留舍
// - SELL: 按默认数量出售,归零时腾空鸡舍
// 红线: 分配错误在搜索期间降级为空操作,其余错误中止优化
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::error::DomainError;
use crate::domain::farm::{Farm, PurchaseOrder};
use crate::domain::types::{ActionCode, BatchId};
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::growth::GrowthModel;
use crate::engine::state_generator::{HouseDecision, SystemState};
use tracing::{debug, trace};

// ==========================================
// TransitionEvaluator - 状态转移评估器
// ==========================================
pub struct TransitionEvaluator {
    sell_quantity: u32,
    purchase: PurchaseOrder,
    model: GrowthModel,
}

impl TransitionEvaluator {
    pub fn new(config: &OptimizerConfig, purchase: PurchaseOrder) -> Self {
        Self {
            sell_quantity: config.sell_quantity,
            purchase,
            model: GrowthModel::new(),
        }
    }

    /// 评估候选状态
    ///
    /// # 参数
    /// - state: 候选系统状态
    /// - farm: 已推进到本周期日期的 Farm 私有副本
    ///
    /// # 返回
    /// (本周期产出合计, 变更后的 Farm)
    pub fn evaluate(&self, state: &SystemState, mut farm: Farm) -> EngineResult<(u64, Farm)> {
        for decision in &state.decisions {
            self.apply(decision, &mut farm)?;
        }
        let total_yield = self.run_dynamics(&mut farm)?;
        trace!(state = %state, total_yield, "状态评估完成");
        Ok((total_yield, farm))
    }

    /// 执行单个鸡舍动作
    fn apply(&self, decision: &HouseDecision, farm: &mut Farm) -> EngineResult<()> {
        let house_id = decision.house_id;
        match decision.action {
            ActionCode::Disinfect => {
                farm.disinfect(house_id)?;
            }
            ActionCode::Idle | ActionCode::Remain => {}
            ActionCode::Buy => self.apply_buy(decision, farm)?,
            ActionCode::Transfer => {
                let batch_id = required_batch(decision)?;
                soften(farm.transfer(batch_id).map(|_| ()), decision)?;
            }
            ActionCode::Sell => {
                let batch_id = required_batch(decision)?;
                farm.sell(batch_id, self.sell_quantity)?;
            }
        }
        Ok(())
    }

    /// 购入: 目标鸡舍无法容纳时跳过（不产生新批次）
    fn apply_buy(&self, decision: &HouseDecision, farm: &mut Farm) -> EngineResult<()> {
        let (period, house_id) = (decision.period, decision.house_id);
        let available = farm
            .house(house_id)
            .map(|h| h.is_available_for(self.purchase.quantity))
            .ok_or(DomainError::HouseNotFound(house_id))?;
        if !available {
            debug!(period, house_id, quantity = self.purchase.quantity, "鸡舍不可用,购入降级为空操作");
            return Ok(());
        }

        match farm.buy_into(&self.purchase, house_id) {
            Ok(batch_id) => {
                farm.record_purchase(period, house_id, batch_id);
                debug!(period, house_id, batch_id, "购入新批次并分配");
                Ok(())
            }
            Err(err) => soften(Err(err), decision),
        }
    }

    /// 推进生长动态,返回产出合计
    ///
    /// 已清空的批次同样写回 0/0,使 last_yield / last_losses 对应本周期
    fn run_dynamics(&self, farm: &mut Farm) -> EngineResult<u64> {
        let date = farm.as_of_date();
        let outcomes: Vec<(BatchId, u64, u32)> = farm
            .batches()
            .map(|b| {
                let outcome = self.model.evaluate(b, date);
                (b.batch_id, outcome.yield_units, outcome.losses)
            })
            .collect();

        let mut total_yield = 0u64;
        for (batch_id, yield_units, losses) in outcomes {
            farm.apply_dynamics(batch_id, yield_units, losses)?;
            total_yield = total_yield.saturating_add(yield_units);
        }
        Ok(total_yield)
    }
}

fn required_batch(decision: &HouseDecision) -> EngineResult<BatchId> {
    decision.batch_id.ok_or_else(|| {
        EngineError::Validation(format!(
            "动作 {} 缺少批次: house_id={}",
            decision.action, decision.house_id
        ))
    })
}

/// 分配错误降级为空操作
fn soften(result: Result<(), DomainError>, decision: &HouseDecision) -> EngineResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.is_allocation_error() => {
            debug!(
                house_id = decision.house_id,
                action = %decision.action,
                error = %err,
                "分配失败,动作降级为空操作"
            );
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
