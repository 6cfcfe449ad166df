// ==========================================
// 蛋鸡舍排产优化系统 - 养殖场注册表 (Fleet Registry)
// ==========================================
// 职责: 持有全部鸡舍与批次,按ID索引
// 职责: 日期推进、分配、腾空、转场、出售、购入
// 红线: 搜索期间每个分支持有独立的 Farm 副本
// ==========================================
// 新批次ID由注册表内的单调分配器产生,随快照一起克隆,
// 各分支得到的ID保持稳定
// ==========================================

use crate::domain::batch::{Batch, DEFAULT_PRODUCTION_AGE_WEEKS};
use crate::domain::error::{DomainError, DomainResult};
use crate::domain::growth_curve::{CurveId, GrowthCurve};
use crate::domain::house::{House, DEFAULT_DISINFECTION_DAYS};
use crate::domain::types::{BatchId, HouseActivation, HouseId, HousePhase, Period};
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

// ==========================================
// PurchaseOrder - 购入参数
// ==========================================
#[derive(Debug, Clone)]
pub struct PurchaseOrder {
    pub breed_id: i64,
    pub curve_id: CurveId,
    pub quantity: u32,
    pub production_age_weeks: u32,
    pub growth_curve: Option<Arc<GrowthCurve>>,
}

impl PurchaseOrder {
    pub fn new(breed_id: i64, curve_id: CurveId, quantity: u32) -> Self {
        Self {
            breed_id,
            curve_id,
            quantity,
            production_age_weeks: DEFAULT_PRODUCTION_AGE_WEEKS,
            growth_curve: None,
        }
    }
}

// ==========================================
// Farm - 养殖场注册表
// ==========================================
#[derive(Debug, Clone)]
pub struct Farm {
    houses: BTreeMap<HouseId, House>,
    batches: BTreeMap<BatchId, Batch>,
    as_of_date: NaiveDate,
    next_batch_id: BatchId,
    // (period, house_id) → 购入批次ID
    purchases: BTreeMap<(Period, HouseId), BatchId>,
    disinfection_days: i64,
}

impl Farm {
    pub fn new(as_of_date: NaiveDate) -> Self {
        Self {
            houses: BTreeMap::new(),
            batches: BTreeMap::new(),
            as_of_date,
            next_batch_id: 1,
            purchases: BTreeMap::new(),
            disinfection_days: DEFAULT_DISINFECTION_DAYS,
        }
    }

    pub fn with_disinfection_days(mut self, days: i64) -> Self {
        self.disinfection_days = days;
        for house in self.houses.values_mut() {
            house.disinfection_days = days;
        }
        self
    }

    // ==========================================
    // 注册与查询
    // ==========================================

    /// 注册鸡舍（统一消毒周期与日期）
    pub fn insert_house(&mut self, mut house: House) {
        house.disinfection_days = self.disinfection_days;
        house.set_date(self.as_of_date);
        self.houses.insert(house.house_id, house);
    }

    /// 注册批次（ID 分配器推进到 max + 1）
    pub fn insert_batch(&mut self, mut batch: Batch) {
        batch.set_date(self.as_of_date);
        self.next_batch_id = self.next_batch_id.max(batch.batch_id + 1);
        self.batches.insert(batch.batch_id, batch);
    }

    pub fn as_of_date(&self) -> NaiveDate {
        self.as_of_date
    }

    pub fn next_batch_id(&self) -> BatchId {
        self.next_batch_id
    }

    pub fn house(&self, house_id: HouseId) -> Option<&House> {
        self.houses.get(&house_id)
    }

    pub fn batch(&self, batch_id: BatchId) -> Option<&Batch> {
        self.batches.get(&batch_id)
    }

    pub(crate) fn house_mut(&mut self, house_id: HouseId) -> DomainResult<&mut House> {
        self.houses
            .get_mut(&house_id)
            .ok_or(DomainError::HouseNotFound(house_id))
    }

    pub(crate) fn batch_mut(&mut self, batch_id: BatchId) -> DomainResult<&mut Batch> {
        self.batches
            .get_mut(&batch_id)
            .ok_or(DomainError::BatchNotFound(batch_id))
    }

    /// 按 house_id 升序遍历鸡舍
    pub fn houses(&self) -> impl Iterator<Item = &House> {
        self.houses.values()
    }

    /// 按 batch_id 升序遍历批次
    pub fn batches(&self) -> impl Iterator<Item = &Batch> {
        self.batches.values()
    }

    pub fn house_count(&self) -> usize {
        self.houses.len()
    }

    /// 鸡舍当前在舍批次
    pub fn occupant_of(&self, house_id: HouseId) -> Option<&Batch> {
        self.house(house_id)
            .and_then(|h| h.occupant)
            .and_then(|batch_id| self.batch(batch_id))
    }

    // ==========================================
    // 日期推进
    // ==========================================

    /// 设置所有鸡舍与批次的模拟日期（幂等）
    pub fn advance_date(&mut self, date: NaiveDate) {
        self.as_of_date = date;
        for house in self.houses.values_mut() {
            house.set_date(date);
        }
        for batch in self.batches.values_mut() {
            batch.set_date(date);
        }
    }

    // ==========================================
    // 激活状态
    // ==========================================

    /// 激活检查（惰性完成到期消毒）
    pub fn check_activation(&mut self, house_id: HouseId) -> DomainResult<HouseActivation> {
        Ok(self.house_mut(house_id)?.check_activation())
    }

    pub fn mark_active(&mut self, house_id: HouseId) -> DomainResult<()> {
        self.house_mut(house_id)?.mark_active()
    }

    /// 设为空闲: 有批次时等同于腾空（并排定消毒）
    pub fn mark_inactive(&mut self, house_id: HouseId) -> DomainResult<()> {
        if self.house_mut(house_id)?.occupant.is_some() {
            self.vacate(house_id)?;
        } else {
            self.house_mut(house_id)?.mark_inactive();
        }
        Ok(())
    }

    /// 消毒动作: 未排定则排定,已排定则执行激活检查
    pub fn disinfect(&mut self, house_id: HouseId) -> DomainResult<HouseActivation> {
        let house = self.house_mut(house_id)?;
        if !house.needs_disinfection {
            return Ok(house.activation_state());
        }
        if house.disinfection_due.is_none() {
            house.schedule_disinfection();
            return Ok(house.activation_state());
        }
        Ok(house.check_activation())
    }

    // ==========================================
    // 分配 / 腾空
    // ==========================================

    /// 将批次分配到鸡舍
    ///
    /// # 错误
    /// - HouseOccupied: 目标鸡舍已有其他批次
    /// - OverCapacity: 批次数量超过鸡舍容量
    /// - DisinfectionInProgress: 目标鸡舍消毒未到期
    ///
    /// 原鸡舍与目标不同时,原鸡舍被腾空并排定消毒
    pub fn allocate(&mut self, batch_id: BatchId, house_id: HouseId) -> DomainResult<()> {
        let (population, prior_house) = {
            let batch = self.batch(batch_id).ok_or(DomainError::BatchNotFound(batch_id))?;
            (batch.population, batch.house_id)
        };

        let target = self.house_mut(house_id)?;
        if let Some(occupant) = target.occupant {
            if occupant == batch_id {
                return Ok(());
            }
            return Err(DomainError::HouseOccupied { house_id, occupant });
        }
        if population > target.capacity {
            return Err(DomainError::OverCapacity {
                house_id,
                capacity: target.capacity,
                population,
            });
        }
        target.mark_active()?;
        target.occupant = Some(batch_id);
        let phase = target.phase;

        if let Some(prior) = prior_house.filter(|p| *p != house_id) {
            let prior_house = self.house_mut(prior)?;
            if prior_house.occupant == Some(batch_id) {
                prior_house.occupant = None;
                prior_house.schedule_disinfection();
            }
        }

        let batch = self.batch_mut(batch_id)?;
        batch.house_id = Some(house_id);
        batch.phase = phase;

        debug!(batch_id, house_id, phase = %phase, "批次分配到鸡舍");
        Ok(())
    }

    /// 腾空鸡舍
    ///
    /// # 返回
    /// 原在舍批次ID（有批次时鸡舍进入消毒）
    pub fn vacate(&mut self, house_id: HouseId) -> DomainResult<Option<BatchId>> {
        let house = self.house_mut(house_id)?;
        let previous = house.occupant.take();
        if previous.is_some() {
            house.schedule_disinfection();
        }

        if let Some(batch_id) = previous {
            if let Some(batch) = self.batches.get_mut(&batch_id) {
                batch.house_id = None;
            }
            debug!(house_id, batch_id, "鸡舍腾空,进入消毒");
        }
        Ok(previous)
    }

    /// 解除链接且不排定消毒（仅用于初始化校正）
    pub fn detach(&mut self, house_id: HouseId) -> DomainResult<Option<BatchId>> {
        let house = self.house_mut(house_id)?;
        let previous = house.occupant.take();
        house.mark_inactive();

        if let Some(batch_id) = previous {
            if let Some(batch) = self.batches.get_mut(&batch_id) {
                batch.house_id = None;
            }
        }
        Ok(previous)
    }

    /// 查找下一阶段第一个可用鸡舍（按 house_id 升序）
    pub fn find_destination(&self, phase: HousePhase, population: u32) -> Option<HouseId> {
        self.houses
            .values()
            .find(|h| h.phase == phase && h.is_available_for(population))
            .map(|h| h.house_id)
    }

    /// 转场到下一阶段
    ///
    /// # 返回
    /// - Ok(Some(house_id)): 转入的鸡舍
    /// - Ok(None): 无下一阶段或无可用鸡舍（保持原位）
    pub fn transfer(&mut self, batch_id: BatchId) -> DomainResult<Option<HouseId>> {
        let (phase, population) = {
            let batch = self.batch(batch_id).ok_or(DomainError::BatchNotFound(batch_id))?;
            (batch.phase, batch.population)
        };
        let Some(next_phase) = phase.next() else {
            return Ok(None);
        };
        let Some(destination) = self.find_destination(next_phase, population) else {
            debug!(batch_id, next_phase = %next_phase, "无可用目标鸡舍,转场降级为留舍");
            return Ok(None);
        };
        self.allocate(batch_id, destination)?;
        Ok(Some(destination))
    }

    // ==========================================
    // 出售 / 购入
    // ==========================================

    /// 出售批次
    ///
    /// # 返回
    /// 实际出售数量 min(quantity, population); 归零时腾空鸡舍
    pub fn sell(&mut self, batch_id: BatchId, quantity: u32) -> DomainResult<u32> {
        let batch = self.batch_mut(batch_id)?;
        let sold = quantity.min(batch.population);
        batch.population -= sold;
        batch.is_being_liquidated = true;
        let emptied_house = if batch.population == 0 { batch.house_id } else { None };

        if let Some(house_id) = emptied_house {
            self.vacate(house_id)?;
        }
        debug!(batch_id, sold, "批次出售");
        Ok(sold)
    }

    /// 购入新批次（出生日期 = 当前日期, 未分配）
    pub fn buy(&mut self, order: &PurchaseOrder) -> BatchId {
        let batch_id = self.next_batch_id;
        self.next_batch_id += 1;

        let mut batch = Batch::new(
            batch_id,
            order.breed_id,
            order.curve_id,
            order.quantity,
            self.as_of_date,
            self.as_of_date,
        )
        .with_growth_curve(order.growth_curve.clone());
        batch.production_age_weeks = order.production_age_weeks;
        self.batches.insert(batch_id, batch);

        debug!(batch_id, quantity = order.quantity, "购入新批次");
        batch_id
    }

    /// 购入并分配到指定鸡舍
    ///
    /// 分配失败时撤销本次购入（批次与ID计数器均回滚）
    pub fn buy_into(&mut self, order: &PurchaseOrder, house_id: HouseId) -> DomainResult<BatchId> {
        let batch_id = self.buy(order);
        if let Err(err) = self.allocate(batch_id, house_id) {
            self.batches.remove(&batch_id);
            self.next_batch_id = batch_id;
            return Err(err);
        }
        Ok(batch_id)
    }

    /// 记录购入（供冷却期判断与结果回查）
    pub fn record_purchase(&mut self, period: Period, house_id: HouseId, batch_id: BatchId) {
        self.purchases.insert((period, house_id), batch_id);
    }

    pub fn purchase_for(&self, period: Period, house_id: HouseId) -> Option<BatchId> {
        self.purchases.get(&(period, house_id)).copied()
    }

    /// 冷却期判断: 最近 cooldown 个周期内无购入
    pub fn can_buy(&self, period: Period, cooldown_periods: u32) -> bool {
        self.purchases
            .keys()
            .all(|(bought_at, _)| period.saturating_sub(*bought_at) >= cooldown_periods)
    }

    // ==========================================
    // 动态结果写回
    // ==========================================

    /// 写回一次生长动态: 扣减死淘,归零时腾空鸡舍
    pub fn apply_dynamics(&mut self, batch_id: BatchId, yield_units: u64, losses: u32) -> DomainResult<()> {
        let batch = self.batch_mut(batch_id)?;
        let losses = losses.min(batch.population);
        batch.last_yield = yield_units;
        batch.last_losses = losses;
        batch.population -= losses;
        let emptied_house = if batch.population == 0 { batch.house_id } else { None };

        if let Some(house_id) = emptied_house {
            self.vacate(house_id)?;
        }
        Ok(())
    }

    // ==========================================
    // 不变量检查
    // ==========================================

    /// 返回违反的不变量描述（空表示一致）
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();
        for house in self.houses.values() {
            if house.occupant.is_some() && !house.active {
                violations.push(format!("鸡舍 {} 有批次但未激活", house.house_id));
            }
            if house.needs_disinfection && house.occupant.is_some() {
                violations.push(format!("鸡舍 {} 消毒中仍有批次", house.house_id));
            }
            if let Some(batch_id) = house.occupant {
                match self.batches.get(&batch_id) {
                    Some(batch) if batch.house_id == Some(house.house_id) => {}
                    _ => violations.push(format!(
                        "鸡舍 {} 与批次 {} 链接不一致",
                        house.house_id, batch_id
                    )),
                }
            }
        }
        for batch in self.batches.values() {
            if let Some(house_id) = batch.house_id {
                let linked = self
                    .houses
                    .get(&house_id)
                    .map(|h| h.occupant == Some(batch.batch_id))
                    .unwrap_or(false);
                if !linked {
                    violations.push(format!(
                        "批次 {} 指向鸡舍 {} 但未被登记",
                        batch.batch_id, house_id
                    ));
                }
            }
        }
        violations
    }
}
