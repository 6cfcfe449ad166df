// ==========================================
// 蛋鸡舍排产优化系统 - 初始状态校正
// ==========================================
// 职责: 将外部鸡舍/批次记录构建为 Farm, 并校正初始分配
// 步骤:
// 1) 计算全部批次日龄（出生日期缺失或晚于初始日期 → 验证错误）
// 2) 建立批次与记录鸡舍的链接（容量/占用/消毒校验）
// 3) 周龄与鸡舍阶段不符的批次迁往空闲的对应阶段鸡舍
// 4) 其余批次继承所在鸡舍的阶段
// 红线: 任何错误在搜索开始前中止
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::batch::Batch;
use crate::domain::farm::Farm;
use crate::domain::growth_curve::GrowthCurveCatalog;
use crate::domain::house::House;
use crate::domain::records::{BatchRecord, HouseRecord};
use crate::domain::types::{BatchId, HouseId, HousePhase};
use crate::engine::error::{EngineError, EngineResult};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info, instrument, warn};

// ==========================================
// FarmInitializer - 初始状态校正
// ==========================================
pub struct FarmInitializer {
    config: OptimizerConfig,
}

impl FarmInitializer {
    pub fn new(config: OptimizerConfig) -> Self {
        Self { config }
    }

    /// 构建并校正初始 Farm
    ///
    /// # 错误
    /// - Validation: 记录缺失/非法、超容量、无可用校正目标
    /// - Domain(HouseOccupied): 两个批次登记在同一鸡舍
    /// - Domain(DisinfectionInProgress): 批次登记在消毒中的鸡舍
    #[instrument(skip_all, fields(
        houses = house_records.len(),
        batches = batch_records.len(),
        initial_date = %initial_date
    ))]
    pub fn build(
        &self,
        house_records: &[HouseRecord],
        batch_records: &[BatchRecord],
        curves: &GrowthCurveCatalog,
        initial_date: NaiveDate,
    ) -> EngineResult<Farm> {
        info!("开始初始化养殖场状态");

        if house_records.is_empty() {
            return Err(EngineError::Validation("没有可用鸡舍".to_string()));
        }

        let mut farm = Farm::new(initial_date).with_disinfection_days(self.config.disinfection_days);

        // 1. 注册鸡舍
        let mut seen_houses = BTreeSet::new();
        for record in house_records {
            if !seen_houses.insert(record.house_id) {
                return Err(EngineError::Validation(format!("鸡舍ID重复: {}", record.house_id)));
            }
            let mut house = House::new(record.house_id, record.capacity, record.phase, initial_date);
            house.name = record.name.clone();
            house.needs_disinfection = record.needs_disinfection;
            farm.insert_house(house);
        }

        // 2. 注册批次并计算日龄
        let mut seen_batches = BTreeSet::new();
        for record in batch_records {
            if !seen_batches.insert(record.batch_id) {
                return Err(EngineError::Validation(format!("批次ID重复: {}", record.batch_id)));
            }
            let birth_date = record.birth_date.ok_or_else(|| {
                EngineError::Validation(format!("批次 {} 缺少有效出生日期", record.batch_id))
            })?;
            if birth_date > initial_date {
                return Err(EngineError::Validation(format!(
                    "批次 {} 出生日期 {} 晚于初始日期 {}",
                    record.batch_id, birth_date, initial_date
                )));
            }

            let curve = curves.get(record.curve_id);
            if curve.is_none() {
                warn!(batch_id = record.batch_id, curve_id = record.curve_id, "批次生长曲线缺失");
            }
            let mut batch = Batch::new(
                record.batch_id,
                record.breed_id,
                record.curve_id,
                record.population,
                birth_date,
                initial_date,
            )
            .with_growth_curve(curve);
            batch.name = record.name.clone();
            batch.production_age_weeks = record
                .production_age_weeks
                .unwrap_or(self.config.default_production_age_weeks);
            debug!(batch_id = batch.batch_id, age_weeks = batch.age_weeks, house_id = ?record.house_id, "批次日龄");
            farm.insert_batch(batch);
        }

        // 3. 建立初始链接
        for record in batch_records {
            let Some(house_id) = record.house_id else {
                continue;
            };
            let capacity = farm
                .house(house_id)
                .map(|h| h.capacity)
                .ok_or_else(|| {
                    EngineError::Validation(format!(
                        "批次 {} 登记的鸡舍 {} 不存在",
                        record.batch_id, house_id
                    ))
                })?;
            if record.population > capacity {
                return Err(EngineError::Validation(format!(
                    "批次 {} (数量={}) 超出鸡舍 {} 容量 (容量={})",
                    record.batch_id, record.population, house_id, capacity
                )));
            }
            farm.allocate(record.batch_id, house_id)?;
            info!(batch_id = record.batch_id, house_id, "初始分配");
        }

        // 4. 识别阶段不符的批次
        let (to_production, to_rearing) = self.find_mismatches(&farm);
        let mut free_production = self.free_houses(&farm, HousePhase::Production);
        let mut free_rearing = self.free_houses(&farm, HousePhase::Rearing);

        // 5. 清空不符批次的原鸡舍（不排定消毒）
        for (batch_id, source) in to_production.iter().chain(to_rearing.iter()) {
            farm.detach(*source)?;
            info!(batch_id, house_id = source, "清空原鸡舍以便重新分配");
        }

        // 6. 重新分配到空闲鸡舍
        for (batch_id, _) in &to_production {
            let target = free_production.pop().ok_or_else(|| {
                EngineError::Validation(format!("批次 {} 没有可用的产蛋鸡舍", batch_id))
            })?;
            farm.allocate(*batch_id, target)?;
            info!(batch_id, house_id = target, "重新分配到产蛋鸡舍");
        }
        for (batch_id, _) in &to_rearing {
            let target = free_rearing.pop().ok_or_else(|| {
                EngineError::Validation(format!("批次 {} 没有可用的育成鸡舍", batch_id))
            })?;
            farm.allocate(*batch_id, target)?;
            info!(batch_id, house_id = target, "重新分配到育成鸡舍");
        }

        for house in farm.houses() {
            info!(
                house_id = house.house_id,
                phase = %house.phase,
                occupant = ?house.occupant,
                activation = %house.activation_state(),
                disinfection_due = ?house.disinfection_due,
                "初始化后鸡舍状态"
            );
        }
        info!("初始化完成");

        Ok(farm)
    }

    /// 周龄与鸡舍阶段不符的批次
    ///
    /// # 返回
    /// (应转入产蛋舍的批次, 应转回育成舍的批次), 元素为 (batch_id, 原鸡舍)
    fn find_mismatches(&self, farm: &Farm) -> (Vec<(BatchId, HouseId)>, Vec<(BatchId, HouseId)>) {
        let max_age = i64::from(self.config.rearing_max_age_weeks);
        let mut to_production = Vec::new();
        let mut to_rearing = Vec::new();

        for house in farm.houses() {
            let Some(batch) = farm.occupant_of(house.house_id) else {
                continue;
            };
            match house.phase {
                HousePhase::Rearing if batch.age_weeks >= max_age => {
                    info!(batch_id = batch.batch_id, age_weeks = batch.age_weeks, "周龄超过育成上限,需转入产蛋舍");
                    to_production.push((batch.batch_id, house.house_id));
                }
                HousePhase::Production | HousePhase::PreCull if batch.age_weeks < max_age => {
                    info!(batch_id = batch.batch_id, age_weeks = batch.age_weeks, "周龄未达育成上限,需转回育成舍");
                    to_rearing.push((batch.batch_id, house.house_id));
                }
                _ => {}
            }
        }
        (to_production, to_rearing)
    }

    /// 空闲且洁净的指定阶段鸡舍（按 house_id 升序）
    fn free_houses(&self, farm: &Farm, phase: HousePhase) -> Vec<HouseId> {
        farm.houses()
            .filter(|h| h.phase == phase && h.occupant.is_none() && !h.needs_disinfection)
            .map(|h| h.house_id)
            .collect()
    }
}
