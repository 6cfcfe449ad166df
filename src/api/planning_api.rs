// ==========================================
// 蛋鸡舍排产优化系统 - 排产优化 API
// ==========================================
// 职责: 请求 → 读取初始记录 → 初始化校正 → DP 搜索 → 回溯 → 结果表
// 红线: 结果不落库
// ==========================================

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::api::dto::{OptimizationRequest, OptimizationResponse, SolutionRow};
use crate::api::error::{ApiError, ApiResult};
use crate::config::OptimizerConfig;
use crate::domain::farm::{Farm, PurchaseOrder};
use crate::domain::types::{ActionCode, HouseId, HousePhase};
use crate::engine::search::period_date;
use crate::engine::{
    FarmInitializer, OptimalPlan, SearchDriver, SolutionExtractor, StateGenerator,
    TransitionEvaluator,
};
use crate::repository::{BatchRepository, GrowthCurveRepository, HouseRepository};

// ==========================================
// PlanningApi - 排产优化 API
// ==========================================
pub struct PlanningApi {
    house_repo: Arc<HouseRepository>,
    batch_repo: Arc<BatchRepository>,
    curve_repo: Arc<GrowthCurveRepository>,
    config: OptimizerConfig,
}

impl PlanningApi {
    pub fn new(
        house_repo: Arc<HouseRepository>,
        batch_repo: Arc<BatchRepository>,
        curve_repo: Arc<GrowthCurveRepository>,
        config: OptimizerConfig,
    ) -> Self {
        Self {
            house_repo,
            batch_repo,
            curve_repo,
            config,
        }
    }

    /// 共享同一连接创建全部仓储
    pub fn from_connection(conn: Arc<Mutex<Connection>>, config: OptimizerConfig) -> Self {
        Self::new(
            Arc::new(HouseRepository::from_connection(conn.clone())),
            Arc::new(BatchRepository::from_connection(conn.clone())),
            Arc::new(GrowthCurveRepository::from_connection(conn)),
            config,
        )
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// 执行一次排产优化
    ///
    /// # 错误
    /// - InvalidInput: 未指定鸡舍或鸡舍均不存在
    /// - ValidationError / AllocationError / DisinfectionInProgress: 初始数据问题
    /// - NoFeasibleState: 规划期末无可行状态
    #[instrument(skip(self, request), fields(run_id = tracing::field::Empty, horizon = request.projection_time))]
    pub fn optimize(&self, request: &OptimizationRequest) -> ApiResult<OptimizationResponse> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        if request.house_ids.is_empty() {
            return Err(ApiError::InvalidInput("鸡舍列表不能为空".to_string()));
        }

        // 1. 读取初始记录
        let houses = self.house_repo.find_by_ids(&request.house_ids)?;
        if houses.is_empty() {
            return Err(ApiError::InvalidInput("未找到任何指定鸡舍".to_string()));
        }
        if houses.len() < request.house_ids.len() {
            warn!(requested = request.house_ids.len(), found = houses.len(), "部分鸡舍不存在");
        }
        let batches = self.batch_repo.find_by_ids(&request.batch_ids)?;
        if batches.len() < request.batch_ids.len() {
            warn!(requested = request.batch_ids.len(), found = batches.len(), "部分批次不存在");
        }

        // 2. 购入参数（请求覆盖配置）
        let config = self.effective_config(request);
        let curve_id = config.default_curve_id;

        let mut curve_ids: Vec<_> = batches.iter().map(|b| b.curve_id).collect();
        curve_ids.push(curve_id);
        let catalog = self.curve_repo.load_catalog(&curve_ids)?;
        info!(houses = houses.len(), batches = batches.len(), curves = catalog.len(), "初始记录加载完成");

        // 3. 初始化校正
        let initial_farm = FarmInitializer::new(config.clone()).build(
            &houses,
            &batches,
            &catalog,
            request.initial_date,
        )?;

        // 4. 搜索与回溯
        let mut purchase = PurchaseOrder::new(config.default_breed_id, curve_id, config.buy_quantity);
        purchase.production_age_weeks = config.default_production_age_weeks;
        purchase.growth_curve = catalog.get(curve_id);

        let driver = SearchDriver::new(
            &config,
            StateGenerator::new(config.buy_threshold, config.buy_cooldown_periods),
            TransitionEvaluator::new(&config, purchase),
        );
        let table = driver.run(initial_farm.clone(), request.initial_date, request.projection_time)?;
        let plan = SolutionExtractor::extract(&table)?;

        // 5. 结果表
        let rows = build_solution_table(&plan, &initial_farm);
        info!(%run_id, max_value = plan.max_value, rows = rows.len(), "排产优化完成");

        Ok(OptimizationResponse {
            run_id,
            max_value: plan.max_value,
            actions: plan.actions,
            table: rows,
            config_snapshot: config,
        })
    }

    /// 请求中的购入参数覆写配置
    fn effective_config(&self, request: &OptimizationRequest) -> OptimizerConfig {
        let mut config = self.config.clone();
        if let Some(breed_id) = request.breed_id {
            config.default_breed_id = breed_id;
        }
        if let Some(curve_id) = request.curve_id {
            config.default_curve_id = curve_id;
        }
        if let Some(buy_quantity) = request.buy_quantity {
            config.buy_quantity = buy_quantity;
        }
        config
    }
}

// ==========================================
// 结果表构建（重放快照）
// ==========================================

/// 由各周期快照构建结果表
///
/// population_before 取上一周期快照中的数量（首周期取初始 Farm）
pub fn build_solution_table(plan: &OptimalPlan, initial_farm: &Farm) -> Vec<SolutionRow> {
    let mut rows = Vec::with_capacity(plan.actions.len());

    for (idx, (state, snapshot)) in plan.states.iter().zip(&plan.snapshots).enumerate() {
        let previous = if idx == 0 { initial_farm } else { &plan.snapshots[idx - 1] };
        let previous_state = idx.checked_sub(1).map(|i| &plan.states[i]);
        let date = period_date(plan.initial_date, state.period);

        for decision in &state.decisions {
            let batch_id = match decision.action {
                ActionCode::Buy => snapshot.purchase_for(decision.period, decision.house_id),
                _ => decision.batch_id,
            };
            let house_phase = snapshot
                .house(decision.house_id)
                .map(|h| h.phase)
                .unwrap_or(HousePhase::Unassigned);
            let batch = batch_id.and_then(|id| snapshot.batch(id));

            let (population_after, losses, yield_units) = batch
                .map(|b| (b.population, b.last_losses, b.last_yield))
                .unwrap_or((0, 0, 0));
            let population_before = batch_id
                .and_then(|id| previous.batch(id))
                .map(|b| b.population)
                .unwrap_or(population_after + losses);

            let transferred_from: Option<HouseId> = match (previous_state, batch_id) {
                (Some(prev), Some(id)) => prev
                    .decisions
                    .iter()
                    .find(|d| {
                        d.action == ActionCode::Transfer
                            && d.batch_id == Some(id)
                            && d.house_id != decision.house_id
                    })
                    .map(|d| d.house_id),
                _ => None,
            };

            rows.push(SolutionRow {
                period: decision.period,
                date,
                house_id: decision.house_id,
                house_phase,
                batch_id,
                age_days: batch.map(|b| b.age_days),
                age_weeks: batch.map(|b| b.age_weeks),
                action: decision.action,
                population_before,
                losses,
                population_after,
                yield_units,
                transferred_from,
            });
        }
    }
    rows
}
