// ==========================================
// 蛋鸡舍排产优化系统 - 搜索驱动 (DP)
// ==========================================
// 职责: 逐周期展开显式状态空间,每个状态只保留最优前驱
// 流程:
// 1) dp[0] = {初始状态: 价值 0, 初始 Farm, 无前驱}
// 2) 对 dp[t-1] 中每个状态: 克隆 Farm → 推进日期 → 生成候选
// 3) 每个候选在独立副本上评估（并行时按前驱分块）
// 4) 单写者逐个合并: 价值严格更大才替换,相等保留先到者
// 红线: 合并必须取最大值,不能后写覆盖
// ==========================================

use crate::config::OptimizerConfig;
use crate::domain::farm::Farm;
use crate::domain::types::Period;
use crate::engine::error::{EngineError, EngineResult};
use crate::engine::state_generator::{StateGenerator, SystemState};
use crate::engine::transition::TransitionEvaluator;
use chrono::{Duration, NaiveDate};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument, warn};

/// 周期 t 对应的模拟日期: initial_date + (t - 1) 天
pub fn period_date(initial_date: NaiveDate, period: Period) -> NaiveDate {
    initial_date + Duration::days(i64::from(period.saturating_sub(1)))
}

// ==========================================
// DpEntry / DpLayer / DpTable
// ==========================================

/// DP 表项
#[derive(Debug, Clone)]
pub struct DpEntry {
    pub state: SystemState,
    pub value: u64,                 // 累计产出
    pub farm: Farm,                 // 执行该状态后的 Farm 快照
    pub predecessor: Option<usize>, // 上一层表项下标
}

/// DP 层（按首次出现顺序保存,按状态索引去重）
#[derive(Debug, Clone, Default)]
pub struct DpLayer {
    entries: Vec<DpEntry>,
    index: BTreeMap<SystemState, usize>,
}

impl DpLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[DpEntry] {
        &self.entries
    }

    pub fn entry(&self, idx: usize) -> Option<&DpEntry> {
        self.entries.get(idx)
    }

    pub fn get(&self, state: &SystemState) -> Option<&DpEntry> {
        self.index.get(state).and_then(|idx| self.entries.get(*idx))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 取最大值合并
    ///
    /// # 返回
    /// true: 插入新状态或替换为更优前驱
    pub fn merge(&mut self, state: SystemState, value: u64, farm: Farm, predecessor: Option<usize>) -> bool {
        if let Some(&idx) = self.index.get(&state) {
            let existing = &mut self.entries[idx];
            if value > existing.value {
                existing.value = value;
                existing.farm = farm;
                existing.predecessor = predecessor;
                return true;
            }
            return false;
        }

        self.index.insert(state.clone(), self.entries.len());
        self.entries.push(DpEntry {
            state,
            value,
            farm,
            predecessor,
        });
        true
    }

    /// 价值最大的表项（相等取先到者）
    pub fn best(&self) -> Option<(usize, &DpEntry)> {
        let mut best: Option<(usize, &DpEntry)> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            match best {
                Some((_, current)) if entry.value <= current.value => {}
                _ => best = Some((idx, entry)),
            }
        }
        best
    }
}

/// DP 表: layers[t] 对应周期 t
#[derive(Debug, Clone)]
pub struct DpTable {
    pub initial_date: NaiveDate,
    pub layers: Vec<DpLayer>,
}

impl DpTable {
    pub fn horizon(&self) -> Period {
        self.layers.len().saturating_sub(1) as Period
    }

    pub fn layer(&self, period: Period) -> Option<&DpLayer> {
        self.layers.get(period as usize)
    }

    pub fn initial_farm(&self) -> Option<&Farm> {
        self.layers.first().and_then(|l| l.entries.first()).map(|e| &e.farm)
    }
}

// ==========================================
// SearchDriver - 搜索驱动
// ==========================================
pub struct SearchDriver {
    max_horizon_periods: u32,
    max_houses: usize,
    generator: StateGenerator,
    evaluator: TransitionEvaluator,
    pool: Option<rayon::ThreadPool>,
}

impl SearchDriver {
    pub fn new(config: &OptimizerConfig, generator: StateGenerator, evaluator: TransitionEvaluator) -> Self {
        let pool = if config.parallel_workers > 1 {
            match rayon::ThreadPoolBuilder::new()
                .num_threads(config.parallel_workers)
                .build()
            {
                Ok(pool) => Some(pool),
                Err(e) => {
                    warn!(error = %e, workers = config.parallel_workers, "线程池创建失败,改为串行评估");
                    None
                }
            }
        } else {
            None
        };

        Self {
            max_horizon_periods: config.max_horizon_periods,
            max_houses: config.max_houses,
            generator,
            evaluator,
            pool,
        }
    }

    pub fn evaluator(&self) -> &TransitionEvaluator {
        &self.evaluator
    }

    pub fn is_parallel(&self) -> bool {
        self.pool.is_some()
    }

    /// 执行 DP 搜索
    ///
    /// # 错误
    /// - Validation: 规划周期或鸡舍数量越界
    /// - 评估过程中的非分配类领域错误（中止,不返回部分结果）
    #[instrument(skip(self, initial_farm), fields(houses = initial_farm.house_count(), parallel = self.is_parallel()))]
    pub fn run(&self, initial_farm: Farm, initial_date: NaiveDate, horizon: Period) -> EngineResult<DpTable> {
        self.validate_bounds(&initial_farm, horizon)?;

        let mut layer0 = DpLayer::new();
        layer0.merge(SystemState::initial(), 0, initial_farm, None);
        let mut layers = vec![layer0];

        for period in 1..=horizon {
            let date = period_date(initial_date, period);
            let layer = self.expand(&layers[layers.len() - 1], period, date)?;

            let best_value = layer.best().map(|(_, e)| e.value).unwrap_or(0);
            info!(period, date = %date, states = layer.len(), best_value, "周期展开完成");
            layers.push(layer);
        }

        Ok(DpTable { initial_date, layers })
    }

    fn validate_bounds(&self, farm: &Farm, horizon: Period) -> EngineResult<()> {
        if horizon < 1 || horizon > self.max_horizon_periods {
            return Err(EngineError::Validation(format!(
                "规划周期超出范围: {} (允许 1..={})",
                horizon, self.max_horizon_periods
            )));
        }
        let houses = farm.house_count();
        if houses == 0 {
            return Err(EngineError::Validation("没有可用鸡舍".to_string()));
        }
        if houses > self.max_houses {
            return Err(EngineError::Validation(format!(
                "鸡舍数量超出上限: {} (上限 {})",
                houses, self.max_houses
            )));
        }
        Ok(())
    }

    /// 由上一层展开当前层
    ///
    /// 合并顺序固定为 (前驱顺序, 候选顺序),串行与并行结果一致
    fn expand(&self, previous: &DpLayer, period: Period, date: NaiveDate) -> EngineResult<DpLayer> {
        let mut layer = DpLayer::new();
        let mut candidate_count = 0usize;

        for (pred_idx, entry) in previous.entries().iter().enumerate() {
            let mut farm = entry.farm.clone();
            farm.advance_date(date);
            let candidates = self.generator.generate(&farm, period);
            candidate_count += candidates.len();

            match &self.pool {
                // 同一前驱的候选并行评估,随后按候选顺序合并
                Some(pool) => {
                    let results = pool.install(|| {
                        candidates
                            .par_iter()
                            .map(|state| self.evaluator.evaluate(state, farm.clone()))
                            .collect::<EngineResult<Vec<(u64, Farm)>>>()
                    })?;
                    for (state, (score, next)) in candidates.into_iter().zip(results) {
                        layer.merge(state, entry.value.saturating_add(score), next, Some(pred_idx));
                    }
                }
                // 逐个评估并立即合并,未胜出的副本随即释放
                None => {
                    for state in candidates {
                        let (score, next) = self.evaluator.evaluate(&state, farm.clone())?;
                        layer.merge(state, entry.value.saturating_add(score), next, Some(pred_idx));
                    }
                }
            }
        }

        debug!(period, predecessors = previous.len(), candidates = candidate_count, states = layer.len(), "候选评估完成");
        Ok(layer)
    }
}
