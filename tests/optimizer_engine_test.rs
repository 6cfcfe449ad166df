// ==========================================
// 优化引擎集成测试
// ==========================================
// 测试目标: 初始化校正 → DP 搜索 → 回溯 → 重放 全流程性质
// ==========================================

mod helpers;

use chrono::Duration;
use helpers::farm_builder::{date, standard_catalog, BatchBuilder, HouseBuilder};
use layer_house_planner::config::OptimizerConfig;
use layer_house_planner::domain::{
    ActionCode, Farm, GrowthCurveCatalog, House, HouseActivation, HousePhase, PurchaseOrder,
};
use layer_house_planner::engine::{
    period_date, DpTable, EngineError, FarmInitializer, OptimalPlan, SearchDriver,
    SolutionExtractor, StateGenerator, TransitionEvaluator,
};
use layer_house_planner::logging;

// ==========================================
// 测试辅助
// ==========================================

fn driver(config: &OptimizerConfig, catalog: &GrowthCurveCatalog) -> SearchDriver {
    let mut purchase = PurchaseOrder::new(
        config.default_breed_id,
        config.default_curve_id,
        config.buy_quantity,
    );
    purchase.growth_curve = catalog.get(config.default_curve_id);
    SearchDriver::new(
        config,
        StateGenerator::new(config.buy_threshold, config.buy_cooldown_periods),
        TransitionEvaluator::new(config, purchase),
    )
}

/// 育成 / 产蛋 / 产蛋 / 淘汰前 四个鸡舍, 三个在舍批次
fn demo_farm(config: &OptimizerConfig, catalog: &GrowthCurveCatalog) -> Farm {
    let start = date(2024, 5, 1);
    let houses = vec![
        HouseBuilder::new(1).capacity(60_000).phase(HousePhase::Rearing).build(),
        HouseBuilder::new(2).capacity(55_000).phase(HousePhase::Production).build(),
        HouseBuilder::new(3).capacity(55_000).phase(HousePhase::Production).build(),
        HouseBuilder::new(4).capacity(50_000).phase(HousePhase::PreCull).build(),
    ];
    let batches = vec![
        BatchBuilder::new(101).population(52_000).aged_weeks(17, start).in_house(1).build(),
        BatchBuilder::new(102).population(50_000).aged_weeks(45, start).in_house(2).build(),
        BatchBuilder::new(103).population(42_000).aged_weeks(80, start).in_house(4).build(),
    ];
    FarmInitializer::new(config.clone())
        .build(&houses, &batches, catalog, start)
        .expect("初始化失败")
}

fn solve(config: &OptimizerConfig, horizon: u32) -> (Farm, DpTable, OptimalPlan) {
    let catalog = standard_catalog();
    let farm = demo_farm(config, &catalog);
    let table = driver(config, &catalog)
        .run(farm.clone(), date(2024, 5, 1), horizon)
        .expect("搜索失败");
    let plan = SolutionExtractor::extract(&table).expect("回溯失败");
    (farm, table, plan)
}

// ==========================================
// 测试用例
// ==========================================

#[test]
fn test_house_invariants_hold_in_every_explored_state() {
    logging::init_test();
    let (_, table, _) = solve(&OptimizerConfig::default(), 4);

    for (period, layer) in table.layers.iter().enumerate() {
        for entry in layer.entries() {
            let violations = entry.farm.invariant_violations();
            assert!(violations.is_empty(), "period {}: {:?}", period, violations);
            for house in entry.farm.houses() {
                if house.occupant.is_some() {
                    assert!(house.active);
                }
                if house.needs_disinfection {
                    assert!(house.occupant.is_none());
                }
            }
        }
    }
}

#[test]
fn test_existing_batch_population_never_increases() {
    let (initial, _, plan) = solve(&OptimizerConfig::default(), 4);

    let mut previous = &initial;
    for snapshot in &plan.snapshots {
        for batch in previous.batches() {
            let now = snapshot.batch(batch.batch_id).expect("批次不应消失");
            assert!(now.population <= batch.population);
        }
        previous = snapshot;
    }
}

#[test]
fn test_advance_date_is_idempotent() {
    let config = OptimizerConfig::default();
    let mut farm = demo_farm(&config, &standard_catalog());
    let target = date(2024, 5, 20);

    farm.advance_date(target);
    let once: Vec<_> = farm.batches().map(|b| (b.age_days, b.age_weeks, b.phase)).collect();
    farm.advance_date(target);
    let twice: Vec<_> = farm.batches().map(|b| (b.age_days, b.age_weeks, b.phase)).collect();

    assert_eq!(once, twice);
}

#[test]
fn test_search_is_deterministic() {
    let config = OptimizerConfig::default();
    let (_, _, first) = solve(&config, 4);
    let (_, _, second) = solve(&config, 4);

    assert_eq!(first.max_value, second.max_value);
    assert_eq!(first.actions, second.actions);
    assert_eq!(first.states, second.states);
}

#[test]
fn test_parallel_search_matches_serial() {
    let serial = OptimizerConfig::default();
    let parallel = OptimizerConfig {
        parallel_workers: 3,
        ..OptimizerConfig::default()
    };
    let (_, _, a) = solve(&serial, 4);
    let (_, _, b) = solve(&parallel, 4);

    assert_eq!(a.max_value, b.max_value);
    assert_eq!(a.actions, b.actions);
}

#[test]
fn test_replay_reproduces_max_value() {
    let config = OptimizerConfig::default();
    let catalog = standard_catalog();
    let search = driver(&config, &catalog);
    let (initial, _, plan) = solve(&config, 4);

    assert!(plan.max_value > 0);
    let replayed =
        SolutionExtractor::replay(&initial, date(2024, 5, 1), &plan.states, search.evaluator())
            .unwrap();
    assert_eq!(replayed, plan.max_value);
}

#[test]
fn test_action_sequence_covers_every_house_every_period() {
    let (_, _, plan) = solve(&OptimizerConfig::default(), 3);

    assert_eq!(plan.actions.len(), 3 * 4);
    for (idx, action) in plan.actions.iter().enumerate() {
        assert_eq!(action.period as usize, idx / 4 + 1);
        assert_eq!(action.house_id as usize, idx % 4 + 1);
    }
    // 育成批次 17 周,三个周期内只能留舍
    assert!(plan
        .actions
        .iter()
        .filter(|a| a.house_id == 1)
        .all(|a| a.action == ActionCode::Remain && a.batch_id == Some(101)));
}

#[test]
fn test_single_empty_rearing_house_single_period_is_zero() {
    let config = OptimizerConfig::default();
    let catalog = standard_catalog();
    let start = date(2024, 5, 1);
    let farm = FarmInitializer::new(config.clone())
        .build(
            &[HouseBuilder::new(1).capacity(60_000).phase(HousePhase::Rearing).build()],
            &[],
            &catalog,
            start,
        )
        .unwrap();

    let generator = StateGenerator::new(config.buy_threshold, config.buy_cooldown_periods);
    let offered: Vec<_> = generator
        .legal_actions(&farm, farm.house(1).unwrap(), 1)
        .into_iter()
        .map(|d| d.action)
        .collect();
    assert_eq!(offered, vec![ActionCode::Idle, ActionCode::Buy]);

    let plan = SolutionExtractor::extract(&driver(&config, &catalog).run(farm, start, 1).unwrap())
        .unwrap();
    assert_eq!(plan.max_value, 0);
    assert_eq!(plan.actions[0].action, ActionCode::Idle);
}

#[test]
fn test_batch_reaching_production_age_is_transferred() {
    let config = OptimizerConfig::default();
    let catalog = standard_catalog();
    let start = date(2024, 5, 1);
    // 初始 18 周 6 天, 第 2 周期满 19 周
    let birth = start - Duration::weeks(19) + Duration::days(1);
    let farm = FarmInitializer::new(config.clone())
        .build(
            &[
                HouseBuilder::new(1).capacity(20_000).phase(HousePhase::Rearing).build(),
                HouseBuilder::new(2).capacity(20_000).phase(HousePhase::Production).build(),
            ],
            &[BatchBuilder::new(7).population(15_000).born(birth).in_house(1).build()],
            &catalog,
            start,
        )
        .unwrap();
    assert_eq!(farm.batch(7).unwrap().house_id, Some(1));

    // 第 2 周期: 生成器给出 TRANSFER
    let generator = StateGenerator::new(config.buy_threshold, config.buy_cooldown_periods);
    let mut dated = farm.clone();
    dated.advance_date(period_date(start, 2));
    let offered: Vec<_> = generator
        .legal_actions(&dated, dated.house(1).unwrap(), 2)
        .into_iter()
        .map(|d| d.action)
        .collect();
    assert_eq!(offered, vec![ActionCode::Transfer]);

    // 搜索: 第 2 周期执行转场,批次落入产蛋舍
    let plan = SolutionExtractor::extract(&driver(&config, &catalog).run(farm, start, 2).unwrap())
        .unwrap();
    let transfer = plan
        .actions
        .iter()
        .find(|a| a.period == 2 && a.house_id == 1)
        .unwrap();
    assert_eq!(transfer.action, ActionCode::Transfer);
    let after = plan.snapshot(2).unwrap();
    assert_eq!(after.batch(7).unwrap().house_id, Some(2));
    assert_eq!(after.batch(7).unwrap().phase, HousePhase::Production);
    assert!(after.house(1).unwrap().needs_disinfection);
}

#[test]
fn test_overdue_disinfection_becomes_transfer_destination() {
    let today = date(2024, 5, 1);
    let mut farm = Farm::new(today);
    farm.insert_house(House::new(1, 20_000, HousePhase::Rearing, today));

    let mut dirty = House::new(2, 20_000, HousePhase::Production, today);
    dirty.needs_disinfection = true;
    dirty.disinfection_due = Some(today - Duration::days(1));
    dirty.active = true;
    farm.insert_house(dirty);

    assert_eq!(
        farm.house(2).unwrap().activation_state(),
        HouseActivation::ActiveDisinfecting
    );
    assert_eq!(farm.check_activation(2).unwrap(), HouseActivation::Inactive);
    assert_eq!(farm.find_destination(HousePhase::Production, 15_000), Some(2));

    // 激活检查后,下一次生成只给出 IDLE
    let generator = StateGenerator::new(60_000, 14);
    let offered: Vec<_> = generator
        .legal_actions(&farm, farm.house(2).unwrap(), 1)
        .into_iter()
        .map(|d| d.action)
        .collect();
    assert_eq!(offered, vec![ActionCode::Idle]);
}

#[test]
fn test_disinfecting_house_is_never_allocated_before_due() {
    let config = OptimizerConfig::default();
    let catalog = standard_catalog();
    let start = date(2024, 5, 1);
    let err = FarmInitializer::new(config.clone())
        .build(
            &[
                HouseBuilder::new(1).capacity(20_000).phase(HousePhase::Rearing).build(),
                HouseBuilder::new(2).capacity(20_000).phase(HousePhase::Production).dirty().build(),
            ],
            &[BatchBuilder::new(7).population(15_000).aged_weeks(25, start).in_house(1).build()],
            &catalog,
            start,
        )
        .unwrap_err();

    // 25 周批次在育成舍需要校正,但唯一的产蛋舍在消毒中
    assert!(matches!(err, EngineError::Validation(_)));
}

#[test]
fn test_horizon_outside_bounds_is_rejected() {
    let config = OptimizerConfig {
        max_horizon_periods: 3,
        ..OptimizerConfig::default()
    };
    let catalog = standard_catalog();
    let farm = demo_farm(&config, &catalog);

    let err = driver(&config, &catalog).run(farm, date(2024, 5, 1), 4).unwrap_err();
    assert!(matches!(err, EngineError::Validation(_)));
}
