// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::NaiveDate;
use layer_house_planner::domain::{
    BatchRecord, CurveSample, GrowthCurve, GrowthCurveCatalog, HousePhase, HouseRecord,
};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ==========================================
// HouseRecord 构建器
// ==========================================

pub struct HouseBuilder {
    house_id: i64,
    capacity: u32,
    phase: HousePhase,
    needs_disinfection: bool,
}

impl HouseBuilder {
    pub fn new(house_id: i64) -> Self {
        Self {
            house_id,
            capacity: 60_000,
            phase: HousePhase::Rearing,
            needs_disinfection: false,
        }
    }

    pub fn capacity(mut self, capacity: u32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn phase(mut self, phase: HousePhase) -> Self {
        self.phase = phase;
        self
    }

    pub fn dirty(mut self) -> Self {
        self.needs_disinfection = true;
        self
    }

    pub fn build(self) -> HouseRecord {
        HouseRecord {
            house_id: self.house_id,
            name: Some(format!("H{:02}", self.house_id)),
            capacity: self.capacity,
            phase: self.phase,
            needs_disinfection: self.needs_disinfection,
        }
    }
}

// ==========================================
// BatchRecord 构建器
// ==========================================

pub struct BatchBuilder {
    batch_id: i64,
    population: u32,
    birth_date: Option<NaiveDate>,
    house_id: Option<i64>,
    curve_id: i64,
}

impl BatchBuilder {
    pub fn new(batch_id: i64) -> Self {
        Self {
            batch_id,
            population: 10_000,
            birth_date: Some(date(2024, 1, 1)),
            house_id: None,
            curve_id: 1,
        }
    }

    pub fn population(mut self, population: u32) -> Self {
        self.population = population;
        self
    }

    pub fn born(mut self, birth_date: NaiveDate) -> Self {
        self.birth_date = Some(birth_date);
        self
    }

    /// 以 as_of 为基准倒推出生日期
    pub fn aged_weeks(mut self, weeks: i64, as_of: NaiveDate) -> Self {
        self.birth_date = Some(as_of - chrono::Duration::weeks(weeks));
        self
    }

    pub fn no_birth_date(mut self) -> Self {
        self.birth_date = None;
        self
    }

    pub fn in_house(mut self, house_id: i64) -> Self {
        self.house_id = Some(house_id);
        self
    }

    pub fn curve(mut self, curve_id: i64) -> Self {
        self.curve_id = curve_id;
        self
    }

    pub fn build(self) -> BatchRecord {
        BatchRecord {
            batch_id: self.batch_id,
            name: Some(format!("B{}", self.batch_id)),
            breed_id: 1,
            curve_id: self.curve_id,
            population: self.population,
            birth_date: self.birth_date,
            house_id: self.house_id,
            production_age_weeks: None,
        }
    }
}

// ==========================================
// 生长曲线
// ==========================================

pub fn standard_curve(curve_id: i64) -> GrowthCurve {
    GrowthCurve::new(
        curve_id,
        vec![
            CurveSample { age_weeks: 0, yield_rate: 0.0, loss_rate: 0.002 },
            CurveSample { age_weeks: 19, yield_rate: 0.5, loss_rate: 0.001 },
            CurveSample { age_weeks: 30, yield_rate: 0.9, loss_rate: 0.001 },
            CurveSample { age_weeks: 70, yield_rate: 0.7, loss_rate: 0.002 },
        ],
    )
}

pub fn standard_catalog() -> GrowthCurveCatalog {
    let mut catalog = GrowthCurveCatalog::new();
    catalog.insert(standard_curve(1));
    catalog
}
