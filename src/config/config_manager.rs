// ==========================================
// 蛋鸡舍排产优化系统 - 配置管理器
// ==========================================
// 存储: config_kv 表, 只使用 scope_id = 'global'
// 规则: 缺失或无法解析的值回退到 OptimizerConfig 默认值
// ==========================================

use crate::config::config_reader_trait::OptimizerConfigReader;
use crate::config::optimizer_config::OptimizerConfig;
use crate::db::open_sqlite_connection;
use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

type ConfigResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

const DEFAULTS: OptimizerConfig = OptimizerConfig::DEFAULT;

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    pub fn new(db_path: &str) -> ConfigResult<Self> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;
        Ok(Self::wrap(conn))
    }

    /// 复用共享连接（与仓储层共用同一数据库）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> ConfigResult<Self> {
        crate::db::ensure_schema(&*Self::lock_shared(&conn)?)?;
        Ok(Self { conn })
    }

    fn wrap(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    fn lock_shared(conn: &Arc<Mutex<Connection>>) -> ConfigResult<MutexGuard<'_, Connection>> {
        conn.lock()
            .map_err(|e| format!("配置库锁获取失败: {}", e).into())
    }

    fn get_config_value(&self, key: &str) -> ConfigResult<Option<String>> {
        let conn = Self::lock_shared(&self.conn)?;
        let value = conn
            .query_row(
                "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// 读取数值配置,缺失或格式错误时取默认值
    fn get_parsed_or_default<T>(&self, key: &str, default: T) -> ConfigResult<T>
    where
        T: FromStr + Copy,
    {
        let value = match self.get_config_value(key)? {
            Some(v) => v,
            None => return Ok(default),
        };
        match value.trim().parse::<T>() {
            Ok(parsed) => Ok(parsed),
            Err(_) => {
                tracing::warn!(config_key = key, raw_value = %value, "配置格式错误，使用默认值");
                Ok(default)
            }
        }
    }

    /// 写入 global 配置（已存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> ConfigResult<()> {
        Self::lock_shared(&self.conn)?.execute(
            "INSERT INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)
             ON CONFLICT(scope_id, key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }

    /// 生效配置快照（JSON,缺失与格式错误项已替换为默认值）
    pub async fn get_config_snapshot(&self) -> ConfigResult<String> {
        let config = self.load_optimizer_config().await?;
        Ok(serde_json::to_string(&config)?)
    }
}

// ==========================================
// OptimizerConfigReader Trait 实现
// ==========================================
#[async_trait]
impl OptimizerConfigReader for ConfigManager {
    // ===== 购入配置 =====

    async fn get_buy_threshold(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::BUY_THRESHOLD, DEFAULTS.buy_threshold)
    }

    async fn get_buy_quantity(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::BUY_QUANTITY, DEFAULTS.buy_quantity)
    }

    async fn get_buy_cooldown_periods(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::BUY_COOLDOWN_PERIODS, DEFAULTS.buy_cooldown_periods)
    }

    async fn get_default_breed_id(&self) -> ConfigResult<i64> {
        self.get_parsed_or_default(config_keys::DEFAULT_BREED_ID, DEFAULTS.default_breed_id)
    }

    async fn get_default_curve_id(&self) -> ConfigResult<i64> {
        self.get_parsed_or_default(config_keys::DEFAULT_CURVE_ID, DEFAULTS.default_curve_id)
    }

    // ===== 出售配置 =====

    async fn get_sell_quantity(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::SELL_QUANTITY, DEFAULTS.sell_quantity)
    }

    // ===== 生命周期配置 =====

    async fn get_disinfection_days(&self) -> ConfigResult<i64> {
        self.get_parsed_or_default(config_keys::DISINFECTION_DAYS, DEFAULTS.disinfection_days)
    }

    async fn get_rearing_max_age_weeks(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::REARING_MAX_AGE_WEEKS, DEFAULTS.rearing_max_age_weeks)
    }

    async fn get_default_production_age_weeks(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(
            config_keys::DEFAULT_PRODUCTION_AGE_WEEKS,
            DEFAULTS.default_production_age_weeks,
        )
    }

    // ===== 运行配置 =====

    async fn get_parallel_workers(&self) -> ConfigResult<usize> {
        let workers = self.get_parsed_or_default(config_keys::PARALLEL_WORKERS, DEFAULTS.parallel_workers)?;
        Ok(workers.max(1))
    }

    async fn get_max_horizon_periods(&self) -> ConfigResult<u32> {
        self.get_parsed_or_default(config_keys::MAX_HORIZON_PERIODS, DEFAULTS.max_horizon_periods)
    }

    async fn get_max_houses(&self) -> ConfigResult<usize> {
        self.get_parsed_or_default(config_keys::MAX_HOUSES, DEFAULTS.max_houses)
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    // 购入
    pub const BUY_THRESHOLD: &str = "buy_threshold";
    pub const BUY_QUANTITY: &str = "buy_quantity";
    pub const BUY_COOLDOWN_PERIODS: &str = "buy_cooldown_periods";
    pub const DEFAULT_BREED_ID: &str = "default_breed_id";
    pub const DEFAULT_CURVE_ID: &str = "default_curve_id";

    // 出售
    pub const SELL_QUANTITY: &str = "sell_quantity";

    // 生命周期
    pub const DISINFECTION_DAYS: &str = "disinfection_days";
    pub const REARING_MAX_AGE_WEEKS: &str = "rearing_max_age_weeks";
    pub const DEFAULT_PRODUCTION_AGE_WEEKS: &str = "default_production_age_weeks";

    // 运行
    pub const PARALLEL_WORKERS: &str = "parallel_workers";
    pub const MAX_HORIZON_PERIODS: &str = "max_horizon_periods";
    pub const MAX_HOUSES: &str = "max_houses";
}
