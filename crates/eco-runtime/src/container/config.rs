//! # Engine Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! ## Sources (later wins)
//!
//! 1. Built-in defaults (the values the original app shipped with)
//! 2. Optional JSON file named by `ECO_CONFIG`
//! 3. Individual environment overrides (`ECO_DATA_DIR`, `ECO_OPENING_BALANCE`,
//!    `ECO_COUPON_DELAY_MS`, `ECO_TICK_MS`, `ECO_CHECK_IN_COINS`,
//!    `ECO_SEED_DEMO_COUPONS`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use eco_03_coupon_registry::RewardCouponPolicy;
use eco_04_notification_scheduler::{ChainTiming, DEFAULT_TRANSCRIPT_CAPACITY};
use eco_02_quest_engine::{XpCurve, DEFAULT_STARTING_XP, DEFAULT_XP_PER_LEVEL};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid value for {var}: {value:?}")]
    Env { var: &'static str, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub ledger: LedgerConfig,
    pub quests: QuestConfig,
    pub coupons: CouponConfig,
    pub scheduler: SchedulerConfig,
    pub check_in: CheckInConfig,
    pub storage: StorageConfig,
}

impl EngineConfig {
    /// Load configuration from `ECO_CONFIG` (if set) and the environment,
    /// then validate it.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("ECO_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file. Missing sections keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(dir) = lookup("ECO_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(v) = parse_env(&lookup, "ECO_OPENING_BALANCE")? {
            self.ledger.opening_balance = v;
        }
        if let Some(v) = parse_env(&lookup, "ECO_COUPON_DELAY_MS")? {
            self.scheduler.coupon_delay_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "ECO_TICK_MS")? {
            self.scheduler.tick_ms = v;
        }
        if let Some(v) = parse_env(&lookup, "ECO_CHECK_IN_COINS")? {
            self.check_in.coins = v;
        }
        if let Some(v) = parse_env(&lookup, "ECO_SEED_DEMO_COUPONS")? {
            self.coupons.seed_demo_coupons = v;
        }
        Ok(())
    }

    /// Reject values no subsystem can work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if i64::try_from(self.ledger.opening_balance).is_err() {
            return Err(ConfigError::Invalid(
                "ledger.opening_balance exceeds the ledger range".into(),
            ));
        }
        if self.quests.xp_per_level == 0 {
            return Err(ConfigError::Invalid("quests.xp_per_level must be > 0".into()));
        }
        self.coupons
            .reward
            .validate()
            .map_err(ConfigError::Invalid)?;
        if self.scheduler.tick_ms == 0 {
            return Err(ConfigError::Invalid("scheduler.tick_ms must be > 0".into()));
        }
        if self.scheduler.transcript_capacity == 0 {
            return Err(ConfigError::Invalid(
                "scheduler.transcript_capacity must be > 0".into(),
            ));
        }
        if self.check_in.coins == 0 || i64::try_from(self.check_in.coins).is_err() {
            return Err(ConfigError::Invalid(
                "check_in.coins must be a positive ledger amount".into(),
            ));
        }
        if self.check_in.reason.trim().is_empty() {
            return Err(ConfigError::Invalid("check_in.reason is empty".into()));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
    }
}

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Balance recorded as the first entry of a fresh ledger.
    pub opening_balance: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            opening_balance: 850,
        }
    }
}

/// Quest engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuestConfig {
    /// XP of a fresh profile.
    pub starting_xp: u64,
    pub xp_per_level: u64,
}

impl QuestConfig {
    pub fn curve(&self) -> XpCurve {
        XpCurve {
            xp_per_level: self.xp_per_level,
        }
    }
}

impl Default for QuestConfig {
    fn default() -> Self {
        Self {
            starting_xp: DEFAULT_STARTING_XP,
            xp_per_level: DEFAULT_XP_PER_LEVEL,
        }
    }
}

/// Coupon registry configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CouponConfig {
    /// Coupon granted for each completed challenge.
    pub reward: RewardCouponPolicy,
    /// Install the demo wallet on first boot.
    pub seed_demo_coupons: bool,
}

impl Default for CouponConfig {
    fn default() -> Self {
        Self {
            reward: RewardCouponPolicy::default(),
            seed_demo_coupons: true,
        }
    }
}

/// Notification scheduler configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Delay from completion to the coin award.
    pub coin_delay_ms: u64,
    /// Delay from the coin award to the coupon unlock.
    pub coupon_delay_ms: u64,
    /// Host loop interval.
    pub tick_ms: u64,
    pub transcript_capacity: usize,
}

impl SchedulerConfig {
    pub fn timing(&self) -> ChainTiming {
        ChainTiming {
            coin_delay_ms: self.coin_delay_ms,
            coupon_delay_ms: self.coupon_delay_ms,
        }
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        let timing = ChainTiming::default();
        Self {
            coin_delay_ms: timing.coin_delay_ms,
            coupon_delay_ms: timing.coupon_delay_ms,
            tick_ms: 50,
            transcript_capacity: DEFAULT_TRANSCRIPT_CAPACITY,
        }
    }
}

/// Daily check-in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckInConfig {
    pub coins: u64,
    /// Ledger audit reason.
    pub reason: String,
}

impl Default for CheckInConfig {
    fn default() -> Self {
        Self {
            coins: 5,
            reason: "Daily check-in reward".to_string(),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the snapshot and its lock file.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.ledger.opening_balance, 850);
        assert_eq!(config.quests.starting_xp, 1250);
        assert_eq!(config.scheduler.coupon_delay_ms, 2_000);
        assert_eq!(config.scheduler.coin_delay_ms, 100);
        assert_eq!(config.check_in.coins, 5);
        assert!(config.coupons.seed_demo_coupons);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EngineConfig::default();
        config
            .apply_env(env(&[
                ("ECO_DATA_DIR", "/tmp/eco"),
                ("ECO_OPENING_BALANCE", "100"),
                ("ECO_COUPON_DELAY_MS", "10"),
                ("ECO_TICK_MS", "5"),
                ("ECO_CHECK_IN_COINS", "7"),
                ("ECO_SEED_DEMO_COUPONS", "false"),
            ]))
            .unwrap();

        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/eco"));
        assert_eq!(config.ledger.opening_balance, 100);
        assert_eq!(config.scheduler.coupon_delay_ms, 10);
        assert_eq!(config.scheduler.tick(), Duration::from_millis(5));
        assert_eq!(config.check_in.coins, 7);
        assert!(!config.coupons.seed_demo_coupons);
    }

    #[test]
    fn test_bad_env_value_is_reported() {
        let mut config = EngineConfig::default();
        let err = config
            .apply_env(env(&[("ECO_TICK_MS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Env { var: "ECO_TICK_MS", .. }));
    }

    #[test]
    fn test_validate_rejects_zero_tick() {
        let mut config = EngineConfig::default();
        config.scheduler.tick_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_brand_pool() {
        let mut config = EngineConfig::default();
        config.coupons.reward.brands.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_oversized_coupon_validity() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eco.json");
        std::fs::write(
            &path,
            r#"{ "coupons": { "reward": { "valid_for_days": 9223372036854775 } } }"#,
        )
        .unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eco.json");
        std::fs::write(&path, r#"{ "ledger": { "opening_balance": 10 } }"#).unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(config.ledger.opening_balance, 10);
        assert_eq!(config.check_in, CheckInConfig::default());
    }

    #[test]
    fn test_unparseable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("eco.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            EngineConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
