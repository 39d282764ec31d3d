//! Engine configuration file support.
//!
//! This module provides utilities for reading scheduler configuration from
//! TOML configuration files, with environment-variable overrides.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

fn default_horizon_days() -> u32 {
    14
}

fn default_min_daily_hours() -> f64 {
    2.0
}

fn default_slot_granularity_hours() -> f64 {
    1.0
}

/// Scheduler configuration.
///
/// Defaults: a 14-day lookahead horizon, a 2-hour minimum daily session,
/// and whole-hour candidate steps in the single-day slot scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Number of future days the multi-day allocator searches.
    #[serde(default = "default_horizon_days")]
    pub horizon_days: u32,
    /// Shortest session the allocator will create on a single day.
    #[serde(default = "default_min_daily_hours")]
    pub min_daily_hours: f64,
    /// Step between candidate start times in the single-day scan.
    #[serde(default = "default_slot_granularity_hours")]
    pub slot_granularity_hours: f64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            horizon_days: default_horizon_days(),
            min_daily_hours: default_min_daily_hours(),
            slot_granularity_hours: default_slot_granularity_hours(),
        }
    }
}

impl SchedulerConfig {
    /// Load scheduler configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read config file: {}", path.as_ref().display())
        })?;

        let config: SchedulerConfig =
            toml::from_str(&content).context("Failed to parse scheduler config file")?;

        config.validate()?;
        Ok(config)
    }

    /// Load scheduler configuration from the default location.
    ///
    /// Searches for `scheduler.toml` in:
    /// 1. Current directory
    /// 2. Parent directory
    ///
    /// Falls back to defaults when no file is found.
    pub fn from_default_location() -> Result<Self> {
        let search_paths = vec![
            PathBuf::from("scheduler.toml"),
            PathBuf::from("../scheduler.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Apply environment-variable overrides.
    ///
    /// Reads `SCHED_HORIZON_DAYS`, `SCHED_MIN_DAILY_HOURS`, and
    /// `SCHED_SLOT_GRANULARITY_HOURS`; unset or unparseable values leave the
    /// existing setting in place.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(v) = env_parse::<u32>("SCHED_HORIZON_DAYS") {
            self.horizon_days = v;
        }
        if let Some(v) = env_parse::<f64>("SCHED_MIN_DAILY_HOURS") {
            self.min_daily_hours = v;
        }
        if let Some(v) = env_parse::<f64>("SCHED_SLOT_GRANULARITY_HOURS") {
            self.slot_granularity_hours = v;
        }
        self
    }

    /// Reject configurations the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.horizon_days == 0 {
            anyhow::bail!("horizon_days must be at least 1");
        }
        if self.min_daily_hours <= 0.0 {
            anyhow::bail!("min_daily_hours must be positive");
        }
        if self.slot_granularity_hours <= 0.0 {
            anyhow::bail!("slot_granularity_hours must be positive");
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
