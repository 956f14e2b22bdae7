use std::env;

use anyhow::{Context, Result};

use crate::history::PeriodSelector;

const DEFAULT_HISTORY_LIMIT: usize = 30;
const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub history_limit: usize,
    pub default_period: PeriodSelector,
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            default_period: PeriodSelector::All,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as `from_env` but reads through `lookup`, so callers can feed
    /// values from somewhere other than the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut cfg = Self::default();

        if let Some(raw) = lookup("ROYALE_HISTORY_LIMIT").filter(|v| !v.trim().is_empty()) {
            cfg.history_limit = raw
                .trim()
                .parse::<usize>()
                .with_context(|| format!("ROYALE_HISTORY_LIMIT must be a count, got '{raw}'"))?
                .max(1);
        }
        if let Some(raw) = lookup("ROYALE_DEFAULT_PERIOD").filter(|v| !v.trim().is_empty()) {
            cfg.default_period = raw.parse().context("ROYALE_DEFAULT_PERIOD")?;
        }
        if let Some(raw) = lookup("ROYALE_LOG_LEVEL").filter(|v| !v.trim().is_empty()) {
            cfg.log_level = raw.trim().to_string();
        }

        Ok(cfg)
    }
}
