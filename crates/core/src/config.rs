//! # Engine Settings
//!
//! Tunables for occurrence enumeration and materialization, read from the
//! environment with defaults for everything:
//!
//! - `SLOT_DEFAULT_WINDOW_DAYS`: listing window when `to` is omitted (default: 14)
//! - `SLOT_DEFAULT_LIMIT`: listing cap when `limit` is omitted (default: 100)
//! - `SLOT_MAX_WINDOW_DAYS`: widest window a listing may request (default: 92)
//! - `OCCURRENCE_CAP_PER_SCHEDULE`: hard cap per schedule per call (default: 5000)
//! - `MATERIALIZE_HORIZON_DAYS`: forward window of one materialization run (default: 28)

use std::env;

use eyre::{Result, WrapErr};

#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub default_window_days: i64,
    pub default_limit: usize,
    pub max_window_days: i64,
    pub occurrence_cap_per_schedule: usize,
    pub materialize_horizon_days: i64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_window_days: 14,
            default_limit: 100,
            max_window_days: 92,
            occurrence_cap_per_schedule: 5000,
            materialize_horizon_days: 28,
        }
    }
}

fn var_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .wrap_err_with(|| format!("Invalid {name} value: {raw:?}")),
        Err(_) => Ok(default),
    }
}

impl EngineSettings {
    /// # Errors
    ///
    /// Fails when a variable is set but does not parse, or when a window
    /// setting is not positive.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let settings = Self {
            default_window_days: var_or("SLOT_DEFAULT_WINDOW_DAYS", defaults.default_window_days)?,
            default_limit: var_or("SLOT_DEFAULT_LIMIT", defaults.default_limit)?,
            max_window_days: var_or("SLOT_MAX_WINDOW_DAYS", defaults.max_window_days)?,
            occurrence_cap_per_schedule: var_or(
                "OCCURRENCE_CAP_PER_SCHEDULE",
                defaults.occurrence_cap_per_schedule,
            )?,
            materialize_horizon_days: var_or(
                "MATERIALIZE_HORIZON_DAYS",
                defaults.materialize_horizon_days,
            )?,
        };

        if settings.default_window_days <= 0
            || settings.max_window_days <= 0
            || settings.materialize_horizon_days <= 0
        {
            eyre::bail!("window settings must be positive: {settings:?}");
        }
        if settings.default_window_days > settings.max_window_days {
            eyre::bail!(
                "SLOT_DEFAULT_WINDOW_DAYS ({}) exceeds SLOT_MAX_WINDOW_DAYS ({})",
                settings.default_window_days,
                settings.max_window_days
            );
        }

        Ok(settings)
    }
}
