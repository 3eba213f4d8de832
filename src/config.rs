//! Application configuration
//!
//! Layered as `config/default` → `config/{POSYANDU_ENV}` → `POSYANDU_*`
//! environment variables. Every section has defaults, so a missing file
//! still yields the standard immunization policy.

use serde::{Deserialize, Serialize};

/// Average month length used to turn days since birth into whole months.
pub const DAYS_PER_MONTH: f64 = 30.44;

/// Months past `age_month_min` before an untaken vaccine counts as missed.
///
/// This is the fixed national policy. `engine.due_grace_months` can
/// override it, but any other value departs from the standard schedule.
pub const DUE_GRACE_MONTHS: u32 = 2;

/// How far below the age expectation a child may fall before BEHIND.
pub const BEHIND_MARGIN: u32 = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub days_per_month: f64,
    /// Defaults to [`DUE_GRACE_MONTHS`]; leave it there for the standard policy.
    pub due_grace_months: u32,
    pub behind_margin: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            days_per_month: DAYS_PER_MONTH,
            due_grace_months: DUE_GRACE_MONTHS,
            behind_margin: BEHIND_MARGIN,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// Load configuration from the default locations
pub fn load_config() -> Result<Config, ::config::ConfigError> {
    let env = std::env::var("POSYANDU_ENV").unwrap_or_else(|_| "development".into());

    ::config::Config::builder()
        .add_source(::config::File::with_name("config/default").required(false))
        .add_source(::config::File::with_name(&format!("config/{}", env)).required(false))
        .add_source(
            ::config::Environment::with_prefix("POSYANDU")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

/// Load configuration from an explicit file, still honouring environment overrides
pub fn load_config_from(path: &str) -> Result<Config, ::config::ConfigError> {
    ::config::Config::builder()
        .add_source(::config::File::with_name(path))
        .add_source(
            ::config::Environment::with_prefix("POSYANDU")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_standard_policy() {
        let config = Config::default();
        assert_eq!(config.engine.days_per_month, 30.44);
        assert_eq!(config.engine.due_grace_months, 2);
        assert_eq!(config.engine.behind_margin, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn partial_sections_fill_from_defaults() {
        let config: Config = ::config::Config::builder()
            .add_source(::config::File::from_str(
                "[engine]\ndue_grace_months = 3\n",
                ::config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(config.engine.due_grace_months, 3);
        assert_eq!(config.engine.days_per_month, DAYS_PER_MONTH);
        assert!(!config.logging.json);
    }
}
