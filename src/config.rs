//! Layered configuration.
//!
//! Values resolve from defaults, then a `symdex.toml` file, then
//! `SYMDEX_`-prefixed environment variables with double underscores between
//! nesting levels: `SYMDEX_SEARCH__COMPLETION_LIMIT=25` sets
//! `search.completion_limit`.

use std::collections::HashMap;
use std::path::PathBuf;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    /// Directory the element stores live under.
    #[serde(default = "default_index_dir")]
    pub index_dir: PathBuf,

    /// Autocomplete tuning.
    #[serde(default)]
    pub search: SearchConfig,

    /// Log levels.
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Upper bound on autocomplete rows per store.
    #[serde(default = "default_completion_limit")]
    pub completion_limit: usize,

    /// Completion priority of type rows. Types rank above members as long as
    /// this exceeds `member_priority`.
    #[serde(default = "default_type_priority")]
    pub type_priority: u64,

    /// Completion priority of method and field rows.
    #[serde(default = "default_member_priority")]
    pub member_priority: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Default level filter, e.g. "warn" or "info".
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module overrides, e.g. `storage = "debug"`.
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_index_dir() -> PathBuf {
    PathBuf::from(".symdex/index")
}
fn default_completion_limit() -> usize {
    50
}
fn default_type_priority() -> u64 {
    10
}
fn default_member_priority() -> u64 {
    0
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            index_dir: default_index_dir(),
            search: SearchConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            completion_limit: default_completion_limit(),
            type_priority: default_type_priority(),
            member_priority: default_member_priority(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

impl Settings {
    /// Loads settings from `symdex.toml` and the environment on top of the
    /// defaults.
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file("symdex.toml"))
            .merge(Env::prefixed("SYMDEX_").split("__"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> Settings {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::string(toml))
            .extract()
            .unwrap()
    }

    #[test]
    fn defaults_rank_types_above_members() {
        let settings = Settings::default();
        assert!(settings.search.type_priority > settings.search.member_priority);
        assert_eq!(settings.search.completion_limit, 50);
    }

    #[test]
    fn toml_overrides_defaults() {
        let settings = from_toml(
            r#"
            [search]
            type_priority = 100

            [logging]
            default = "debug"
            "#,
        );
        assert_eq!(settings.search.type_priority, 100);
        assert_eq!(settings.logging.default, "debug");
        // Untouched values keep their defaults.
        assert_eq!(settings.search.completion_limit, 50);
    }

    #[test]
    fn environment_overrides_defaults() {
        unsafe {
            std::env::set_var("SYMDEX_SEARCH__COMPLETION_LIMIT", "25");
        }

        let settings = Settings::load().unwrap();
        assert_eq!(settings.search.completion_limit, 25);
        assert_eq!(settings.search.type_priority, 10);

        unsafe {
            std::env::remove_var("SYMDEX_SEARCH__COMPLETION_LIMIT");
        }
    }
}
