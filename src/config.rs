//! Runtime configuration: where the ledger lives and which rule table to use.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::core::AutonomoError;
use crate::rules::RuleTable;

/// Ledger location used when nothing else is configured.
pub const DEFAULT_LEDGER_PATH: &str = "data/ledger.csv";

/// Environment variable overriding the ledger location.
pub const ENV_LEDGER_PATH: &str = "AUTONOMO_LEDGER_PATH";

/// Environment variable pointing at a rule table document.
pub const ENV_RULES_PATH: &str = "AUTONOMO_RULES_PATH";

/// Paths the engine reads and writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// CSV ledger file.
    pub ledger_path: PathBuf,
    /// Rule table document. `None` uses the embedded 2025 table.
    pub rules_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from(DEFAULT_LEDGER_PATH),
            rules_path: None,
        }
    }
}

impl Config {
    /// Defaults overridden by `AUTONOMO_LEDGER_PATH` and `AUTONOMO_RULES_PATH`.
    /// Empty variables are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut config = Self::default();
        if let Some(path) = non_empty(ENV_LEDGER_PATH) {
            config.ledger_path = PathBuf::from(path);
        }
        config.rules_path = non_empty(ENV_RULES_PATH).map(PathBuf::from);
        config
    }

    /// Load the configured rule table, or the embedded one.
    pub fn rule_table(&self) -> Result<RuleTable, AutonomoError> {
        match &self.rules_path {
            Some(path) => RuleTable::from_path(path),
            None => Ok(RuleTable::spain_2025()),
        }
    }

    /// Open the configured ledger.
    #[cfg(feature = "ledger")]
    pub fn open_ledger(&self) -> crate::ledger::LedgerStore {
        crate::ledger::LedgerStore::new(&self.ledger_path)
    }
}

/// Builder for [`Config`].
///
/// ```
/// use autonomo::config::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .ledger_path("/tmp/autonomo/ledger.csv")
///     .build();
/// assert!(config.rules_path.is_none());
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ledger file.
    pub fn ledger_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.ledger_path = path.into();
        self
    }

    /// Use a rule table document instead of the embedded one.
    pub fn rules_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rules_path = Some(path.into());
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_env() {
        let config = Config::from_lookup(lookup(&[]));
        assert_eq!(config, Config::default());
        assert_eq!(config.ledger_path, PathBuf::from("data/ledger.csv"));
    }

    #[test]
    fn env_overrides() {
        let config = Config::from_lookup(lookup(&[
            (ENV_LEDGER_PATH, "/srv/ledger.csv"),
            (ENV_RULES_PATH, "/srv/rules.json"),
        ]));
        assert_eq!(config.ledger_path, PathBuf::from("/srv/ledger.csv"));
        assert_eq!(config.rules_path, Some(PathBuf::from("/srv/rules.json")));
    }

    #[test]
    fn blank_env_is_ignored() {
        let config = Config::from_lookup(lookup(&[(ENV_LEDGER_PATH, "  ")]));
        assert_eq!(config.ledger_path, PathBuf::from(DEFAULT_LEDGER_PATH));
    }

    #[test]
    fn embedded_rules_by_default() {
        let rules = Config::default().rule_table().unwrap();
        assert_eq!(rules, RuleTable::spain_2025());
    }

    #[test]
    fn missing_rules_file_is_io_error() {
        let config = ConfigBuilder::new()
            .rules_path("/nonexistent/rules.json")
            .build();
        assert!(matches!(config.rule_table(), Err(AutonomoError::Io(_))));
    }
}
