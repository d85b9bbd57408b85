// CLI Configuration
//
// Optional JSON config file, overridden by command-line flags, plus
// loading and saving of the ledger snapshot it points at.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tabula_kernel::InMemoryLedger;

pub const DEFAULT_STATE_PATH: &str = "tabula-state.json";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Where the ledger snapshot lives between runs.
    pub state_path: PathBuf,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state_path: PathBuf::from(DEFAULT_STATE_PATH),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl CliConfig {
    /// Load config from `path`, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&data).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Apply command-line overrides on top of the file values.
    pub fn with_overrides(mut self, state: Option<PathBuf>, log_level: Option<String>) -> Self {
        if let Some(state) = state {
            self.state_path = state;
        }
        if let Some(level) = log_level {
            self.log_level = level;
        }
        self
    }
}

/// Read the ledger snapshot, starting empty if none exists yet.
pub fn load_ledger(path: &Path) -> Result<InMemoryLedger> {
    if !path.exists() {
        return Ok(InMemoryLedger::new());
    }
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading ledger snapshot {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("parsing ledger snapshot {}", path.display()))
}

pub fn save_ledger(path: &Path, ledger: &InMemoryLedger) -> Result<()> {
    let data = serde_json::to_string_pretty(ledger)?;
    fs::write(path, data).with_context(|| format!("writing ledger snapshot {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_kernel::Ledger;
    use uuid::Uuid;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tabula_{name}_{}.json", Uuid::new_v4()))
    }

    #[test]
    fn missing_config_uses_defaults() {
        let config = CliConfig::load(None).unwrap();
        assert_eq!(config, CliConfig::default());
    }

    #[test]
    fn partial_config_file_keeps_defaults_and_flags_win() {
        let path = temp_path("config");
        fs::write(&path, r#"{ "log_level": "debug" }"#).unwrap();

        let config = CliConfig::load(Some(&path)).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.state_path, PathBuf::from(DEFAULT_STATE_PATH));

        let config = config.with_overrides(Some(PathBuf::from("other.json")), None);
        assert_eq!(config.state_path, PathBuf::from("other.json"));
        assert_eq!(config.log_level, "debug");

        fs::remove_file(&path).ok();
    }

    #[test]
    fn ledger_snapshot_round_trips_through_disk() {
        let path = temp_path("ledger");
        assert_eq!(load_ledger(&path).unwrap().state_len(), 0);

        let mut ledger = InMemoryLedger::new();
        ledger.put_state("k", b"v").unwrap();
        save_ledger(&path, &ledger).unwrap();

        let restored = load_ledger(&path).unwrap();
        assert_eq!(restored.get_state("k").unwrap(), Some(b"v".to_vec()));

        fs::remove_file(&path).ok();
    }
}
