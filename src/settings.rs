use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::ledger::LedgerOptions;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default = "default_true")]
    pub strict_validation: bool,
    #[serde(default = "default_true")]
    pub extended_metrics: bool,
}

fn default_true() -> bool {
    true
}

fn default_export_dir() -> String {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("lean-accounting")
        .to_string_lossy()
        .to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            user_name: String::new(),
            strict_validation: true,
            extended_metrics: true,
        }
    }
}

impl Settings {
    pub fn ledger_options(&self) -> LedgerOptions {
        LedgerOptions {
            strict_validation: self.strict_validation,
            extended_metrics: self.extended_metrics,
        }
    }

    pub fn export_path(&self, file_name: &str) -> PathBuf {
        PathBuf::from(&self.export_dir).join(file_name)
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("lean-accounting")
}

pub fn settings_path() -> PathBuf {
    // Lets tests and scripts point at a scratch config
    if let Some(dir) = std::env::var_os("LEAN_CONFIG_DIR") {
        return PathBuf::from(dir).join("settings.json");
    }
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_else(|e| {
            log::warn!("ignoring malformed {}: {e}", path.display());
            Settings::default()
        })
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let path = settings_path();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| LedgerError::Settings(e.to_string()))?;
    std::fs::write(&path, format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            export_dir: "/tmp/exports".to_string(),
            user_name: "Alice".to_string(),
            strict_validation: false,
            extended_metrics: true,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        std::fs::write(&path, &json).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let loaded: Settings = serde_json::from_str(&content).unwrap();
        assert_eq!(loaded.user_name, "Alice");
        assert_eq!(loaded.export_dir, "/tmp/exports");
        assert!(!loaded.strict_validation);
    }

    #[test]
    fn test_defaults_enable_everything() {
        let s = Settings::default();
        assert!(s.user_name.is_empty());
        assert!(s.strict_validation);
        assert!(s.extended_metrics);
        assert!(!s.export_dir.is_empty());
        assert_eq!(s.ledger_options(), LedgerOptions::default());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"export_dir": "/tmp/x", "extended_metrics": false}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert!(s.strict_validation);
        assert!(!s.extended_metrics);
        assert_eq!(s.export_path("a.csv"), PathBuf::from("/tmp/x/a.csv"));
    }

    #[test]
    fn test_shellexpand_leaves_plain_paths() {
        assert_eq!(shellexpand_path("/tmp/out"), "/tmp/out");
    }
}
