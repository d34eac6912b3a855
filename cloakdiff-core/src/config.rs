use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::clipboard::DEFAULT_ACK_TIMEOUT;
use crate::error::{Result, ViewerError};
use crate::layout::{DEFAULT_LAYOUT_KEY, DEFAULT_MIN_PANE_FRACTION, DEFAULT_SPLIT_RATIO};

/// Environment variable pointing at an alternative config file
pub const CONFIG_ENV: &str = "CLOAKDIFF_CONFIG";

/// Viewer configuration, `~/.cloakdiff/config.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub layout: LayoutConfig,
    pub clipboard: ClipboardConfig,
    pub logging: LoggingConfig,
    pub samples: SamplesConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub default_ratio: f64,
    pub min_pane_fraction: f64,
    /// Remember the split ratio between runs
    pub persist: bool,
    pub key: String,
    /// Override for the layout store file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<PathBuf>,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_ratio: DEFAULT_SPLIT_RATIO,
            min_pane_fraction: DEFAULT_MIN_PANE_FRACTION,
            persist: true,
            key: DEFAULT_LAYOUT_KEY.to_string(),
            store: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipboardConfig {
    pub ack_timeout_ms: u64,
}

impl Default for ClipboardConfig {
    fn default() -> Self {
        Self {
            ack_timeout_ms: DEFAULT_ACK_TIMEOUT.as_millis() as u64,
        }
    }
}

impl ClipboardConfig {
    pub fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.ack_timeout_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplesConfig {
    /// Directory of extra scenarios, one subdirectory per scenario
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl ViewerConfig {
    /// Config file path: `$CLOAKDIFF_CONFIG` or `~/.cloakdiff/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = env::var(CONFIG_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }
        Self::home_dir().join("config.toml")
    }

    /// `~/.cloakdiff`
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cloakdiff")
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|err| {
            ViewerError::config(format!("failed to read {}: {err}", path.display()))
        })?;
        let mut config = Self::from_toml(&content)?;
        config.expand_variables();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|err| ViewerError::config(format!("invalid TOML: {err}")))
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|err| ViewerError::config(format!("failed to serialize config: {err}")))
    }

    /// Write to `path`, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();
        let min = self.layout.min_pane_fraction;

        if !(min > 0.0 && min <= 0.5) {
            errors.push(format!(
                "layout.min_pane_fraction must be in (0, 0.5], got {min}"
            ));
        } else if !(self.layout.default_ratio >= min && self.layout.default_ratio <= 1.0 - min) {
            errors.push(format!(
                "layout.default_ratio must be in [{min}, {}], got {}",
                1.0 - min,
                self.layout.default_ratio
            ));
        }
        if self.layout.key.trim().is_empty() {
            errors.push("layout.key must not be empty".to_string());
        }
        if self.clipboard.ack_timeout_ms == 0 {
            errors.push("clipboard.ack_timeout_ms must be greater than 0".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ViewerError::config(errors.join("; ")))
        }
    }

    /// Where layout ratios are persisted
    pub fn layout_store_path(&self) -> PathBuf {
        self.layout
            .store
            .clone()
            .unwrap_or_else(|| Self::home_dir().join("layout.json"))
    }

    /// Where the TUI writes its log
    pub fn log_file_path(&self) -> PathBuf {
        self.logging
            .file
            .clone()
            .unwrap_or_else(|| Self::home_dir().join("logs").join("cloakdiff.log"))
    }

    /// Expand `${HOME}` references in configured paths
    fn expand_variables(&mut self) {
        let mut vars = HashMap::new();
        vars.insert("HOME".to_string(), env::var("HOME").unwrap_or_default());

        for path in [
            &mut self.layout.store,
            &mut self.logging.file,
            &mut self.samples.dir,
        ] {
            if let Some(p) = path.as_mut() {
                *p = PathBuf::from(Self::expand_string(&p.display().to_string(), &vars));
            }
        }
    }

    fn expand_string(s: &str, vars: &HashMap<String, String>) -> String {
        let mut result = s.to_string();
        for (key, value) in vars {
            let pattern = format!("${{{}}}", key);
            result = result.replace(&pattern, value);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_are_valid() {
        let config = ViewerConfig::default();
        config.validate().unwrap();
        assert_eq!(config.layout.default_ratio, 0.5);
        assert_eq!(config.layout.min_pane_fraction, 0.3);
        assert_eq!(config.clipboard.ack_timeout(), Duration::from_secs(2));
        assert_eq!(config.layout.key, "diff-view-layout");
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = ViewerConfig::from_toml("[layout]\ndefault_ratio = 0.4\n").unwrap();
        assert_eq!(config.layout.default_ratio, 0.4);
        assert_eq!(config.layout.min_pane_fraction, 0.3);
        assert!(config.layout.persist);
        assert_eq!(config.clipboard.ack_timeout_ms, 2000);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = ViewerConfig::default();
        config.layout.min_pane_fraction = 0.6;
        assert!(config.validate().is_err());

        let mut config = ViewerConfig::default();
        config.layout.default_ratio = 0.9;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("default_ratio"));

        let mut config = ViewerConfig::default();
        config.clipboard.ack_timeout_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = ViewerConfig::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, ViewerConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf").join("config.toml");
        let mut config = ViewerConfig::default();
        config.layout.key = "audit".to_string();
        config.layout.persist = false;
        config.save_to(&path).unwrap();

        let loaded = ViewerConfig::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_home_expansion() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[logging]\nfile = \"${HOME}/cloak.log\"\n").unwrap();

        let config = ViewerConfig::load_from(&path).unwrap();
        let file = config.logging.file.unwrap();
        assert!(!file.display().to_string().contains("${HOME}"));
        assert!(file.ends_with("cloak.log"));
    }
}
