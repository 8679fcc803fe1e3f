//! User configuration loaded from `config.toml`
//!
//! Every field has a default, so a missing file or a partial file is fine.
//! Command line flags override whatever is loaded here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::constants;
use crate::paths;
use crate::rating::PresentationMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub mode: PresentationMode,
    pub theme: String,
    /// Wipe stored sidebar ratings when the viewer starts in inline mode.
    /// Popup and wizard records are never touched.
    pub clear_on_start: bool,
    /// Database location; defaults to the platform data directory
    pub database: Option<PathBuf>,
    pub scroll: ScrollConfig,
    pub flow: FlowConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mode: PresentationMode::default(),
            theme: "pagerate".to_string(),
            clear_on_start: false,
            database: None,
            scroll: ScrollConfig::default(),
            flow: FlowConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    pub debounce_ms: u64,
    pub settle_ms: u64,
    /// Wheel rows needed to snap one page
    pub snap_threshold: f64,
    /// Rows covered by a fixed header above the page pane
    pub header_offset: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            debounce_ms: constants::scroll::DEBOUNCE.as_millis() as u64,
            settle_ms: constants::scroll::SETTLE.as_millis() as u64,
            snap_threshold: constants::scroll::SNAP_THRESHOLD,
            header_offset: 0.0,
        }
    }
}

impl ScrollConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Settle window, clamped to the supported range
    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms).clamp(
            constants::scroll::MIN_SETTLE,
            constants::scroll::MAX_SETTLE,
        )
    }
}

/// Confirmation times per mode, in milliseconds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowConfig {
    pub popup_reset_ms: u64,
    pub wizard_reset_ms: u64,
    pub inline_reset_ms: u64,
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            popup_reset_ms: constants::flow::POPUP_RESET.as_millis() as u64,
            wizard_reset_ms: constants::flow::WIZARD_RESET.as_millis() as u64,
            inline_reset_ms: constants::flow::INLINE_RESET.as_millis() as u64,
        }
    }
}

impl FlowConfig {
    pub fn reset_delay(&self, mode: PresentationMode) -> Duration {
        Duration::from_millis(match mode {
            PresentationMode::Popup => self.popup_reset_ms,
            PresentationMode::Wizard => self.wizard_reset_ms,
            PresentationMode::Inline => self.inline_reset_ms,
        })
    }
}

impl AppConfig {
    /// Load from the platform config file
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&paths::config_file())
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        let config: Self = toml::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.scroll.settle_ms != config.scroll.settle().as_millis() as u64 {
            warn!(
                "settle_ms {} out of range, using {}ms",
                config.scroll.settle_ms,
                config.scroll.settle().as_millis()
            );
        }
        Ok(config)
    }

    pub fn database_path(&self) -> PathBuf {
        self.database.clone().unwrap_or_else(paths::database_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = AppConfig::load_from(&temp.path().join("config.toml")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(!config.clear_on_start);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            "mode = \"inline\"\n\n[scroll]\nsettle_ms = 400\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.mode, PresentationMode::Inline);
        assert_eq!(config.scroll.settle(), Duration::from_millis(400));
        assert_eq!(config.scroll.debounce(), Duration::from_millis(50));
        assert_eq!(config.theme, "pagerate");
    }

    #[test]
    fn test_settle_is_clamped() {
        let scroll = ScrollConfig {
            settle_ms: 5000,
            ..Default::default()
        };
        assert_eq!(scroll.settle(), Duration::from_millis(800));
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "mode = \"carousel\"").unwrap();

        assert!(matches!(
            AppConfig::load_from(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_reset_delay_per_mode() {
        let flow = FlowConfig::default();
        assert_eq!(flow.reset_delay(PresentationMode::Wizard), Duration::from_secs(3));
        assert_eq!(flow.reset_delay(PresentationMode::Popup), Duration::from_secs(2));
    }
}
