//! Runtime configuration

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::HeightMarginScale;

/// Raw wheel units reported per notch by most hosts
pub const DEFAULT_WHEEL_DELTA_PER_NOTCH: u32 = 120;

/// Lines scrolled per wheel notch when the host does not say otherwise
pub const DEFAULT_WHEEL_LINES_PER_NOTCH: u32 = 3;

/// Default scrollbar track width (DIPs)
pub const DEFAULT_SCROLLBAR_WIDTH: f64 = 17.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Terminal control configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Let the terminal core size itself to fill the control (no margins)
    pub auto_fill: bool,

    /// Scrollbar track width in DIPs, reserved on both axes
    pub scrollbar_width: f64,

    /// Mouse wheel quantization
    pub wheel: WheelConfig,

    /// Margin calculation
    pub geometry: GeometryConfig,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            auto_fill: false,
            scrollbar_width: DEFAULT_SCROLLBAR_WIDTH,
            wheel: WheelConfig::default(),
            geometry: GeometryConfig::default(),
        }
    }
}

/// Wheel configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WheelConfig {
    /// Raw delta units per notch
    pub delta_per_notch: u32,

    /// Lines to scroll per notch
    pub lines_per_notch: u32,
}

impl Default for WheelConfig {
    fn default() -> Self {
        Self {
            delta_per_notch: DEFAULT_WHEEL_DELTA_PER_NOTCH,
            lines_per_notch: DEFAULT_WHEEL_LINES_PER_NOTCH,
        }
    }
}

/// Geometry configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// DPI axis used to convert the renderer height for the bottom margin
    pub height_margin_scale: HeightMarginScale,
}

impl ControlConfig {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("termpane/control.toml")),
            Some(PathBuf::from("/etc/termpane/control.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::from_path(&path) {
                Ok(config) => {
                    tracing::info!(?path, auto_fill = config.auto_fill, "loaded control configuration");
                    return config;
                }
                Err(e) => {
                    tracing::warn!(?path, error = %e, "failed to load control configuration");
                }
            }
        }

        tracing::info!("using default control configuration");
        Self::default()
    }

    /// Read and parse a config file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Helper for getting XDG directories
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}
