//! Runtime configuration, loadable from YAML or JSON.
//!
//! ```yaml
//! canvas:
//!   width: 800
//!   height: 400
//! frame_period_ms: 50
//! strict_stop: true
//! ```

use canvasloop_common::DeviceSize;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
    #[error("canvas {width}x{height} has no area")]
    InvalidCanvas { width: u32, height: u32 },
    #[error("frame period must be at least 1 ms")]
    InvalidPeriod,
}

/// Session configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Size of the surface the host creates for the session.
    pub canvas: DeviceSize,
    /// Period of both the update and the draw pass.
    pub frame_period_ms: u64,
    /// Fail a `stop` issued while already stopped.
    pub strict_stop: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            canvas: DeviceSize::new(800, 400),
            frame_period_ms: 50,
            strict_stop: true,
        }
    }
}

impl RuntimeConfig {
    /// Load from a `.yaml`/`.yml` or `.json` file and validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let config = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&text)?,
            "json" => Self::from_json_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(path.display().to_string())),
        };
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.is_empty() {
            return Err(ConfigError::InvalidCanvas {
                width: self.canvas.width,
                height: self.canvas.height,
            });
        }
        if self.frame_period_ms == 0 {
            return Err(ConfigError::InvalidPeriod);
        }
        Ok(())
    }

    pub fn frame_period(&self) -> Duration {
        Duration::from_millis(self.frame_period_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let c = RuntimeConfig::default();
        assert_eq!(c.canvas, DeviceSize::new(800, 400));
        assert_eq!(c.frame_period(), Duration::from_millis(50));
        assert!(c.strict_stop);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let c = RuntimeConfig::from_yaml_str("frame_period_ms: 20\n").unwrap();
        assert_eq!(c.frame_period_ms, 20);
        assert_eq!(c.canvas, DeviceSize::new(800, 400));
    }

    #[test]
    fn json_round_trip() {
        let c = RuntimeConfig {
            canvas: DeviceSize::new(640, 480),
            frame_period_ms: 16,
            strict_stop: false,
        };
        let text = serde_json::to_string(&c).unwrap();
        assert_eq!(RuntimeConfig::from_json_str(&text).unwrap(), c);
    }

    #[test]
    fn rejects_empty_canvas_and_zero_period() {
        assert!(matches!(
            RuntimeConfig::from_yaml_str("canvas: { width: 0, height: 10 }\n"),
            Err(ConfigError::InvalidCanvas { width: 0, height: 10 })
        ));
        assert!(matches!(
            RuntimeConfig::from_json_str(r#"{"frame_period_ms": 0}"#),
            Err(ConfigError::InvalidPeriod)
        ));
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().unwrap();

        let yaml = dir.path().join("session.yaml");
        let mut f = std::fs::File::create(&yaml).unwrap();
        writeln!(f, "canvas:\n  width: 320\n  height: 240").unwrap();
        assert_eq!(
            RuntimeConfig::load(&yaml).unwrap().canvas,
            DeviceSize::new(320, 240)
        );

        let json = dir.path().join("session.json");
        std::fs::write(&json, r#"{"strict_stop": false}"#).unwrap();
        assert!(!RuntimeConfig::load(&json).unwrap().strict_stop);

        let toml = dir.path().join("session.toml");
        std::fs::write(&toml, "x = 1").unwrap();
        assert!(matches!(
            RuntimeConfig::load(&toml),
            Err(ConfigError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            RuntimeConfig::load(dir.path().join("nope.yaml")),
            Err(ConfigError::Io(_))
        ));
    }
}
