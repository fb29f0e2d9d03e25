//! Application configuration.

use std::path::{Path, PathBuf};

use collage_model::{FillPolicy, OutputFormat, PngCompression, ResampleFilter};
use serde::{Deserialize, Serialize};

use crate::error::{CollageError, CollageResult};

/// Decode-time pixel ceiling, large enough for ~30k x 30k panoramas.
pub const DEFAULT_MAX_DECODED_PIXELS: u64 = 933_120_000;

/// Global application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory where collages are written when no output path is given.
    pub output_dir: PathBuf,

    /// Default collage settings.
    pub collage: CollageDefaults,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Default collage parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollageDefaults {
    /// Default grid rows.
    pub rows: u32,

    /// Default grid columns.
    pub cols: u32,

    /// Default output format.
    pub format: OutputFormat,

    /// Behavior when fewer images than cells are supplied.
    pub fill_policy: FillPolicy,

    /// Filter used to resize images to the cell size.
    pub resample_filter: ResampleFilter,

    /// PNG compression tier.
    pub png_compression: PngCompression,

    /// JPEG quality (1-100).
    pub jpeg_quality: u8,

    /// Largest accepted source image, in pixels.
    pub max_decoded_pixels: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "collage_render=debug,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,

    /// Optional log file path.
    pub file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            collage: CollageDefaults::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for CollageDefaults {
    fn default() -> Self {
        Self {
            rows: 2,
            cols: 2,
            format: OutputFormat::Jpeg,
            fill_policy: FillPolicy::Reject,
            resample_filter: ResampleFilter::Lanczos3,
            png_compression: PngCompression::Default,
            jpeg_quality: 100,
            max_decoded_pixels: DEFAULT_MAX_DECODED_PIXELS,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            file: None,
        }
    }
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Ignoring config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: impl AsRef<Path>) -> CollageResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(CollageError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard location.
    pub fn save(&self) -> CollageResult<PathBuf> {
        let config_path = config_file_path();
        self.save_to(&config_path)?;
        Ok(config_path)
    }

    /// Save config to an explicit path.
    pub fn save_to(&self, path: impl AsRef<Path>) -> CollageResult<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Reject settings no collage could be produced with.
    pub fn validate(&self) -> CollageResult<()> {
        let c = &self.collage;
        if c.rows == 0 || c.cols == 0 {
            return Err(CollageError::config(format!(
                "default grid {}x{} must have at least one row and column",
                c.rows, c.cols
            )));
        }
        if !(1..=100).contains(&c.jpeg_quality) {
            return Err(CollageError::config(format!(
                "jpeg_quality must be within 1-100, got {}",
                c.jpeg_quality
            )));
        }
        if c.max_decoded_pixels == 0 {
            return Err(CollageError::config("max_decoded_pixels must be positive"));
        }
        Ok(())
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("collage").join("config.json")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.collage.jpeg_quality, 100);
        assert_eq!(config.collage.max_decoded_pixels, 933_120_000);
        assert_eq!(config.collage.fill_policy, FillPolicy::Reject);
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"collage": {"format": "png", "jpeg_quality": 90}}"#).unwrap();
        assert_eq!(config.collage.format, OutputFormat::Png);
        assert_eq!(config.collage.jpeg_quality, 90);
        assert_eq!(config.collage.rows, 2);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_validate_rejects_bad_quality() {
        let mut config = AppConfig::default();
        config.collage.jpeg_quality = 0;
        assert!(matches!(
            config.validate(),
            Err(CollageError::Config { .. })
        ));

        config.collage.jpeg_quality = 101;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_pixel_limit() {
        let mut config = AppConfig::default();
        config.collage.max_decoded_pixels = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");

        let mut config = AppConfig::default();
        config.collage.rows = 3;
        config.collage.fill_policy = FillPolicy::BlankFill;
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.collage.rows, 3);
        assert_eq!(loaded.collage.fill_policy, FillPolicy::BlankFill);
    }

    #[test]
    fn test_load_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let err = AppConfig::load_from(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, CollageError::FileNotFound { .. }));
    }
}
