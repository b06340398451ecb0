//! Run configuration.
//!
//! Handles loading, validating, and merging `thumbcache.toml`. Stock
//! defaults are serialized to a TOML table and the user file is merged on
//! top, so a config file only needs the keys it wants to change.
//!
//! ## Config File Location
//!
//! `thumbcache.toml` in the working directory is picked up automatically.
//! Pass `--config <path>` to use another file; in that case the file must
//! exist.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "images"          # Directory scanned for candidates
//! output_dir = "images/resized"  # Thumbnail cache directory
//!
//! [thumbnails]
//! width = 128                    # Output width in pixels
//! height = 128                   # Output height in pixels
//! quality = 90                   # JPEG quality (1-100)
//!
//! [discovery]
//! extensions = ["jpg", "jpeg", "png", "gif"]  # Case-insensitive, no dot
//! recursive = false              # Descend into subdirectories
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "thumbcache.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Everything a run needs to know, passed explicitly into each stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory scanned for candidate images.
    pub source_dir: PathBuf,
    /// Directory holding `<hash><ext>` thumbnails. Created if absent.
    pub output_dir: PathBuf,
    /// Output dimensions and encoding.
    pub thumbnails: ThumbnailsConfig,
    /// Which files count as candidates.
    pub discovery: DiscoveryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source_dir: PathBuf::from("images"),
            output_dir: PathBuf::from("images/resized"),
            thumbnails: ThumbnailsConfig::default(),
            discovery: DiscoveryConfig::default(),
        }
    }
}

impl Config {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.thumbnails.width == 0 || self.thumbnails.height == 0 {
            return Err(ConfigError::Validation(
                "thumbnails.width and thumbnails.height must be non-zero".into(),
            ));
        }
        if !(1..=100).contains(&self.thumbnails.quality) {
            return Err(ConfigError::Validation(
                "thumbnails.quality must be 1-100".into(),
            ));
        }
        if self.discovery.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "discovery.extensions must not be empty".into(),
            ));
        }
        for ext in &self.discovery.extensions {
            if ext.is_empty() || ext.contains(['.', '/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "discovery.extensions entry {ext:?} must be a bare extension like \"jpg\""
                )));
            }
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "output_dir must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Thumbnail output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThumbnailsConfig {
    pub width: u32,
    pub height: u32,
    /// JPEG encoding quality. Lossless formats ignore it.
    pub quality: u32,
}

impl Default for ThumbnailsConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            quality: 90,
        }
    }
}

/// Candidate discovery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    /// Recognized extensions without the leading dot. Matched case-insensitively.
    pub extensions: Vec<String>,
    /// Walk subdirectories of the source directory as well.
    pub recursive: bool,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            extensions: ["jpg", "jpeg", "png", "gif"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            recursive: false,
        }
    }
}

impl DiscoveryConfig {
    /// Whether `ext` (without dot, any case) is a recognized extension.
    pub fn recognizes(&self, ext: &str) -> bool {
        self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext))
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(Config::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load a config file as a raw TOML value.
pub fn load_raw_config(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(value)
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<Config, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: Config = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the run configuration.
///
/// With `Some(path)` the file must exist. With `None`, [`DEFAULT_CONFIG_FILE`]
/// is used if present and stock defaults otherwise.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let overlay = match path {
        Some(p) => Some(load_raw_config(p)?),
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_FILE);
            if default_path.exists() {
                Some(load_raw_config(default_path)?)
            } else {
                None
            }
        }
    };
    resolve_config(stock_defaults_value(), overlay)
}

/// Returns a fully-commented stock `thumbcache.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# thumbcache configuration
# ========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# Directory scanned for images.
source_dir = "images"

# Where thumbnails are written, one file per distinct content + extension,
# named <sha256-hex><extension>. Created (with parents) if missing.
# Deleting a file here forces that image to be regenerated on the next run.
output_dir = "images/resized"

# ---------------------------------------------------------------------------
# Thumbnail output
# ---------------------------------------------------------------------------
[thumbnails]
# Output size in pixels. Images are scaled to cover this box and the
# overflow is cropped evenly from both sides; nothing is letterboxed.
width = 128
height = 128

# JPEG encoding quality (1 = worst, 100 = best). PNG and GIF are lossless.
quality = 90

# ---------------------------------------------------------------------------
# Discovery
# ---------------------------------------------------------------------------
[discovery]
# File extensions to process, without the dot. Matching ignores case.
extensions = ["jpg", "jpeg", "png", "gif"]

# Also process images in subdirectories of source_dir.
recursive = false
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = Config::default();
        assert_eq!(config.source_dir, PathBuf::from("images"));
        assert_eq!(config.output_dir, PathBuf::from("images/resized"));
        assert_eq!(config.thumbnails.width, 128);
        assert_eq!(config.thumbnails.height, 128);
        assert_eq!(config.thumbnails.quality, 90);
        assert_eq!(
            config.discovery.extensions,
            vec!["jpg", "jpeg", "png", "gif"]
        );
        assert!(!config.discovery.recursive);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[thumbnails]
width = 256
"#;
        let config: Config = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.thumbnails.width, 256);
        // Default values preserved
        assert_eq!(config.thumbnails.height, 128);
        assert_eq!(config.discovery.extensions.len(), 4);
    }

    #[test]
    fn recognizes_is_case_insensitive() {
        let discovery = DiscoveryConfig::default();
        assert!(discovery.recognizes("jpg"));
        assert!(discovery.recognizes("JPG"));
        assert!(discovery.recognizes("Gif"));
        assert!(!discovery.recognizes("webp"));
        assert!(!discovery.recognizes(""));
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_reads_explicit_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(
            &path,
            r#"
output_dir = "thumbs"

[discovery]
extensions = ["png"]
recursive = true
"#,
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("thumbs"));
        assert_eq!(config.discovery.extensions, vec!["png"]);
        assert!(config.discovery.recursive);
        // Unspecified values should be defaults
        assert_eq!(config.source_dir, PathBuf::from("images"));
        assert_eq!(config.thumbnails, ThumbnailsConfig::default());
    }

    #[test]
    fn load_config_explicit_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "this is not valid toml [[[").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("zero.toml");
        fs::write(&path, "[thumbnails]\nwidth = 0\n").unwrap();

        let result = load_config(Some(&path));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[t]\nx = 1\ny = 2").unwrap();
        let overlay: toml::Value = toml::from_str("[t]\ny = 5").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["t"]["x"].as_integer(), Some(1));
        assert_eq!(merged["t"]["y"].as_integer(), Some(5));
    }

    #[test]
    fn merge_toml_arrays_replace_not_append() {
        let base: toml::Value = toml::from_str("e = [\"jpg\", \"png\"]").unwrap();
        let overlay: toml::Value = toml::from_str("e = [\"gif\"]").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["e"].as_array().unwrap().len(), 1);
    }

    // =========================================================================
    // Unknown keys and validation
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<Config, _> = toml::from_str("output = \"x\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result: Result<Config, _> = toml::from_str("[thumbnails]\nsize = 64");
        assert!(result.is_err());
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_quality_out_of_range() {
        let mut config = Config::default();
        config.thumbnails.quality = 0;
        assert!(config.validate().is_err());
        config.thumbnails.quality = 101;
        assert!(config.validate().is_err());
        config.thumbnails.quality = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_extensions_empty() {
        let mut config = Config::default();
        config.discovery.extensions.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_extension_with_dot_rejected() {
        let mut config = Config::default();
        config.discovery.extensions = vec![".png".into()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("\".png\""));
    }

    #[test]
    fn validate_empty_output_dir_rejected() {
        let mut config = Config::default();
        config.output_dir = PathBuf::new();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // Stock config
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let parsed: Config = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(parsed, Config::default());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let value = stock_defaults_value();
        let table = value.as_table().unwrap();
        for key in ["source_dir", "output_dir", "thumbnails", "discovery"] {
            assert!(table.contains_key(key), "missing {key}");
        }
    }
}
