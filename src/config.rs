//! Harvest configuration.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by whatever keys the user file sets; everything else keeps its
//! default.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! window_bytes = 262144     # Leading bytes read from each image
//!
//! [catalog]
//! url_template = "https://images-assets.nasa.gov/image/{id}/{id}~orig.jpg"
//! id_prefix = "NHQ"         # Identifier prefix that precedes a YYYYMMDD date
//! full_variant = "orig"     # Variant suffix of the full-size download
//! large_variant = "large"   # Variant suffix of the large preview
//!
//! [processing]
//! max_processes = 4         # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [catalog]
//! id_prefix = "KSC"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default leading window: 256 KiB comfortably covers APP1 and XMP in
/// camera and Lightroom output.
pub const DEFAULT_WINDOW_BYTES: usize = 256 * 1024;

/// Upper bound on `window_bytes`; anything larger defeats the point of a
/// partial read.
const MAX_WINDOW_BYTES: usize = 64 * 1024 * 1024;

/// Placeholder substituted with the record identifier in `url_template`.
pub const ID_PLACEHOLDER: &str = "{id}";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HarvestConfig {
    /// Number of leading bytes read from each image.
    pub window_bytes: usize,
    /// Catalog record construction (URLs, id dates).
    pub catalog: CatalogConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            window_bytes: DEFAULT_WINDOW_BYTES,
            catalog: CatalogConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl HarvestConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.window_bytes == 0 || self.window_bytes > MAX_WINDOW_BYTES {
            return Err(ConfigError::Validation(format!(
                "window_bytes must be 1-{MAX_WINDOW_BYTES}"
            )));
        }
        if !self.catalog.url_template.contains(ID_PLACEHOLDER) {
            return Err(ConfigError::Validation(format!(
                "catalog.url_template must contain {ID_PLACEHOLDER}"
            )));
        }
        if self.catalog.full_variant.trim().is_empty()
            || self.catalog.large_variant.trim().is_empty()
        {
            return Err(ConfigError::Validation(
                "catalog variants must not be empty".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// How catalog records are derived from an identifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogConfig {
    /// Source download URL; `{id}` is replaced with the record identifier.
    pub url_template: String,
    /// Identifier prefix that precedes an eight-digit `YYYYMMDD` date.
    pub id_prefix: String,
    /// Variant suffix of the full-size download (`...~orig.jpg`).
    pub full_variant: String,
    /// Variant suffix of the large preview (`...~large.jpg`).
    pub large_variant: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url_template: "https://images-assets.nasa.gov/image/{id}/{id}~orig.jpg".to_string(),
            id_prefix: "NHQ".to_string(),
            full_variant: "orig".to_string(),
            large_variant: "large".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel extraction workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Worker threads for a harvest: `max_processes` clamped to the core count,
/// or every core when unset.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism().map_or(1, |n| n.get());
    match config.max_processes {
        Some(limit) => limit.min(cores),
        None => cores,
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// The base layer that user overrides are merged onto.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(HarvestConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Lay a sparse user config over the stock table.
///
/// Nested tables such as `[catalog]` merge key by key, so a user file that sets
/// only `catalog.id_prefix` keeps the stock URL template and variants. Any
/// other value in `overlay` replaces what `base` had.
pub fn merge_toml(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_toml(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
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
    mut base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<HarvestConfig, ConfigError> {
    if let Some(overlay) = overlay {
        merge_toml(&mut base, overlay);
    }
    let config: HarvestConfig = base.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config, merging the user file (if any) over stock defaults.
///
/// `None` means stock defaults. A path that does not exist is an error.
pub fn load_config(path: Option<&Path>) -> Result<HarvestConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let overlay = path.map(load_raw_config).transpose()?;
    if let Some(path) = path {
        log::debug!("Loaded config from {}", path.display());
    }
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# window-harvest configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# Leading bytes read from each image. EXIF and XMP live near the start of a
# JPEG, so a small window is enough for nearly all camera and editor output.
window_bytes = 262144

# ---------------------------------------------------------------------------
# Catalog records
# ---------------------------------------------------------------------------
[catalog]
# Download URL of the source image. {id} is replaced with the identifier
# (the image file stem). The full/large URLs are derived from this one by
# swapping the ~variant suffix.
url_template = "https://images-assets.nasa.gov/image/{id}/{id}~orig.jpg"

# Identifiers shaped like <prefix>YYYYMMDD_... get an id_date for sorting.
id_prefix = "NHQ"

# Variant suffixes for the two derived download URLs.
full_variant = "orig"
large_variant = "large"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel extraction workers. Omit to use all CPU cores.
# Values above the core count are clamped down.
# max_processes = 4
"##
}
