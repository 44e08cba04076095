//! fp-config: configuration schema and resolution for figpolish.
//!
//! A configuration is resolved from four layers: the hard defaults of
//! [`ConfigRecord`], a named [`StylePreset`], user overrides (any JSON-like
//! mapping, usually loaded with [`load_overrides`]) and derived values.
//! Resolution is pure and never fails; problems come back as
//! [`ConfigWarning`]s.

pub mod error;
pub mod palettes;
pub mod presets;
pub mod resolve;
pub mod rules;
pub mod schema;

pub use error::{ConfigError, ConfigResult, ConfigWarning};
pub use palettes::palette_colors;
pub use presets::StylePreset;
pub use resolve::{DerivedFields, ResolvedConfig, resolve};
pub use schema::{
    BoxStyle, ConfigRecord, CycleMode, ExportFormat, ExportSettings, GridDensity, LabelStyle,
    OverlaySettings, PaletteName, PanelLabeling, ScalingTable, Statistic,
};

use std::fs;
use std::path::Path;

use serde_json::Value;

/// Load a user override mapping from a YAML (`.yaml`, `.yml`) or JSON file.
///
/// The content is returned untyped; field checking happens in [`resolve`].
pub fn load_overrides(path: &Path) -> ConfigResult<Value> {
    let is_yaml = match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml" | "yml") => true,
        Some("json") => false,
        _ => {
            return Err(ConfigError::UnsupportedFormat {
                path: path.to_path_buf(),
            });
        }
    };
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    if is_yaml {
        parse_yaml(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Parse YAML into a JSON value. An empty document is an empty override set.
pub fn parse_yaml(text: &str) -> Result<Value, serde_yaml::Error> {
    let value: Option<Value> = serde_yaml::from_str(text)?;
    Ok(value.unwrap_or(Value::Null))
}
