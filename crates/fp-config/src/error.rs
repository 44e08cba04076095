use std::path::PathBuf;

/// Failure to read an override file. Resolution itself never fails.
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported config file extension: {path} (expected .yaml, .yml or .json)")]
    UnsupportedFormat { path: PathBuf },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// A recoverable problem found while resolving a configuration.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConfigWarning {
    #[error("Unknown style preset '{name}', using 'default'")]
    UnknownPreset { name: String },

    #[error("Unknown parameter '{name}' ignored")]
    UnknownParameter { name: String },

    #[error("Unknown parameter '{section}.{name}' ignored")]
    UnknownSubParameter { section: String, name: String },

    #[error("Invalid value for {field}: {value} ({reason}); using default")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Inconsistent configuration: {what}")]
    Inconsistent { what: String },
}

impl ConfigWarning {
    /// The field the warning is about, when there is one.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigWarning::UnknownParameter { name } => Some(name),
            ConfigWarning::UnknownSubParameter { name, .. } => Some(name),
            ConfigWarning::InvalidValue { field, .. } => Some(field),
            ConfigWarning::UnknownPreset { .. } | ConfigWarning::Inconsistent { .. } => None,
        }
    }
}
