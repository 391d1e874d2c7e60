//! Errors raised while loading or validating a [`ProjectionConfig`](super::ProjectionConfig).

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The configuration file could not be read.
    Io { path: String, message: String },

    /// The TOML document is malformed or has wrongly typed fields.
    Parse { path: String, message: String },

    /// A value parsed but violates a domain rule.
    Validation { field: String, message: String },
}

impl ConfigError {
    pub(crate) fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::Validation { field: field.into(), message: message.into() }
    }
}

impl std::error::Error for ConfigError {}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Failed to read configuration '{path}': {message}")
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Failed to parse configuration '{path}': {message}")
            }
            ConfigError::Validation { field, message } => {
                write!(f, "Invalid configuration value for '{field}': {message}")
            }
        }
    }
}
