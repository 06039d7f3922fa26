/// Errors from reading, writing or editing a config store.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The store only accepts an allow-listed set of keys.
    #[error("Key '{0}' is not allowed in this config")]
    KeyNotAllowed(String),

    /// A prefix of the dotted key already holds a plain value.
    #[error("Cannot set '{key}': '{prefix}' is not a table")]
    NotATable { key: String, prefix: String },

    #[error("Config key is empty or has an empty segment")]
    EmptyKey,
}
