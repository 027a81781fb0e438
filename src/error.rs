use thiserror::Error;

/// Failure to load or validate a criteria catalog.
///
/// Any of these at startup is fatal: there is no default to fall back to
/// once a caller has asked for a specific catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("pattern '{pattern}' does not compile: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unsupported catalog format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid catalog: {0}")]
    Invalid(String),
}

/// Failure to load or validate engine configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}
