//! Error types for the schema binary.

/// Top-level error for the schema binary.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: canary_db::ConfigError,
    },

    /// The command line could not be parsed.
    #[error("usage error: {message}")]
    Usage {
        /// Description of the problem.
        message: String,
    },
}
