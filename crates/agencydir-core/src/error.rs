use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read query file {path}: {source}")]
    QueryFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse query file {path}: {source}")]
    QueryFileParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
