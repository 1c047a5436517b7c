use thiserror::Error;

#[derive(Debug, Error)]
pub enum ListingsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("append mode requires at least one --new input")]
    AppendWithoutInputs,

    #[error("no input CSV source available")]
    NoInputs,
}
