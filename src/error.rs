use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetropolisError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Puzzle Input Error: {0}")]
    Input(String),

    /// Internal consistency failure. Never recovered from.
    #[error("Invariant Violated: {0}")]
    Invariant(String),
}

pub type MetroResult<T> = Result<T, MetropolisError>;
