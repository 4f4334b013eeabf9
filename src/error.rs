use thiserror::Error;

#[derive(Error, Debug)]
pub enum TauForgeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Schema Error: {0}")]
    Schema(String),
}

pub type TfResult<T> = Result<T, TauForgeError>;
