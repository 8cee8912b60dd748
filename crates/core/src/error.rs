use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("data provider error: {0}")]
    Provider(String),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("snapshot store error: {0}")]
    Store(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type EngineResult<T> = Result<T, EngineError>;
