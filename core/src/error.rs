use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("Random source exhausted after {draws} draws")]
    RandomSourceExhausted { draws: u64 },

    #[error("Parse error on line {line}: {reason}")]
    Parse { line: usize, reason: String },

    #[error("Cannot read {path}: {source}")]
    Io {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SimError {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput { reason: reason.into() }
    }

    pub fn io(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }
}

pub type SimResult<T> = Result<T, SimError>;
