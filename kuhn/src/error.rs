use thiserror::Error;

#[derive(Debug, Error)]
pub enum KuhnError {
    #[error("number of iterations must be positive, got {0}")]
    InvalidIterations(usize),

    /// The evaluated strategy has no entry for a reachable information set.
    /// Train before evaluating.
    #[error("no strategy for information set {key:?}")]
    MissingInfoSet { key: String },

    #[error("invalid history {0:?}: only 'B' and 'C' are allowed")]
    InvalidHistory(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, KuhnError>;
