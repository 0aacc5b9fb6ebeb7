/// Result type alias for the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for sequencing, scoring and the surrounding plumbing
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("unknown rule id: {0}")]
    UnknownRule(String),

    #[error("word is not part of the vocabulary: {0}")]
    UnknownWord(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("a response was already recorded; waiting for the next trial")]
    AdvancePending,

    #[error("all trials of this session have been answered")]
    SessionFinished,

    #[error("session still has {remaining} trial(s) left")]
    SessionInProgress { remaining: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
