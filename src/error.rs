use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnakeError {
    /// A raw direction token did not name one of the four directions.
    #[error("invalid direction: {0:?}")]
    InvalidDirection(String),

    #[error("session is still running")]
    NotGameOver,

    #[error("stats storage: {0}")]
    Io(#[from] std::io::Error),

    #[error("stats encoding: {0}")]
    Json(#[from] serde_json::Error),
}
