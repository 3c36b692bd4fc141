use dropline_core::{GeometryError, PieceId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// No complete path through the window exists from the current board.
    #[error("no placement found for piece {piece}")]
    NoPlacement { piece: PieceId },

    #[error("invalid search config: {0}")]
    InvalidConfig(&'static str),

    #[error("could not parse config: {0}")]
    Config(#[from] serde_json::Error),

    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not start worker threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
