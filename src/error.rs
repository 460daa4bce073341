//!
//! 错误类型
//!
//! 找不到路径不算错误（返回空路径，深度为0），这里只有可恢复的错误
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PolyPathError {
    #[error("region needs at least {expected} vertices, found {found}")]
    TooFewVertices { expected: usize, found: usize },

    #[error("region needs at least 3 distinct vertices, found {0}")]
    DegenerateRegion(usize),

    #[error("invalid cell size {width}x{height}")]
    InvalidCellSize { width: usize, height: usize },

    #[error("fixture I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid fixture: {0}")]
    InvalidFixture(String),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PolyPathError>;
