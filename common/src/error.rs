//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Page {page} is out of range (1..={total_pages})")]
    PageOutOfRange { page: usize, total_pages: usize },

    #[error("Invalid page size: {0}")]
    InvalidPageSize(usize),

    #[error("Unknown or unavailable category: {0}")]
    UnknownCategory(String),

    #[error("Dictionary error: {0}")]
    Dictionary(String),

    #[error("Records must be a JSON array")]
    NotAnArray,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
