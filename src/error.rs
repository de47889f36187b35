use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("履歴ファイルが見つかりません: {0}")]
    DataFileNotFound(String),

    #[error("履歴の読み込みに失敗: {0}")]
    Load(String),

    #[error("{0}")]
    Core(#[from] media_archive_common::Error),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error("入力エラー: {0}")]
    Prompt(String),
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
