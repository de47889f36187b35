//! Media Archive CLI
//!
//! 履歴JSONの読み込み・設定・テキスト表示・対話式閲覧。
//! 絞り込みやページ分割は `media_archive_common` のビューモデルが担う。

pub mod browse;
pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod render;
