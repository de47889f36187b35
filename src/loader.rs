//! 履歴JSONの読み込み
//!
//! `media_updates.json` を非同期に読み込み、ビューモデルの世代番号付きの
//! 読み込み口（begin_load / complete_load）へ結果を渡す。

use crate::error::{ArchiveError, Result};
use chrono::TimeZone;
use media_archive_common::{parse_records, ArchiveViewModel, LoadOutcome, RawRecord};
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::debug;

/// 履歴ファイルを読み込む
pub async fn fetch_records(path: &Path) -> Result<Vec<RawRecord>> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ArchiveError::DataFileNotFound(path.display().to_string()));
        }
        Err(e) => return Err(e.into()),
    };

    let records = parse_records(&content)?;
    debug!(path = %path.display(), records = records.len(), "records fetched");
    Ok(records)
}

/// 別タスクで読み込む
pub fn spawn_fetch(path: PathBuf) -> JoinHandle<Result<Vec<RawRecord>>> {
    tokio::spawn(async move { fetch_records(&path).await })
}

/// 読み込んでビューモデルに反映する
///
/// 失敗した場合もビューモデルは `Failed` の空状態になり、エラーは外へ出さない。
pub async fn load_into<Tz: TimeZone>(
    view_model: &mut ArchiveViewModel<Tz>,
    path: &Path,
) -> LoadOutcome {
    let ticket = view_model.begin_load();
    let result = fetch_records(path).await;
    view_model.complete_load(ticket, result)
}

/// タスクの完了を待って反映する（パニックしたタスクも失敗として扱う）
pub async fn complete_spawned<Tz: TimeZone>(
    view_model: &mut ArchiveViewModel<Tz>,
    ticket: media_archive_common::LoadTicket,
    handle: JoinHandle<Result<Vec<RawRecord>>>,
) -> LoadOutcome {
    let result = match handle.await {
        Ok(result) => result,
        Err(e) => Err(ArchiveError::Load(e.to_string())),
    };
    view_model.complete_load(ticket, result)
}
