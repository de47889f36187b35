//! 対話式閲覧モジュール
//!
//! スナップショットを表示し、選んだ操作をビューモデルに渡す。
//! 拒否された操作（範囲外のページなど）はメッセージを表示して状態を保つ。

use crate::config::Config;
use crate::error::{ArchiveError, Result};
use crate::loader::load_into;
use crate::render::{render_snapshot, tab_label, RenderOptions};
use chrono::TimeZone;
use dialoguer::{Input, Select};
use media_archive_common::{ArchiveViewModel, Category, Snapshot};
use std::path::Path;

/// 対話アクション
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    /// 次のページ
    Next,
    /// 前のページ
    Prev,
    /// 指定ページへ
    Goto(usize),
    /// 検索語を設定
    Search(String),
    /// 分類を切り替え
    Category(Category),
    /// 1ページの件数を変更
    PageSize(usize),
    /// 履歴ファイルを再読み込み
    Reload,
    /// 終了
    Quit,
}

/// アクション適用後の指示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Continue,
    Reload,
    Quit,
}

/// アクションをビューモデルに適用する
pub fn apply_action<Tz: TimeZone>(
    view_model: &mut ArchiveViewModel<Tz>,
    action: &BrowseAction,
) -> Result<Step> {
    match action {
        BrowseAction::Next => {
            view_model.next_page();
        }
        BrowseAction::Prev => {
            view_model.prev_page();
        }
        BrowseAction::Goto(page) => {
            view_model.goto_page(*page)?;
        }
        BrowseAction::Search(query) => {
            view_model.set_query(query);
        }
        BrowseAction::Category(category) => {
            view_model.select_category(*category)?;
        }
        BrowseAction::PageSize(size) => {
            view_model.set_page_size(*size)?;
        }
        BrowseAction::Reload => return Ok(Step::Reload),
        BrowseAction::Quit => return Ok(Step::Quit),
    }
    Ok(Step::Continue)
}

/// 対話式で閲覧
pub async fn run_browser(config: &Config, data_file: &Path) -> Result<()> {
    let mut view_model = ArchiveViewModel::new(config.normalizer()?, config.view_options()?);
    load_into(&mut view_model, data_file).await;

    loop {
        {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            render_snapshot(&mut out, view_model.snapshot(), RenderOptions::default())?;
        }

        let Some(action) = prompt_action(view_model.snapshot())? else {
            continue;
        };

        match apply_action(&mut view_model, &action) {
            Ok(Step::Continue) => {}
            Ok(Step::Reload) => {
                println!("再読み込み中: {}", data_file.display());
                load_into(&mut view_model, data_file).await;
            }
            Ok(Step::Quit) => break,
            Err(e) => println!("✗ {}\n", e),
        }
    }

    Ok(())
}

const MENU: &[&str] = &[
    "次のページ",
    "前のページ",
    "ページ指定",
    "検索",
    "分類切替",
    "表示件数",
    "再読み込み",
    "終了",
];

fn prompt_error(e: dialoguer::Error) -> ArchiveError {
    ArchiveError::Prompt(e.to_string())
}

/// 操作選択プロンプト
fn prompt_action(snapshot: &Snapshot) -> Result<Option<BrowseAction>> {
    let selection = Select::new()
        .with_prompt("操作")
        .items(MENU)
        .default(0)
        .interact()
        .map_err(prompt_error)?;

    let action = match selection {
        0 => BrowseAction::Next,
        1 => BrowseAction::Prev,
        2 => {
            let page: usize = Input::new()
                .with_prompt(format!("ページ番号 (1-{})", snapshot.pagination.total_pages))
                .interact_text()
                .map_err(prompt_error)?;
            BrowseAction::Goto(page)
        }
        3 => {
            let query: String = Input::new()
                .with_prompt("検索語（空で解除）")
                .with_initial_text(snapshot.query.clone())
                .allow_empty(true)
                .interact_text()
                .map_err(prompt_error)?;
            BrowseAction::Search(query)
        }
        4 => {
            if snapshot.categories.is_empty() {
                println!("選択できる分類がありません\n");
                return Ok(None);
            }
            let labels: Vec<String> = snapshot.categories.iter().map(tab_label).collect();
            let current = snapshot
                .categories
                .iter()
                .position(|t| Some(t.key) == snapshot.active_category)
                .unwrap_or(0);
            let index = Select::new()
                .with_prompt("分類")
                .items(&labels)
                .default(current)
                .interact()
                .map_err(prompt_error)?;
            BrowseAction::Category(snapshot.categories[index].key)
        }
        5 => {
            let size: usize = Input::new()
                .with_prompt("1ページの件数")
                .with_initial_text(snapshot.pagination.page_size.to_string())
                .interact_text()
                .map_err(prompt_error)?;
            BrowseAction::PageSize(size)
        }
        6 => BrowseAction::Reload,
        _ => BrowseAction::Quit,
    };
    Ok(Some(action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use media_archive_common::{RawRecord, ScriptNormalizer, ViewOptions};

    fn view_model() -> ArchiveViewModel<Utc> {
        let mut vm = ArchiveViewModel::with_timezone(
            ScriptNormalizer::builtin(),
            ViewOptions { page_size: 1, default_category: Category::TvShow },
            Utc,
        );
        vm.load(
            ["2024-05-03", "2024-05-02", "2024-05-01"]
                .iter()
                .map(|date| RawRecord {
                    filename: format!("{date}.mkv"),
                    category: Some("tvshow".into()),
                    timestamp: Some(format!("{date}T12:00:00")),
                    ..Default::default()
                })
                .collect(),
        );
        vm
    }

    #[test]
    fn test_apply_navigation() {
        let mut vm = view_model();
        assert_eq!(apply_action(&mut vm, &BrowseAction::Next).unwrap(), Step::Continue);
        assert_eq!(vm.state().page, 2);
        apply_action(&mut vm, &BrowseAction::Goto(3)).unwrap();
        assert_eq!(vm.state().page, 3);
        apply_action(&mut vm, &BrowseAction::Prev).unwrap();
        assert_eq!(vm.state().page, 2);
    }

    #[test]
    fn test_rejected_action_keeps_state() {
        let mut vm = view_model();
        apply_action(&mut vm, &BrowseAction::Goto(2)).unwrap();

        let err = apply_action(&mut vm, &BrowseAction::Goto(9)).unwrap_err();
        assert!(matches!(err, ArchiveError::Core(_)));
        assert_eq!(vm.state().page, 2);

        assert!(apply_action(&mut vm, &BrowseAction::PageSize(0)).is_err());
        assert!(apply_action(&mut vm, &BrowseAction::Category(Category::Movie)).is_err());
        assert_eq!(vm.state().page, 2);
    }

    #[test]
    fn test_reload_and_quit() {
        let mut vm = view_model();
        assert_eq!(apply_action(&mut vm, &BrowseAction::Reload).unwrap(), Step::Reload);
        assert_eq!(apply_action(&mut vm, &BrowseAction::Quit).unwrap(), Step::Quit);
    }
}
