//! 閲覧状態の管理
//!
//! 分類・検索語・ページ・ページサイズを単一の所有者が保持し、状態が変わるたびに
//! 絞り込み → ページ分割 → 日付グループ化 を実行して不変のスナップショットを作る。
//!
//! ## 読み込みの順序保証
//! `begin_load` ごとに世代番号を進め、`complete_load` は最新世代の結果だけを反映する。
//! 先に開始した読み込みが後から完了しても、新しい読み込みの結果は上書きされない。

use crate::category::{available_tabs, CategoryTab};
use crate::error::{Error, Result};
use crate::filter::SearchFilter;
use crate::grouping::{group_by_date, GroupedView};
use crate::pagination::{page_slice, PageInfo};
use crate::script::ScriptNormalizer;
use crate::types::{ArchiveRecord, Category, RawRecord};
use chrono::{Local, TimeZone};
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 1ページの既定件数
pub const DEFAULT_PAGE_SIZE: usize = 30;

/// 初期設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewOptions {
    pub page_size: usize,
    /// データにあれば最初に選ばれる分類
    pub default_category: Category,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            default_category: Category::TvShow,
        }
    }
}

/// 読み込み状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadStatus {
    Empty,
    Loading,
    Ready,
    Failed(String),
}

/// 読み込みの受付票（世代番号）
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

/// `complete_load` の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Applied,
    /// より新しい読み込みが開始済みのため破棄した
    Stale,
}

/// 可変の閲覧状態
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewState {
    pub active_category: Option<Category>,
    pub query: String,
    pub page: usize,
    pub page_size: usize,
}

/// 描画側に渡す不変のスナップショット
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub status: LoadStatus,
    pub active_category: Option<Category>,
    pub categories: Vec<CategoryTab>,
    pub query: String,
    pub pagination: PageInfo,
    pub groups: GroupedView,
}

/// アーカイブ閲覧のビューモデル
pub struct ArchiveViewModel<Tz: TimeZone = Local> {
    normalizer: ScriptNormalizer,
    tz: Tz,
    default_category: Category,
    records: Vec<Arc<ArchiveRecord>>,
    tabs: Vec<CategoryTab>,
    state: ViewState,
    filtered: Vec<Arc<ArchiveRecord>>,
    status: LoadStatus,
    generation: u64,
    snapshot: Snapshot,
}

impl ArchiveViewModel<Local> {
    /// ローカルタイムゾーンで日付を区切る
    pub fn new(normalizer: ScriptNormalizer, options: ViewOptions) -> Self {
        Self::with_timezone(normalizer, options, Local)
    }
}

impl<Tz: TimeZone> ArchiveViewModel<Tz> {
    pub fn with_timezone(normalizer: ScriptNormalizer, options: ViewOptions, tz: Tz) -> Self {
        let state = ViewState {
            active_category: None,
            query: String::new(),
            page: 1,
            page_size: options.page_size.max(1),
        };
        let snapshot = Snapshot {
            status: LoadStatus::Empty,
            active_category: None,
            categories: Vec::new(),
            query: String::new(),
            pagination: PageInfo::clamped(0, 1, state.page_size),
            groups: GroupedView::default(),
        };

        Self {
            normalizer,
            tz,
            default_category: options.default_category,
            records: Vec::new(),
            tabs: Vec::new(),
            state,
            filtered: Vec::new(),
            status: LoadStatus::Empty,
            generation: 0,
            snapshot,
        }
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// 読み込み済みの全レコード（新しい順）
    pub fn records(&self) -> &[Arc<ArchiveRecord>] {
        &self.records
    }

    pub fn available_categories(&self) -> &[CategoryTab] {
        &self.tabs
    }

    // ---- 読み込み ----

    /// 読み込みを開始する。以前の受付票はすべて無効になる
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        self.status = LoadStatus::Loading;
        debug!(generation = self.generation, "load started");
        self.render_page();
        LoadTicket {
            generation: self.generation,
        }
    }

    /// 読み込み結果を反映する（古い受付票なら何もしない）
    pub fn complete_load<E: std::fmt::Display>(
        &mut self,
        ticket: LoadTicket,
        result: std::result::Result<Vec<RawRecord>, E>,
    ) -> LoadOutcome {
        if ticket.generation != self.generation {
            debug!(
                generation = ticket.generation,
                current = self.generation,
                "discarding stale load result"
            );
            return LoadOutcome::Stale;
        }

        match result {
            Ok(raw) => self.apply_records(raw),
            Err(e) => {
                warn!(error = %e, "load failed");
                self.records.clear();
                self.tabs.clear();
                self.state.active_category = None;
                self.state.page = 1;
                self.status = LoadStatus::Failed(e.to_string());
                self.recompute();
            }
        }
        LoadOutcome::Applied
    }

    /// 同期的に読み込む
    pub fn load(&mut self, records: Vec<RawRecord>) -> &Snapshot {
        let ticket = self.begin_load();
        self.complete_load(ticket, Ok::<_, Infallible>(records));
        &self.snapshot
    }

    fn apply_records(&mut self, raw: Vec<RawRecord>) {
        let mut records: Vec<Arc<ArchiveRecord>> = raw
            .into_iter()
            .map(|r| Arc::new(ArchiveRecord::from_raw(r, &self.tz)))
            .collect();
        // 安定ソート: 同時刻は読み込み順
        records.sort_by(|a, b| b.instant.cmp(&a.instant));

        self.tabs = available_tabs(&records, self.default_category);
        self.records = records;

        let active = self.state.active_category;
        if !active.is_some_and(|c| self.tabs.iter().any(|t| t.key == c)) {
            let fallback = self.tabs.first().map(|t| t.key);
            if active.is_some() {
                info!(from = ?active, to = ?fallback, "active category no longer available");
            }
            self.state.active_category = fallback;
        }

        self.state.page = 1;
        self.status = LoadStatus::Ready;
        info!(
            records = self.records.len(),
            categories = self.tabs.len(),
            "archive loaded"
        );
        self.recompute();
    }

    // ---- 操作 ----

    /// 分類を切り替える（データにない分類は拒否）
    pub fn set_category(&mut self, key: &str) -> Result<&Snapshot> {
        let category = Category::parse_key(key)
            .ok_or_else(|| Error::UnknownCategory(key.to_string()))?;
        self.select_category(category)
    }

    pub fn select_category(&mut self, category: Category) -> Result<&Snapshot> {
        if !self.tabs.iter().any(|t| t.key == category) {
            debug!(%category, "category rejected");
            return Err(Error::UnknownCategory(category.key().to_string()));
        }
        self.state.active_category = Some(category);
        self.state.page = 1;
        self.recompute();
        Ok(&self.snapshot)
    }

    pub fn set_query(&mut self, text: &str) -> &Snapshot {
        self.state.query = text.to_string();
        self.state.page = 1;
        self.recompute();
        &self.snapshot
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<&Snapshot> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        self.state.page_size = page_size;
        self.state.page = 1;
        self.recompute();
        Ok(&self.snapshot)
    }

    /// 指定ページへ移動（範囲外は拒否し状態を変えない）
    pub fn goto_page(&mut self, page: usize) -> Result<&Snapshot> {
        PageInfo::new(self.filtered.len(), page, self.state.page_size)?;
        self.state.page = page;
        self.render_page();
        Ok(&self.snapshot)
    }

    pub fn next_page(&mut self) -> &Snapshot {
        if self.snapshot.pagination.has_next {
            self.state.page += 1;
            self.render_page();
        }
        &self.snapshot
    }

    pub fn prev_page(&mut self) -> &Snapshot {
        if self.snapshot.pagination.has_prev {
            self.state.page -= 1;
            self.render_page();
        }
        &self.snapshot
    }

    // ---- 再計算 ----

    fn recompute(&mut self) {
        self.filtered = match self.state.active_category {
            Some(category) => SearchFilter::new(&self.normalizer).filter(
                &self.records,
                category,
                &self.state.query,
            ),
            None => Vec::new(),
        };
        self.render_page();
    }

    fn render_page(&mut self) {
        let info = PageInfo::clamped(self.filtered.len(), self.state.page, self.state.page_size);
        self.state.page = info.page;
        let groups = group_by_date(page_slice(&self.filtered, &info));

        self.snapshot = Snapshot {
            status: self.status.clone(),
            active_category: self.state.active_category,
            categories: self.tabs.clone(),
            query: self.state.query.clone(),
            pagination: info,
            groups,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn raw(name: &str, category: &str, timestamp: &str) -> RawRecord {
        RawRecord {
            filename: name.into(),
            relative_path: format!("連載中/{name}"),
            category: Some(category.into()),
            timestamp: Some(timestamp.into()),
            ..Default::default()
        }
    }

    fn view_model() -> ArchiveViewModel<Utc> {
        ArchiveViewModel::with_timezone(ScriptNormalizer::builtin(), ViewOptions::default(), Utc)
    }

    #[test]
    fn test_initial_state() {
        let vm = view_model();
        let snapshot = vm.snapshot();
        assert_eq!(snapshot.status, LoadStatus::Empty);
        assert_eq!(snapshot.active_category, None);
        assert_eq!(snapshot.pagination.total_pages, 1);
        assert!(snapshot.groups.is_empty());
    }

    #[test]
    fn test_load_sorts_descending_with_stable_ties() {
        let mut vm = view_model();
        vm.load(vec![
            raw("old", "tvshow", "2024-05-01T00:00:00"),
            raw("tie1", "tvshow", "2024-05-02T00:00:00"),
            raw("tie2", "tvshow", "2024-05-02T00:00:00"),
        ]);
        let names: Vec<_> = vm.records().iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(names, vec!["tie1", "tie2", "old"]);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut vm = view_model();
        let first = vm.begin_load();
        let second = vm.begin_load();

        let outcome = vm.complete_load(
            second,
            Ok::<_, Infallible>(vec![raw("new", "movie", "2024-05-02T00:00:00")]),
        );
        assert_eq!(outcome, LoadOutcome::Applied);

        let outcome = vm.complete_load(
            first,
            Ok::<_, Infallible>(vec![raw("old", "tvshow", "2024-05-01T00:00:00")]),
        );
        assert_eq!(outcome, LoadOutcome::Stale);

        assert_eq!(vm.records().len(), 1);
        assert_eq!(vm.records()[0].filename, "new");
        assert_eq!(vm.snapshot().active_category, Some(Category::Movie));
    }

    #[test]
    fn test_failed_load_is_empty_state() {
        let mut vm = view_model();
        vm.load(vec![raw("a", "tvshow", "2024-05-01T00:00:00")]);

        let ticket = vm.begin_load();
        vm.complete_load(ticket, Err("connection refused"));

        let snapshot = vm.snapshot();
        assert_eq!(snapshot.status, LoadStatus::Failed("connection refused".into()));
        assert!(snapshot.categories.is_empty());
        assert_eq!(snapshot.active_category, None);
        assert_eq!(snapshot.pagination.total, 0);
        assert!(vm.records().is_empty());
    }

    #[test]
    fn test_reload_falls_back_when_category_disappears() {
        let mut vm = view_model();
        vm.load(vec![
            raw("a", "tvshow", "2024-05-01T00:00:00"),
            raw("b", "magazine", "2024-05-01T00:00:00"),
        ]);
        vm.set_category("magazine").unwrap();

        vm.load(vec![
            raw("c", "movie", "2024-05-01T00:00:00"),
            raw("d", "animation", "2024-05-01T00:00:00"),
        ]);
        assert_eq!(vm.state().active_category, Some(Category::Movie));
        assert_eq!(vm.state().page, 1);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let mut vm = view_model();
        vm.load(vec![raw("a", "tvshow", "2024-05-01T00:00:00")]);

        assert!(matches!(vm.set_category("podcast"), Err(Error::UnknownCategory(_))));
        assert!(matches!(vm.set_category("movie"), Err(Error::UnknownCategory(_))));
        assert_eq!(vm.state().active_category, Some(Category::TvShow));
    }

    #[test]
    fn test_invalid_page_size_rejected() {
        let mut vm = view_model();
        vm.load(vec![raw("a", "tvshow", "2024-05-01T00:00:00")]);
        let before = vm.snapshot().clone();
        assert!(matches!(vm.set_page_size(0), Err(Error::InvalidPageSize(0))));
        assert_eq!(vm.snapshot(), &before);
    }
}
