//! 分類タブ

use crate::types::{ArchiveRecord, Category};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// 分類タブ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTab {
    pub key: Category,
    pub title: &'static str,
    /// この分類のレコード数
    pub count: usize,
    /// 最新レコードの日付
    pub latest: Option<NaiveDate>,
}

/// データに存在する分類のタブを並べる
///
/// 既定の分類があれば先頭、残りは `Category::PREFERRED_ORDER` の順。
/// `records` は新しい順に並んでいる前提。
pub fn available_tabs(records: &[Arc<ArchiveRecord>], default: Category) -> Vec<CategoryTab> {
    let mut stats: HashMap<Category, (usize, NaiveDate)> = HashMap::new();
    for record in records {
        stats
            .entry(record.category)
            .and_modify(|(count, _)| *count += 1)
            .or_insert((1, record.local_date()));
    }

    let order = std::iter::once(default).chain(
        Category::PREFERRED_ORDER
            .into_iter()
            .filter(move |c| *c != default),
    );

    order
        .filter_map(|key| {
            stats.get(&key).map(|&(count, latest)| CategoryTab {
                key,
                title: key.title(),
                count,
                latest: Some(latest),
            })
        })
        .collect()
}
