//! 日付グループ化モジュール
//!
//! ページ内のレコードを「月 → 日 → レコード」の階層にまとめる。
//! 月・日とも新しい順。日の中はレコードの到着順を保つ。

use crate::types::ArchiveRecord;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// 1日分のグループ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroup {
    /// `YYYY-MM-DD`
    pub key: String,
    pub date: NaiveDate,
    /// 初期表示で展開する日か（ページ内の最新日）
    pub expanded: bool,
    pub records: Vec<Arc<ArchiveRecord>>,
}

/// 1か月分のグループ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGroup {
    /// `YYYY-MM`
    pub key: String,
    pub year: i32,
    pub month: u32,
    pub days: Vec<DayGroup>,
}

/// グループ化の結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GroupedView {
    pub months: Vec<MonthGroup>,
    /// 初期展開する日（レコードがなければ `None`）
    pub expanded_day: Option<NaiveDate>,
}

impl GroupedView {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// 表示順にレコードを列挙
    pub fn records(&self) -> impl Iterator<Item = &Arc<ArchiveRecord>> {
        self.months
            .iter()
            .flat_map(|m| m.days.iter())
            .flat_map(|d| d.records.iter())
    }

    pub fn day_count(&self) -> usize {
        self.months.iter().map(|m| m.days.len()).sum()
    }
}

fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

fn day_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}-{:02}", date.year(), date.month(), date.day())
}

/// レコード列を月・日の階層にまとめる
pub fn group_by_date(records: &[Arc<ArchiveRecord>]) -> GroupedView {
    let mut months: BTreeMap<String, BTreeMap<String, (NaiveDate, Vec<Arc<ArchiveRecord>>)>> =
        BTreeMap::new();

    for record in records {
        let date = record.local_date();
        months
            .entry(month_key(date))
            .or_default()
            .entry(day_key(date))
            .or_insert_with(|| (date, Vec::new()))
            .1
            .push(Arc::clone(record));
    }

    // 同時刻なら先に来たレコード
    let expanded_day = records
        .iter()
        .fold(None::<&Arc<ArchiveRecord>>, |latest, r| match latest {
            Some(l) if l.instant >= r.instant => Some(l),
            _ => Some(r),
        })
        .map(|r| r.local_date());

    let months = months
        .into_iter()
        .rev()
        .map(|(key, days)| {
            let days: Vec<DayGroup> = days
                .into_iter()
                .rev()
                .map(|(key, (date, records))| DayGroup {
                    key,
                    date,
                    expanded: Some(date) == expanded_day,
                    records,
                })
                .collect();
            let first = days[0].date;
            MonthGroup {
                key,
                year: first.year(),
                month: first.month(),
                days,
            }
        })
        .collect();

    GroupedView { months, expanded_day }
}
