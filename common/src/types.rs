//! 履歴レコードの型定義
//!
//! - RawRecord: `media_updates.json` の1要素（読み込み直後）
//! - ArchiveRecord: 時刻を解釈済みの不変レコード
//! - Category: 固定の分類

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// 分類
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    TvShow,
    Movie,
    Collection,
    Animation,
    Magazine,
    Unknown,
}

impl Category {
    /// タブの表示順
    pub const PREFERRED_ORDER: [Category; 6] = [
        Category::TvShow,
        Category::Movie,
        Category::Collection,
        Category::Animation,
        Category::Magazine,
        Category::Unknown,
    ];

    /// キーから分類を取得（不明なキーは `Unknown`）
    pub fn from_key(key: &str) -> Self {
        Self::parse_key(key).unwrap_or(Category::Unknown)
    }

    /// キーから分類を取得（不明なキーは `None`）
    pub fn parse_key(key: &str) -> Option<Self> {
        match key {
            "tvshow" => Some(Category::TvShow),
            "movie" => Some(Category::Movie),
            "collection" => Some(Category::Collection),
            "animation" => Some(Category::Animation),
            "magazine" => Some(Category::Magazine),
            "unknown" => Some(Category::Unknown),
            _ => None,
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            Category::TvShow => "tvshow",
            Category::Movie => "movie",
            Category::Collection => "collection",
            Category::Animation => "animation",
            Category::Magazine => "magazine",
            Category::Unknown => "unknown",
        }
    }

    /// タブの表示名
    pub fn title(self) -> &'static str {
        match self {
            Category::TvShow => "劇集",
            Category::Movie => "電影",
            Category::Collection => "全集",
            Category::Animation => "動漫",
            Category::Magazine => "雜誌",
            Category::Unknown => "未分類",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// 読み込み直後のレコード
///
/// 監視スクリプトが書き出す `absolute_path` や `tmdb_id` などの余分なキーは無視する。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawRecord {
    pub filename: String,
    pub relative_path: String,
    pub category: Option<String>,
    pub timestamp: Option<String>,
    pub tmdb_url: Option<String>,
    pub plot: Option<String>,
}

/// 時刻解釈済みのレコード
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveRecord {
    pub filename: String,
    pub relative_path: String,
    pub category: Category,
    /// 絶対時刻（解釈できなければエポック）
    pub instant: DateTime<Utc>,
    /// 表示用タイムゾーンでの日時
    pub local: NaiveDateTime,
    pub tmdb_url: Option<String>,
    pub plot: Option<String>,
}

impl ArchiveRecord {
    pub fn from_raw<Tz: TimeZone>(raw: RawRecord, tz: &Tz) -> Self {
        let instant = match raw.timestamp.as_deref().and_then(|t| parse_timestamp(t, tz)) {
            Some(instant) => instant,
            None => {
                warn!(
                    filename = %raw.filename,
                    timestamp = ?raw.timestamp,
                    "unparsable timestamp, falling back to epoch"
                );
                epoch()
            }
        };

        Self {
            local: instant.with_timezone(tz).naive_local(),
            category: raw.category.as_deref().map(Category::from_key).unwrap_or(Category::Unknown),
            filename: raw.filename,
            relative_path: raw.relative_path,
            instant,
            tmdb_url: raw.tmdb_url.filter(|s| !s.trim().is_empty()),
            plot: raw.plot.filter(|s| !s.trim().is_empty()),
        }
    }

    /// 表示用タイムゾーンでの日付
    pub fn local_date(&self) -> NaiveDate {
        self.local.date()
    }
}

/// Unix エポック
pub fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// ISO-8601 の時刻文字列を解釈する
///
/// - オフセット付き（RFC 3339）はそのまま
/// - オフセットなしの日時は `tz` のローカル時刻として扱う
/// - 日付のみは UTC の 0 時
pub fn parse_timestamp<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(resolve_local(tz, naive));
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// ローカル時刻を絶対時刻にする
///
/// 重複する時刻は早い方。夏時間の開始で存在しない時刻は1時間進めて解釈する。
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| {
            naive
                .checked_add_signed(Duration::hours(1))
                .and_then(|shifted| tz.from_local_datetime(&shifted).earliest())
        })
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

/// JSON配列からレコードを読み込む
///
/// 要素単位で失敗を切り離し、壊れた要素だけを読み飛ばす。
pub fn parse_records(json: &str) -> Result<Vec<RawRecord>> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let serde_json::Value::Array(items) = value else {
        return Err(Error::NotAnArray);
    };

    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<RawRecord>(item) {
            Ok(record) => records.push(record),
            Err(e) => warn!(index, error = %e, "skipping malformed record"),
        }
    }
    Ok(records)
}
