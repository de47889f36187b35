//! 分類・検索語による絞り込み
//!
//! 検索語と対象文字列の双方を繁体字・簡体字に変換し、4通りの組み合わせの
//! いずれかで部分一致すれば一致とみなす。並び順は入力順のまま。

use crate::script::ScriptNormalizer;
use crate::types::{ArchiveRecord, Category};
use std::sync::Arc;

/// 正規化済みの検索語
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    traditional: String,
    simplified: String,
}

impl PreparedQuery {
    /// 前後の空白を除き小文字化する。空なら `None`（絞り込みなし）
    pub fn new(normalizer: &ScriptNormalizer, query: &str) -> Option<Self> {
        let lowered = query.trim().to_lowercase();
        if lowered.is_empty() {
            return None;
        }
        Some(Self {
            traditional: normalizer.to_traditional(&lowered),
            simplified: normalizer.to_simplified(&lowered),
        })
    }
}

/// 検索フィルタ
#[derive(Debug, Clone, Copy)]
pub struct SearchFilter<'a> {
    normalizer: &'a ScriptNormalizer,
}

impl<'a> SearchFilter<'a> {
    pub fn new(normalizer: &'a ScriptNormalizer) -> Self {
        Self { normalizer }
    }

    /// 分類と検索語で絞り込む
    pub fn filter(
        &self,
        records: &[Arc<ArchiveRecord>],
        category: Category,
        query: &str,
    ) -> Vec<Arc<ArchiveRecord>> {
        let prepared = PreparedQuery::new(self.normalizer, query);

        records
            .iter()
            .filter(|record| record.category == category)
            .filter(|record| match &prepared {
                Some(q) => self.matches(record, q),
                None => true,
            })
            .cloned()
            .collect()
    }

    /// 1件が検索語に一致するか
    pub fn matches(&self, record: &ArchiveRecord, query: &PreparedQuery) -> bool {
        let target = search_field(record).to_lowercase();
        let target_traditional = self.normalizer.to_traditional(&target);
        let target_simplified = self.normalizer.to_simplified(&target);

        [&target_traditional, &target_simplified].iter().any(|t| {
            t.contains(query.traditional.as_str()) || t.contains(query.simplified.as_str())
        })
    }
}

/// 検索対象の文字列（雑誌はファイル名、それ以外は相対パス）
pub fn search_field(record: &ArchiveRecord) -> &str {
    if record.category == Category::Magazine {
        &record.filename
    } else {
        &record.relative_path
    }
}
