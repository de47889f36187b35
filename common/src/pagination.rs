//! ページ分割

use crate::error::{Error, Result};
use serde::Serialize;

/// ページ情報
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub total_pages: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl PageInfo {
    /// 範囲外のページは検証エラー
    pub fn new(total: usize, page: usize, page_size: usize) -> Result<Self> {
        if page_size == 0 {
            return Err(Error::InvalidPageSize(page_size));
        }
        let total_pages = total_pages(total, page_size);
        if page == 0 || page > total_pages {
            return Err(Error::PageOutOfRange { page, total_pages });
        }
        Ok(Self {
            page,
            page_size,
            total,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
        })
    }

    /// ページ番号を範囲内に丸めて作る（状態の再計算用）
    pub fn clamped(total: usize, page: usize, page_size: usize) -> Self {
        let page_size = page_size.max(1);
        let total_pages = total_pages(total, page_size);
        let page = page.clamp(1, total_pages);
        Self {
            page,
            page_size,
            total,
            total_pages,
            has_prev: page > 1,
            has_next: page < total_pages,
        }
    }

    /// 先頭要素のオフセット
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }
}

/// 総ページ数（0件でも1ページ）
pub fn total_pages(total: usize, page_size: usize) -> usize {
    total.div_ceil(page_size.max(1)).max(1)
}

/// 1ページ分
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page<'a, T> {
    pub items: &'a [T],
    pub info: PageInfo,
}

/// 指定ページを切り出す
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> Result<Page<'_, T>> {
    let info = PageInfo::new(items.len(), page, page_size)?;
    Ok(Page {
        items: page_slice(items, &info),
        info,
    })
}

/// ページ情報に対応する範囲
pub fn page_slice<'a, T>(items: &'a [T], info: &PageInfo) -> &'a [T] {
    let start = info.offset().min(items.len());
    let end = start.saturating_add(info.page_size).min(items.len());
    &items[start..end]
}
