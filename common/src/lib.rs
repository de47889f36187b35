//! Media Archive Common Library
//!
//! 更新履歴アーカイブの絞り込み・繁簡正規化・日付グループ化・ページ分割。
//! 描画や通信は扱わず、CLIなどの描画側にスナップショットを渡す。

pub mod types;
pub mod error;
pub mod script;
pub mod filter;
pub mod grouping;
pub mod pagination;
pub mod category;
pub mod view_model;

pub use types::{ArchiveRecord, Category, RawRecord, parse_records, parse_timestamp};
pub use error::{Error, Result};
pub use script::{Collision, ScriptDictionary, ScriptNormalizer};
pub use filter::{PreparedQuery, SearchFilter};
pub use grouping::{DayGroup, GroupedView, MonthGroup, group_by_date};
pub use pagination::{Page, PageInfo, paginate};
pub use category::{CategoryTab, available_tabs};
pub use view_model::{
    ArchiveViewModel, LoadOutcome, LoadStatus, LoadTicket, Snapshot, ViewOptions, ViewState,
    DEFAULT_PAGE_SIZE,
};
