//! スナップショットのテキスト表示

use chrono::{Datelike, Weekday};
use media_archive_common::{ArchiveRecord, CategoryTab, DayGroup, LoadStatus, Snapshot};
use std::io::{self, Write};

const NO_RESULTS: &str = "此條件下無符合的記錄。";
const LOAD_FAILED: &str = "載入歷史記錄失敗，請稍後再試。";

/// 表示オプション
#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// 折りたたまれた日も中身を表示する
    pub expand_all: bool,
}

pub fn render_snapshot<W: Write>(
    out: &mut W,
    snapshot: &Snapshot,
    options: RenderOptions,
) -> io::Result<()> {
    match &snapshot.status {
        LoadStatus::Failed(message) => {
            writeln!(out, "{}", LOAD_FAILED)?;
            writeln!(out, "  ({})", message)?;
            return Ok(());
        }
        LoadStatus::Loading => writeln!(out, "載入中...")?,
        LoadStatus::Empty | LoadStatus::Ready => {}
    }

    render_tabs(out, snapshot)?;
    if !snapshot.query.trim().is_empty() {
        writeln!(out, "搜尋: {}", snapshot.query.trim())?;
    }
    writeln!(out)?;

    if snapshot.groups.is_empty() {
        writeln!(out, "{}", NO_RESULTS)?;
        return Ok(());
    }

    for month in &snapshot.groups.months {
        writeln!(out, "{} 年 {} 月", month.year, month.month)?;
        for day in &month.days {
            render_day(out, day, options)?;
        }
        writeln!(out)?;
    }

    let info = &snapshot.pagination;
    if info.total_pages > 1 {
        writeln!(
            out,
            "第 {} / {} 頁 (共 {} 項)",
            info.page, info.total_pages, info.total
        )?;
    }
    Ok(())
}

pub fn render_tabs<W: Write>(out: &mut W, snapshot: &Snapshot) -> io::Result<()> {
    let labels: Vec<String> = snapshot
        .categories
        .iter()
        .map(|tab| {
            let label = tab_label(tab);
            if Some(tab.key) == snapshot.active_category {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect();
    writeln!(out, "{}", labels.join("  "))
}

/// タブごとの件数一覧
pub fn render_tab_list<W: Write>(out: &mut W, tabs: &[CategoryTab]) -> io::Result<()> {
    for tab in tabs {
        writeln!(out, "{:<12} {:<16} {:>6} 項", tab.key.key(), tab_label(tab), tab.count)?;
    }
    Ok(())
}

/// `劇集 (05/02)` 形式のタブ名
pub fn tab_label(tab: &CategoryTab) -> String {
    match tab.latest {
        Some(date) => format!("{} ({})", tab.title, date.format("%m/%d")),
        None => tab.title.to_string(),
    }
}

fn render_day<W: Write>(out: &mut W, day: &DayGroup, options: RenderOptions) -> io::Result<()> {
    let heading = format!("{} {}", day.date.format("%m/%d"), weekday_zh(day.date.weekday()));
    if day.expanded || options.expand_all {
        let marker = if day.expanded { '-' } else { '+' };
        writeln!(out, "  {} {}", marker, heading)?;
        for record in &day.records {
            render_record(out, record)?;
        }
    } else {
        writeln!(out, "  + {} ({} 項)", heading, day.records.len())?;
    }
    Ok(())
}

fn render_record<W: Write>(out: &mut W, record: &ArchiveRecord) -> io::Result<()> {
    writeln!(out, "    {}  {}", record.filename, record.local.format("%H:%M:%S"))?;
    writeln!(out, "      {}", record.relative_path)?;
    if let Some(url) = &record.tmdb_url {
        writeln!(out, "      TMDb: {}", url)?;
    }
    if let Some(plot) = &record.plot {
        for line in plot.lines() {
            writeln!(out, "      > {}", line)?;
        }
    }
    Ok(())
}

fn weekday_zh(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "星期一",
        Weekday::Tue => "星期二",
        Weekday::Wed => "星期三",
        Weekday::Thu => "星期四",
        Weekday::Fri => "星期五",
        Weekday::Sat => "星期六",
        Weekday::Sun => "星期日",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use media_archive_common::{ArchiveViewModel, RawRecord, ScriptNormalizer, ViewOptions};

    fn render(snapshot: &Snapshot, options: RenderOptions) -> String {
        let mut buf = Vec::new();
        render_snapshot(&mut buf, snapshot, options).unwrap();
        String::from_utf8(buf).unwrap()
    }

    fn loaded() -> ArchiveViewModel<Utc> {
        let mut vm = ArchiveViewModel::with_timezone(
            ScriptNormalizer::builtin(),
            ViewOptions::default(),
            Utc,
        );
        vm.load(vec![
            RawRecord {
                filename: "E02.mkv".into(),
                relative_path: "連載中/劇/E02.mkv".into(),
                category: Some("tvshow".into()),
                timestamp: Some("2024-05-02T10:00:00".into()),
                tmdb_url: Some("https://www.themoviedb.org/tv/1".into()),
                plot: Some("第二集".into()),
            },
            RawRecord {
                filename: "E01.mkv".into(),
                relative_path: "連載中/劇/E01.mkv".into(),
                category: Some("tvshow".into()),
                timestamp: Some("2024-05-01T20:00:00".into()),
                ..Default::default()
            },
        ]);
        vm
    }

    #[test]
    fn test_render_expanded_and_collapsed_days() {
        let vm = loaded();
        let text = render(vm.snapshot(), RenderOptions::default());

        assert!(text.contains("[劇集 (05/02)]"));
        assert!(text.contains("2024 年 5 月"));
        assert!(text.contains("  - 05/02 星期四"));
        assert!(text.contains("    E02.mkv  10:00:00"));
        assert!(text.contains("      TMDb: https://www.themoviedb.org/tv/1"));
        assert!(text.contains("      > 第二集"));
        assert!(text.contains("  + 05/01 星期三 (1 項)"));
        assert!(!text.contains("E01.mkv"));
    }

    #[test]
    fn test_render_expand_all() {
        let vm = loaded();
        let text = render(vm.snapshot(), RenderOptions { expand_all: true });
        assert!(text.contains("  + 05/01 星期三\n    E01.mkv  20:00:00"));
    }

    #[test]
    fn test_render_page_footer() {
        let mut vm = loaded();
        vm.set_page_size(1).unwrap();

        let text = render(vm.snapshot(), RenderOptions::default());
        assert!(text.contains("第 1 / 2 頁 (共 2 項)"));
        assert!(text.contains("E02.mkv"));

        let text = render(vm.next_page(), RenderOptions::default());
        assert!(text.contains("第 2 / 2 頁 (共 2 項)"));
        assert!(text.contains("  - 05/01 星期三"));
    }

    #[test]
    fn test_no_footer_on_single_page() {
        let vm = loaded();
        let text = render(vm.snapshot(), RenderOptions::default());
        assert!(!text.contains("頁 (共"));
    }

    #[test]
    fn test_render_tab_list() {
        let vm = loaded();
        let mut buf = Vec::new();
        render_tab_list(&mut buf, vm.available_categories()).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("tvshow "));
        assert_eq!(
            lines[0].split_whitespace().collect::<Vec<_>>(),
            vec!["tvshow", "劇集", "(05/02)", "2", "項"]
        );
    }

    #[test]
    fn test_tab_label_without_date() {
        let tab = CategoryTab {
            key: media_archive_common::Category::Movie,
            title: "電影",
            count: 0,
            latest: None,
        };
        assert_eq!(tab_label(&tab), "電影");
    }

    #[test]
    fn test_render_no_results() {
        let mut vm = loaded();
        let text = render(vm.set_query("不存在"), RenderOptions::default());
        assert!(text.contains(NO_RESULTS));
    }

    #[test]
    fn test_render_failed() {
        let mut vm = loaded();
        let ticket = vm.begin_load();
        vm.complete_load(ticket, Err("boom"));
        let text = render(vm.snapshot(), RenderOptions::default());
        assert!(text.starts_with(LOAD_FAILED));
    }
}
