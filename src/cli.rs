use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "media-archive")]
#[command(about = "メディア更新履歴アーカイブ閲覧ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 1ページ分の履歴を表示
    List {
        /// 履歴JSONファイル（省略時は設定の data_file）
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// 分類 (tvshow/movie/collection/animation/magazine/unknown)
        #[arg(short, long)]
        category: Option<String>,

        /// 検索語（繁体字・簡体字どちらでも可）
        #[arg(short, long)]
        query: Option<String>,

        /// ページ番号
        #[arg(short, long)]
        page: Option<usize>,

        /// 1ページの件数
        #[arg(long)]
        page_size: Option<usize>,

        /// 折りたたまれた日も展開して表示
        #[arg(long)]
        expand_all: bool,

        /// スナップショットをJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// 分類タブの一覧
    Tabs {
        /// 履歴JSONファイル
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// 対話的に閲覧
    Browse {
        /// 履歴JSONファイル
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// 繁簡変換
    Convert {
        /// 変換する文字列
        #[arg(required = true)]
        text: String,

        /// 変換先 (traditional/simplified)
        #[arg(short, long, default_value = "traditional")]
        to: ScriptTarget,
    },

    /// 設定を表示/編集
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,

        /// 1ページの件数を設定
        #[arg(long)]
        set_page_size: Option<usize>,

        /// 既定の分類を設定
        #[arg(long)]
        set_default_category: Option<String>,

        /// 履歴JSONファイルを設定
        #[arg(long)]
        set_data_file: Option<PathBuf>,

        /// 追加の繁簡対応表（JSON）を設定
        #[arg(long)]
        set_dictionary: Option<PathBuf>,
    },
}

/// 変換先の字体
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptTarget {
    #[default]
    Traditional,
    Simplified,
}

impl std::str::FromStr for ScriptTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "traditional" | "trad" | "t" | "繁" | "繁體" => Ok(ScriptTarget::Traditional),
            "simplified" | "simp" | "s" | "简" | "简体" => Ok(ScriptTarget::Simplified),
            _ => Err(format!("Unknown script: {}. Use traditional or simplified", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_target_from_str() {
        assert_eq!("trad".parse::<ScriptTarget>(), Ok(ScriptTarget::Traditional));
        assert_eq!("Simplified".parse::<ScriptTarget>(), Ok(ScriptTarget::Simplified));
        assert!("kana".parse::<ScriptTarget>().is_err());
    }

    #[test]
    fn test_parse_list_args() {
        let cli = Cli::parse_from([
            "media-archive", "list", "--category", "movie", "--query", "电影", "--page", "2",
        ]);
        match cli.command {
            Commands::List { category, query, page, json, .. } => {
                assert_eq!(category.as_deref(), Some("movie"));
                assert_eq!(query.as_deref(), Some("电影"));
                assert_eq!(page, Some(2));
                assert!(!json);
            }
            _ => panic!("expected list"),
        }
    }
}
