use crate::error::{ArchiveError, Result};
use media_archive_common::{
    Category, ScriptDictionary, ScriptNormalizer, ViewOptions, DEFAULT_PAGE_SIZE,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// 履歴ファイルの場所を上書きする環境変数
pub const DATA_FILE_ENV: &str = "MEDIA_ARCHIVE_DATA";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 履歴JSON（media_updates.json）
    pub data_file: PathBuf,
    pub page_size: usize,
    pub default_category: String,
    /// 追加の繁簡対応表（JSON）
    pub dictionary: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("media_updates.json"),
            page_size: DEFAULT_PAGE_SIZE,
            default_category: Category::TvShow.key().into(),
            dictionary: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ArchiveError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("media-archive").join("config.json"))
    }

    /// 履歴ファイル（環境変数を優先）
    pub fn data_file(&self) -> PathBuf {
        match std::env::var_os(DATA_FILE_ENV) {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => self.data_file.clone(),
        }
    }

    pub fn view_options(&self) -> Result<ViewOptions> {
        if self.page_size == 0 {
            return Err(ArchiveError::Config("page_size は1以上にしてください".into()));
        }
        let default_category = Category::parse_key(&self.default_category).ok_or_else(|| {
            ArchiveError::Config(format!("不明な分類: {}", self.default_category))
        })?;
        Ok(ViewOptions {
            page_size: self.page_size,
            default_category,
        })
    }

    /// 組み込みの対応表に追加の対応表を重ねた変換器
    pub fn normalizer(&self) -> Result<ScriptNormalizer> {
        let mut dictionary = ScriptDictionary::builtin();
        if let Some(path) = &self.dictionary {
            let custom = ScriptDictionary::from_file(path)?;
            tracing::info!(path = %path.display(), entries = custom.len(), "custom script dictionary loaded");
            dictionary.merge(&custom);
        }
        let normalizer = ScriptNormalizer::new(&dictionary);
        for collision in normalizer.collisions() {
            tracing::warn!(
                traditional = %collision.traditional,
                simplified = ?collision.simplified,
                "several simplified characters share one traditional form"
            );
        }
        Ok(normalizer)
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<()> {
        if page_size == 0 {
            return Err(ArchiveError::Config("page_size は1以上にしてください".into()));
        }
        self.page_size = page_size;
        Ok(())
    }

    pub fn set_default_category(&mut self, key: &str) -> Result<()> {
        let category = Category::parse_key(key)
            .ok_or_else(|| ArchiveError::Config(format!("不明な分類: {}", key)))?;
        self.default_category = category.key().into();
        Ok(())
    }
}
