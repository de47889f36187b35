use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use media_archive::{browse, cli, config, error, loader, render};
use media_archive_common::{ArchiveViewModel, LoadStatus};
use cli::{Cli, Commands, ScriptTarget};
use config::Config;
use error::{ArchiveError, Result};
use render::RenderOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::List { input, category, query, page, page_size, expand_all, json } => {
            let data_file = input.unwrap_or_else(|| config.data_file());
            let mut view_model = open_archive(&config, &data_file).await?;

            if let Some(key) = category {
                view_model.set_category(&key)?;
            }
            if let Some(query) = query {
                view_model.set_query(&query);
            }
            if let Some(size) = page_size {
                view_model.set_page_size(size)?;
            }
            if let Some(page) = page {
                view_model.goto_page(page)?;
            }

            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            if json {
                serde_json::to_writer_pretty(&mut out, view_model.snapshot())?;
                writeln!(out)?;
            } else {
                render::render_snapshot(&mut out, view_model.snapshot(), RenderOptions { expand_all })?;
            }
        }

        Commands::Tabs { input } => {
            let data_file = input.unwrap_or_else(|| config.data_file());
            let view_model = open_archive(&config, &data_file).await?;
            let stdout = std::io::stdout();
            render::render_tab_list(&mut stdout.lock(), view_model.available_categories())?;
        }

        Commands::Browse { input } => {
            let data_file = input.unwrap_or_else(|| config.data_file());
            println!("📚 media-archive - 更新履歴\n");
            browse::run_browser(&config, &data_file).await?;
        }

        Commands::Convert { text, to } => {
            let normalizer = config.normalizer()?;
            let converted = match to {
                ScriptTarget::Traditional => normalizer.to_traditional(&text),
                ScriptTarget::Simplified => normalizer.to_simplified(&text),
            };
            println!("{}", converted);
        }

        Commands::Config { show, set_page_size, set_default_category, set_data_file, set_dictionary } => {
            let mut config = config;
            let mut changed = false;

            if let Some(size) = set_page_size {
                config.set_page_size(size)?;
                println!("✔ 1ページの件数を設定しました: {}", size);
                changed = true;
            }
            if let Some(key) = set_default_category {
                config.set_default_category(&key)?;
                println!("✔ 既定の分類を設定しました: {}", config.default_category);
                changed = true;
            }
            if let Some(path) = set_data_file {
                println!("✔ 履歴ファイルを設定しました: {}", path.display());
                config.data_file = path;
                changed = true;
            }
            if let Some(path) = set_dictionary {
                config.dictionary = Some(path);
                // 読めない対応表は保存しない
                config.normalizer()?;
                println!("✔ 追加の対応表を設定しました");
                changed = true;
            }
            if changed {
                config.save()?;
            }

            if show || !changed {
                print_config(&config)?;
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// スピナーを出しながら履歴を読み込む（失敗はエラーとして返す）
async fn open_archive(config: &Config, data_file: &Path) -> Result<ArchiveViewModel> {
    let mut view_model = ArchiveViewModel::new(config.normalizer()?, config.view_options()?);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("読み込み中: {}", data_file.display()));
    spinner.enable_steady_tick(Duration::from_millis(80));
    loader::load_into(&mut view_model, data_file).await;
    spinner.finish_and_clear();

    if let LoadStatus::Failed(message) = view_model.status() {
        return Err(ArchiveError::Load(message.clone()));
    }
    Ok(view_model)
}

fn print_config(config: &Config) -> Result<()> {
    let path: PathBuf = Config::config_path()?;
    println!("設定: {}", path.display());
    println!("  履歴ファイル: {}", config.data_file().display());
    println!("  1ページの件数: {}", config.page_size);
    println!("  既定の分類: {}", config.default_category);
    match &config.dictionary {
        Some(dictionary) => println!("  追加の対応表: {}", dictionary.display()),
        None => println!("  追加の対応表: なし"),
    }
    Ok(())
}
