mod config;

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use paper_storage_core::KeyValueStore;
use paper_storage_local::FileKvStore;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Command, Config, ConfigCommand, DraftCommand};
use paper_docx::classify::{parse_content_with_numbering, remove_numbering_prefix, NumberingLevel};
use paper_docx::format::{export_config_text, import_config_text};
use paper_docx::sanitize::{check_for_export, sanitize_paper};
use paper_docx::{export_async, ConfigManager, DraftStore, PaperContent};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::parse();
    let store_dir = config.store_dir();
    let store: Arc<dyn KeyValueStore> = Arc::new(FileKvStore::new(&store_dir));
    let configs = ConfigManager::new(store.clone());
    let drafts = DraftStore::new(store);

    info!("Using store at {}", store_dir.display());

    match config.command {
        Command::Export {
            input,
            format,
            output_dir,
        } => {
            let paper = sanitize_paper(&load_paper(input.as_deref(), &drafts).await?);
            let check = check_for_export(&paper);
            for warning in &check.warnings {
                warn!("{}", warning);
            }
            if !check.can_export() {
                bail!("Cannot export:\n  {}", check.errors.join("\n  "));
            }

            let format = match format {
                Some(path) => import_config_text(&read_text(&path).await?)
                    .with_context(|| format!("Invalid format configuration {}", path.display()))?,
                None => configs.load().await?,
            };

            let exported = export_async(paper, format)
                .await
                .context("Export failed. Reset the format configuration if the problem persists")?;
            let path = output_dir.join(&exported.file_name);
            tokio::fs::create_dir_all(&output_dir)
                .await
                .with_context(|| format!("Failed to create {}", output_dir.display()))?;
            tokio::fs::write(&path, &exported.bytes)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("{}", path.display());
        }

        Command::Validate { input } => {
            let paper = sanitize_paper(&load_paper(input.as_deref(), &drafts).await?);
            let check = check_for_export(&paper);
            for error in &check.errors {
                println!("error: {}", error);
            }
            for warning in &check.warnings {
                println!("warning: {}", warning);
            }
            if !check.can_export() {
                bail!("{} validation error(s)", check.errors.len());
            }
            println!("ok");
        }

        Command::Outline { input } => {
            let paper = load_paper(input.as_deref(), &drafts).await?;
            let format = configs.load().await?;
            for line in parse_content_with_numbering(&paper.body, format.numbering_indents.as_ref()) {
                if line.level == NumberingLevel::None {
                    continue;
                }
                let depth = usize::from(line.level.depth());
                println!("{}{}", "  ".repeat(depth - 1), remove_numbering_prefix(&line.text));
            }
        }

        Command::Config(command) => run_config(command, &configs).await?,
        Command::Draft(command) => run_draft(command, &drafts).await?,
    }

    Ok(())
}

async fn run_config(command: ConfigCommand, configs: &ConfigManager) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Show => {
            println!("{}", export_config_text(&configs.load().await?)?);
        }
        ConfigCommand::Export { output } => {
            let text = configs.export_text().await?;
            match output {
                Some(path) => {
                    tokio::fs::write(&path, text)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                    info!("Configuration exported to {}", path.display());
                }
                None => println!("{}", text),
            }
        }
        ConfigCommand::Import { path } => {
            let text = read_text(&path).await?;
            configs
                .import_text(&text)
                .await
                .with_context(|| format!("Failed to import {}", path.display()))?;
            println!("Configuration imported");
        }
        ConfigCommand::Reset => {
            configs.reset().await?;
            println!("Configuration reset to defaults");
        }
    }
    Ok(())
}

async fn run_draft(command: DraftCommand, drafts: &DraftStore) -> anyhow::Result<()> {
    match command {
        DraftCommand::Save { path } => {
            let paper = read_paper(&path).await?;
            let saved_at = drafts.save(&paper).await?;
            println!("Draft saved at {}", saved_at.to_rfc3339());
        }
        DraftCommand::Show => match drafts.load().await? {
            Some(snapshot) => {
                println!("{}", serde_json::to_string_pretty(&snapshot)?);
            }
            None => println!("No saved draft"),
        },
        DraftCommand::Clear => {
            if drafts.clear().await? {
                println!("Draft cleared");
            } else {
                println!("No saved draft");
            }
        }
        DraftCommand::AddInfo { label, value } => {
            let mut paper = saved_draft(drafts).await?;
            let id = paper.add_personal_info_item();
            paper.update_personal_info_item(&id, Some(&label), Some(&value));
            drafts.save(&paper).await?;
            println!("{}", id);
        }
        DraftCommand::AddFootnote { content } => {
            let mut paper = saved_draft(drafts).await?;
            let id = paper
                .add_footnote()
                .context("No footnote id left; delete the highest-numbered footnote first")?;
            paper.update_footnote(id, &content);
            drafts.save(&paper).await?;
            println!("{}", id);
        }
        DraftCommand::DeleteFootnote { id } => {
            let mut paper = saved_draft(drafts).await?;
            if !paper.delete_footnote(id) {
                bail!("Footnote {} not found", id);
            }
            drafts.save(&paper).await?;
        }
    }
    Ok(())
}

/// The saved draft, or an empty paper if there is none.
async fn saved_draft(drafts: &DraftStore) -> anyhow::Result<PaperContent> {
    Ok(drafts.load().await?.map(|s| s.value).unwrap_or_default())
}

async fn load_paper(input: Option<&Path>, drafts: &DraftStore) -> anyhow::Result<PaperContent> {
    match input {
        Some(path) => read_paper(path).await,
        None => match drafts.load().await? {
            Some(snapshot) => Ok(snapshot.value),
            None => bail!("No input given and no saved draft"),
        },
    }
}

async fn read_paper(path: &Path) -> anyhow::Result<PaperContent> {
    let text = read_text(path).await?;
    serde_json::from_str(&text).with_context(|| format!("Invalid paper JSON in {}", path.display()))
}

async fn read_text(path: &Path) -> anyhow::Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}
