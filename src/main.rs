//! Mdpad - markdown editor persistence core
//!
//! Keeps the autosaved buffer and the recent-file list, and reads and writes
//! markdown documents on behalf of a front end.

mod app;
mod cli;
mod core;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing_subscriber::{filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use app::EditorSession;
use cli::{Args, AutosaveAction, Command};
use crate::core::{config::AppConfig, paths::StoragePaths};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let level = if args.verbose { LevelFilter::DEBUG } else { LevelFilter::INFO };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(level)
        .init();

    // Load config or use defaults
    let config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Using default config: {:#}", e);
        AppConfig::default()
    });

    let paths = StoragePaths::new(config.data_dir());
    if let Some(dir) = &args.data_dir {
        paths.set_data_dir(dir);
    }
    paths.ensure_data_dir().await?;

    let mut session = EditorSession::new(paths.clone(), config.autosave_delay());
    session.start().await;

    let result = run(&mut session, &config, &paths, args.command).await;
    session.shutdown().await;
    if let Err(e) = &result {
        tracing::error!("{:#}", e);
    }
    result
}

async fn run(
    session: &mut EditorSession,
    config: &AppConfig,
    paths: &StoragePaths,
    command: Command,
) -> Result<()> {
    match command {
        Command::Open { path } => {
            session.open(&path).await?;
            write_stdout(&session.document.content).await?;
        }
        Command::Save { path } => {
            session.edit(read_stdin().await?);
            session.save_as(|| Some(path)).await?;
        }
        Command::OpenRecent { index } => {
            let entry = recent_entry(&session.recent_files, index)?.to_string();
            session.open_recent(&entry).await?;
            write_stdout(&session.document.content).await?;
        }
        Command::Recent => {
            let listing: String = session
                .recent_files
                .iter()
                .map(|entry| format!("{}\n", entry))
                .collect();
            write_stdout(&listing).await?;
        }
        Command::Autosave { action: AutosaveAction::Show } => {
            write_stdout(&session.document.content).await?;
        }
        Command::Autosave { action: AutosaveAction::Write } => {
            // Written when the session shuts down
            session.edit(read_stdin().await?);
        }
        Command::Config { write } => {
            let effective = AppConfig {
                data_dir: Some(paths.data_dir()),
                ..config.clone()
            };
            if write {
                effective.save()?;
            }
            write_stdout(&format!("{}\n", serde_json::to_string_pretty(&effective)?)).await?;
        }
    }
    Ok(())
}

/// Look up a 1-based position in the recent list
fn recent_entry(recent_files: &[String], index: usize) -> Result<&str> {
    index
        .checked_sub(1)
        .and_then(|i| recent_files.get(i))
        .map(String::as_str)
        .with_context(|| format!("No recent file at position {} ({} listed)", index, recent_files.len()))
}

async fn read_stdin() -> Result<String> {
    let mut content = String::new();
    tokio::io::stdin()
        .read_to_string(&mut content)
        .await
        .context("Failed to read stdin")?;
    Ok(content)
}

async fn write_stdout(content: &str) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(content.as_bytes()).await?;
    stdout.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_entry_counts_from_one() {
        let recent = vec!["/b.md".to_string(), "/a.md".to_string()];

        assert_eq!(recent_entry(&recent, 1).unwrap(), "/b.md");
        assert_eq!(recent_entry(&recent, 2).unwrap(), "/a.md");
        assert!(recent_entry(&recent, 0).is_err());
        assert!(recent_entry(&recent, 3).is_err());
    }
}
