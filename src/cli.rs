//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "mdpad")]
#[command(about = "Markdown editor state: documents, autosave and recent files", long_about = None)]
pub struct Args {
    /// Use this directory for autosave and recent files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a markdown file and record it as recently used
    Open {
        path: PathBuf,
    },
    /// Save stdin to a markdown file and record it as recently used
    Save {
        path: PathBuf,
    },
    /// Print an entry of the recent list, counting from 1 as listed by `recent`
    OpenRecent {
        index: usize,
    },
    /// List recently used files, newest first
    Recent,
    /// Inspect or replace the autosaved buffer
    Autosave {
        #[command(subcommand)]
        action: AutosaveAction,
    },
    /// Show the effective configuration
    Config {
        /// Also write it to the config file
        #[arg(long)]
        write: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AutosaveAction {
    /// Print the autosaved buffer
    Show,
    /// Replace the autosaved buffer with stdin
    Write,
}
