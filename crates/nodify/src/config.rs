//! Command-line configuration.

use anyhow::{anyhow, Result};
use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

/// Nodify - a node graph task editor
#[derive(Parser, Debug, Clone)]
#[command(name = "nodify")]
#[command(about = "Edit a graph of tasks and their dependencies")]
pub struct Args {
    /// Graph document to open (default: ~/.nodify/graph.json)
    #[arg(short, long)]
    pub store: Option<PathBuf>,

    /// User id used for new node ids and the saved viewport
    #[arg(short, long, default_value = "local")]
    pub user: String,

    /// Maximum level written to the log
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,

    /// Draw archived nodes
    #[arg(long)]
    pub show_archive: bool,

    /// Write a small demo graph when the store is empty
    #[arg(long)]
    pub seed: bool,
}

impl Args {
    pub fn store_path(&self) -> Result<PathBuf> {
        match &self.store {
            Some(path) => Ok(path.clone()),
            None => Ok(nodify_dir()?.join("graph.json")),
        }
    }
}

/// `~/.nodify`, where the default store and logs live.
pub fn nodify_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
    Ok(home.join(".nodify"))
}
