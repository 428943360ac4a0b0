use anyhow::{Context, Result};
use colored::Colorize;
use svcs_core::{Storage, StoreConfig};

pub fn run(limit: Option<usize>, json: bool, config: StoreConfig) -> Result<()> {
    let storage = Storage::new(config)?;
    let entries = storage.history().context("Failed to read commit log")?;
    let to_show = limit.unwrap_or(entries.len()).min(entries.len());

    if json {
        let shown = &entries[..to_show];
        println!("{}", serde_json::to_string_pretty(shown)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("{}", "No commits yet.".yellow());
        return Ok(());
    }

    for entry in entries.iter().take(to_show) {
        println!(
            "{} {}",
            "commit".yellow().bold(),
            entry.commit_id.to_string().yellow()
        );
        println!("{}: {}", "Author".bold(), entry.author);
        println!("{}", entry.message);
        println!();
    }

    if entries.len() > to_show {
        println!(
            "{}",
            format!("... and {} more commits", entries.len() - to_show).dimmed()
        );
        println!("Use {} to see more", "--limit N".cyan());
    }

    Ok(())
}
