use anyhow::Result;
use colored::Colorize;
use svcs_core::{CommitOutcome, Storage, StoreConfig};

pub fn run(message: Option<String>, config: StoreConfig) -> Result<()> {
    let storage = Storage::new(config)?;

    match storage.commit(message.as_deref().unwrap_or(""))? {
        CommitOutcome::NothingToCommit => {
            println!("{}", "Nothing to commit.".yellow());
        }
        CommitOutcome::Committed(summary) => {
            println!("{}", "Changes are committed.".green().bold());
            println!("  {}: {}", "Commit ID".bold(), summary.entry.commit_id);
            if !summary.entry.author.is_empty() {
                println!("  {}: {}", "Author".bold(), summary.entry.author);
            }
            println!("  {}: {}", "Files".bold(), summary.files.join(", "));
        }
    }

    Ok(())
}
