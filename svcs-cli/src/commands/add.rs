use anyhow::Result;
use colored::Colorize;
use svcs_core::{Storage, StoreConfig};

pub fn run(file: Option<String>, config: StoreConfig) -> Result<()> {
    let storage = Storage::new(config)?;

    let Some(file) = file else {
        let tracked = storage.tracked_files()?;
        if tracked.is_empty() {
            println!("Add a file to the index.");
        } else {
            println!("{}", "Tracked files:".bold());
            for name in tracked {
                println!("{}", name);
            }
        }
        return Ok(());
    };

    if storage.add(&file)? {
        println!("The file '{}' is tracked.", file.green());
    } else {
        println!("The file '{}' is already tracked.", file.yellow());
    }

    Ok(())
}
