use anyhow::Result;
use colored::Colorize;
use svcs_core::{Storage, StoreConfig};

pub fn run(name: Option<String>, config: StoreConfig) -> Result<()> {
    let storage = Storage::new(config)?;

    if let Some(name) = name {
        storage.set_username(&name)?;
    }

    match storage.username()? {
        Some(name) => println!("The username is {}.", name.cyan()),
        None => println!("Please, tell me who you are."),
    }

    Ok(())
}
