pub mod add;
pub mod commit;
pub mod config;
pub mod log;

use anyhow::{Context, Result};
use std::path::PathBuf;
use svcs_core::StoreConfig;

pub fn get_store_config(store: Option<PathBuf>, workdir: Option<PathBuf>) -> Result<StoreConfig> {
    let work_dir = match workdir {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read current directory")?,
    };

    Ok(match store {
        Some(store_root) => StoreConfig::new(store_root, work_dir),
        None => StoreConfig::for_work_dir(work_dir),
    })
}
