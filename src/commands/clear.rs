use anyhow::{Context, Result};
use clap::Args;

use crate::{cache::CredentialCache, config::Settings, constants};

#[derive(Debug, Clone, Args)]
pub struct ClearCommand {}

impl ClearCommand {
    pub async fn execute(self, profile: &str, settings: &Settings) -> Result<()> {
        let path = constants::cache_file_path(&settings.cache_dir, profile)?;
        let cache = CredentialCache::new(path, settings.expiry_window);

        let removed = cache
            .clear()
            .await
            .with_context(|| format!("Failed to clear cached session for profile '{profile}'"))?;

        if removed {
            eprintln!("Removed cached session for {profile} profile.");
        } else {
            eprintln!("No cached session for {profile} profile.");
        }
        Ok(())
    }
}
