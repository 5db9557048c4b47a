use anyhow::Result;
use clap::Args;
use tracing::{info, warn};

use crate::{
    aws::AwsSessionProvider,
    cache::{CacheWrite, CredentialCache, Origin},
    config::Settings,
    constants,
    output::{self, OutputFormat},
};

#[derive(Debug, Clone, Default, Args)]
pub struct EnvCommand {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value_t = OutputFormat::Sh,
        help = "How to print the credentials"
    )]
    pub format: OutputFormat,
}

impl EnvCommand {
    pub async fn execute(self, profile: &str, settings: &Settings) -> Result<()> {
        let path = constants::cache_file_path(&settings.cache_dir, profile)?;
        let cache = CredentialCache::new(path, settings.expiry_window);

        let resolution = cache.resolve(&AwsSessionProvider, profile).await?;
        if resolution.origin == Origin::Refreshed {
            info!("Obtained new session for profile: {}", profile);
        }
        if let Some(message) = cache_warning(&resolution.cache_write) {
            warn!("{}", message);
        }

        print!("{}", output::render(&resolution.credentials, self.format));
        Ok(())
    }
}

/// Warning for a refresh whose cache write failed. The credentials are still printed.
fn cache_warning(write: &CacheWrite) -> Option<String> {
    match write {
        CacheWrite::Failed(e) => Some(format!("Credentials will not be reused next time: {e}")),
        CacheWrite::Unchanged | CacheWrite::Written | CacheWrite::Skipped => None,
    }
}
