use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Result, bail};
use dirs;

/// AWS configuration directory name
pub const AWS_CONFIG_DIR_NAME: &str = ".aws";

/// AWS configuration file name
pub const AWS_CONFIG_FILE_NAME: &str = "config";

/// Prefix of the per-profile cache file name
pub const CACHE_FILE_PREFIX: &str = "aws-switchrole-";

/// Default AWS region for STS operations when no region is configured
pub const DEFAULT_AWS_REGION: &str = "us-east-1";

/// Default safety margin, in seconds, before a cached session counts as expired
pub const DEFAULT_EXPIRY_WINDOW_SECS: u64 = 60;

/// Get the default cache directory
/// Returns: ~/.aws/cli/cache (shared with the AWS CLI's own cache)
pub fn default_cache_dir() -> Option<PathBuf> {
    let home_dir = dirs::home_dir().or_else(|| {
        // Fallback to environment variables if dirs crate fails
        env::var("HOME")
            .or_else(|_| env::var("USERPROFILE"))
            .ok()
            .map(PathBuf::from)
    })?;

    Some(home_dir.join(AWS_CONFIG_DIR_NAME).join("cli").join("cache"))
}

/// Get the AWS config file path
/// Respects AWS_CONFIG_FILE environment variable if set
pub fn get_aws_config_path() -> Option<PathBuf> {
    if let Ok(path) = env::var("AWS_CONFIG_FILE") {
        return Some(PathBuf::from(path));
    }

    dirs::home_dir().map(|home| home.join(AWS_CONFIG_DIR_NAME).join(AWS_CONFIG_FILE_NAME))
}

/// Build the cache file path for a profile inside `cache_dir`
pub fn cache_file_path(cache_dir: &Path, profile: &str) -> Result<PathBuf> {
    if profile.is_empty() {
        bail!("Profile name must not be empty");
    }
    if profile.contains(['/', '\\']) || profile == "." || profile == ".." {
        bail!("Profile name '{profile}' cannot be used as a cache file name");
    }

    Ok(cache_dir.join(format!("{CACHE_FILE_PREFIX}{profile}")))
}
