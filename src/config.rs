use crate::constants::{self, DEFAULT_EXPIRY_WINDOW_SECS};
use anyhow::{Context, Result};
use ini::{Ini, Properties};
use std::{path::PathBuf, time::Duration};
use tracing::debug;

/// Tool settings resolved once per invocation
#[derive(Debug, Clone)]
pub struct Settings {
    pub cache_dir: PathBuf,
    pub expiry_window: Duration,
}

impl Settings {
    /// Resolve settings, falling back to the per-user cache directory
    pub fn resolve(cache_dir: Option<PathBuf>, expiry_window_secs: Option<u64>) -> Result<Self> {
        let cache_dir = match cache_dir {
            Some(dir) => dir,
            None => constants::default_cache_dir()
                .context("Failed to determine home directory for the credential cache")?,
        };

        Ok(Self {
            cache_dir,
            expiry_window: Duration::from_secs(
                expiry_window_secs.unwrap_or(DEFAULT_EXPIRY_WINDOW_SECS),
            ),
        })
    }
}

/// The parts of an AWS CLI profile that decide how a session is obtained
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileConfig {
    pub role_arn: Option<String>,
    pub source_profile: Option<String>,
    pub mfa_serial: Option<String>,
    pub duration_seconds: Option<i32>,
    pub external_id: Option<String>,
    pub role_session_name: Option<String>,
    pub region: Option<String>,
}

impl ProfileConfig {
    fn from_ini_section(section: &Properties) -> Self {
        let value = |key: &str| {
            section
                .get(key)
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        Self {
            role_arn: value("role_arn"),
            source_profile: value("source_profile"),
            mfa_serial: value("mfa_serial"),
            duration_seconds: section
                .get("duration_seconds")
                .and_then(|s| s.trim().parse().ok()),
            external_id: value("external_id"),
            role_session_name: value("role_session_name"),
            region: value("region"),
        }
    }

    pub fn from_ini(ini: &Ini, profile: &str) -> Option<Self> {
        ini.section(Some(section_name(profile)))
            .map(Self::from_ini_section)
    }
}

/// Load a profile from the AWS config file
///
/// A missing file or section yields the empty profile, which resolves through
/// the default credential chain.
pub async fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let path = constants::get_aws_config_path().context("Failed to determine AWS config path")?;

    if !path.exists() {
        debug!("AWS config file {} not found", path.display());
        return Ok(ProfileConfig::default());
    }

    let ini = Ini::load_from_file(&path)
        .with_context(|| format!("Failed to load AWS config file: {}", path.display()))?;

    Ok(ProfileConfig::from_ini(&ini, profile).unwrap_or_else(|| {
        debug!("Profile '{}' not found in {}", profile, path.display());
        ProfileConfig::default()
    }))
}

fn section_name(profile: &str) -> String {
    if profile == "default" {
        profile.to_string()
    } else {
        format!("profile {profile}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::{env, fs};
    use tempfile::TempDir;

    const SAMPLE_CONFIG: &str = "\
[default]
region = eu-west-1

[profile teamA]
role_arn = arn:aws:iam::123456789012:role/Admin
source_profile = default
mfa_serial = arn:aws:iam::111111111111:mfa/alice
duration_seconds = 7200
external_id = xyz
region = ap-northeast-1

[profile mfa-only]
mfa_serial = arn:aws:iam::111111111111:mfa/alice
duration_seconds = not-a-number
";

    #[test]
    fn test_section_name() {
        assert_eq!(section_name("default"), "default");
        assert_eq!(section_name("teamA"), "profile teamA");
    }

    #[test]
    fn test_profile_from_ini() {
        let ini = Ini::load_from_str(SAMPLE_CONFIG).unwrap();
        let config = ProfileConfig::from_ini(&ini, "teamA").unwrap();

        assert_eq!(
            config.role_arn.as_deref(),
            Some("arn:aws:iam::123456789012:role/Admin")
        );
        assert_eq!(config.source_profile.as_deref(), Some("default"));
        assert_eq!(
            config.mfa_serial.as_deref(),
            Some("arn:aws:iam::111111111111:mfa/alice")
        );
        assert_eq!(config.duration_seconds, Some(7200));
        assert_eq!(config.external_id.as_deref(), Some("xyz"));
        assert_eq!(config.role_session_name, None);
        assert_eq!(config.region.as_deref(), Some("ap-northeast-1"));
    }

    #[test]
    fn test_profile_from_ini_ignores_bad_duration() {
        let ini = Ini::load_from_str(SAMPLE_CONFIG).unwrap();
        let config = ProfileConfig::from_ini(&ini, "mfa-only").unwrap();

        assert_eq!(config.role_arn, None);
        assert!(config.mfa_serial.is_some());
        assert_eq!(config.duration_seconds, None);
    }

    #[test]
    fn test_default_profile_uses_bare_section() {
        let ini = Ini::load_from_str(SAMPLE_CONFIG).unwrap();
        let config = ProfileConfig::from_ini(&ini, "default").unwrap();

        assert_eq!(config.region.as_deref(), Some("eu-west-1"));
        assert_eq!(config.role_arn, None);
    }

    #[test]
    fn test_unknown_profile() {
        let ini = Ini::load_from_str(SAMPLE_CONFIG).unwrap();
        assert!(ProfileConfig::from_ini(&ini, "missing").is_none());
    }

    #[test]
    fn test_settings_with_explicit_values() {
        let settings = Settings::resolve(Some(PathBuf::from("/tmp/c")), Some(5)).unwrap();
        assert_eq!(settings.cache_dir, PathBuf::from("/tmp/c"));
        assert_eq!(settings.expiry_window, Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_settings_defaults() {
        if let Ok(settings) = Settings::resolve(None, None) {
            assert!(settings.cache_dir.ends_with("cache"));
            assert_eq!(
                settings.expiry_window,
                Duration::from_secs(DEFAULT_EXPIRY_WINDOW_SECS)
            );
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_load_profile_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config");
        fs::write(&path, SAMPLE_CONFIG).unwrap();

        let original = env::var("AWS_CONFIG_FILE").ok();
        unsafe {
            env::set_var("AWS_CONFIG_FILE", &path);
        }

        let found = load_profile("teamA").await.unwrap();
        let missing = load_profile("nobody").await.unwrap();

        unsafe {
            match original {
                Some(val) => env::set_var("AWS_CONFIG_FILE", val),
                None => env::remove_var("AWS_CONFIG_FILE"),
            }
        }

        assert_eq!(found.duration_seconds, Some(7200));
        assert_eq!(missing, ProfileConfig::default());
    }

    #[tokio::test]
    #[serial]
    async fn test_load_profile_without_config_file() {
        let dir = TempDir::new().unwrap();

        let original = env::var("AWS_CONFIG_FILE").ok();
        unsafe {
            env::set_var("AWS_CONFIG_FILE", dir.path().join("absent"));
        }

        let config = load_profile("teamA").await.unwrap();

        unsafe {
            match original {
                Some(val) => env::set_var("AWS_CONFIG_FILE", val),
                None => env::remove_var("AWS_CONFIG_FILE"),
            }
        }

        assert_eq!(config, ProfileConfig::default());
    }
}
