use std::{
    future::Future,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use chrono::Utc;
use tracing::{debug, info};

use super::{CacheError, CredentialSet, Provenance, store};

/// Issues fresh credentials for a profile, prompting the operator if the profile needs it
pub trait SessionProvider {
    fn new_session(&self, profile: &str) -> impl Future<Output = Result<CredentialSet>>;
}

/// Where the resolved credentials came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Cache,
    Refreshed,
}

/// Outcome of the best-effort cache write that follows a refresh
#[derive(Debug)]
pub enum CacheWrite {
    /// Served from the cache, nothing written
    Unchanged,
    Written,
    /// Ambient credentials are never cached
    Skipped,
    Failed(CacheError),
}

#[derive(Debug)]
pub struct Resolution {
    pub credentials: CredentialSet,
    pub origin: Origin,
    pub cache_write: CacheWrite,
}

/// Owns the cache file of one profile
#[derive(Debug, Clone)]
pub struct CredentialCache {
    path: PathBuf,
    expiry_window: Duration,
}

impl CredentialCache {
    pub fn new(path: PathBuf, expiry_window: Duration) -> Self {
        Self {
            path,
            expiry_window,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<CredentialSet, CacheError> {
        store::load(&self.path).await
    }

    pub async fn persist(&self, creds: &CredentialSet) -> Result<(), CacheError> {
        store::persist(&self.path, creds).await
    }

    pub async fn clear(&self) -> Result<bool, CacheError> {
        store::remove(&self.path).await
    }

    /// Return usable credentials for `profile`, from the cache when it holds a
    /// fresh issued set and from `provider` otherwise.
    ///
    /// Directory creation failures, provider failures and unusable provider
    /// output are errors. A failed cache write is reported through
    /// [`Resolution::cache_write`] for the caller to surface.
    pub async fn resolve<P: SessionProvider>(
        &self,
        provider: &P,
        profile: &str,
    ) -> Result<Resolution> {
        if let Some(dir) = self.path.parent() {
            store::ensure_dir(dir).await?;
        }

        match self.load().await {
            Ok(creds) if !creds.is_expired(Utc::now(), self.expiry_window) => {
                info!("Using cached credentials for profile: {}", profile);
                debug!("Cached credentials expire at {:?}", creds.expiration);
                return Ok(Resolution {
                    credentials: creds,
                    origin: Origin::Cache,
                    cache_write: CacheWrite::Unchanged,
                });
            }
            Ok(creds) => {
                info!(
                    "Cached credentials for profile {} expired at {:?}",
                    profile, creds.expiration
                );
            }
            Err(e @ CacheError::Degenerate { .. }) => info!("{}", e),
            Err(e) => debug!("Cache unavailable: {}", e),
        }

        info!("Requesting new session for profile: {}", profile);
        let credentials = provider
            .new_session(profile)
            .await
            .with_context(|| format!("Failed to obtain credentials for profile '{profile}'"))?;

        if !credentials.is_complete() {
            bail!(
                "Provider {} returned incomplete credentials for profile '{}'",
                credentials.provider_name,
                profile
            );
        }
        if credentials.provenance == Provenance::Issued
            && credentials.is_expired(Utc::now(), self.expiry_window)
        {
            bail!(
                "Provider {} returned a session for profile '{}' that expires at {:?}, \
                 inside the {}s expiry window; use a smaller --expiry-window",
                credentials.provider_name,
                profile,
                credentials.expiration,
                self.expiry_window.as_secs()
            );
        }

        let cache_write = if credentials.provenance == Provenance::Ambient {
            debug!(
                "Not caching ambient credentials from provider {}",
                credentials.provider_name
            );
            CacheWrite::Skipped
        } else {
            match self.persist(&credentials).await {
                Ok(()) => {
                    info!("Cached credentials at {}", self.path.display());
                    CacheWrite::Written
                }
                Err(e) => {
                    debug!("Cache write failed: {}", e);
                    CacheWrite::Failed(e)
                }
            }
        };

        Ok(Resolution {
            credentials,
            origin: Origin::Refreshed,
            cache_write,
        })
    }
}
