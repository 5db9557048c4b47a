//! On-disk cache of session credentials, one file per profile.
//!
//! [`CredentialCache::resolve`] runs the load → validate → refresh → persist
//! lifecycle; the provider behind the refresh step is any [`SessionProvider`].

mod error;
mod manager;
mod store;

use std::{fmt, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use error::CacheError;
pub use manager::{CacheWrite, CredentialCache, Origin, Resolution, SessionProvider};

/// Where a credential set came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Temporary credentials returned by STS or another session-issuing provider
    #[default]
    Issued,
    /// Long-lived keys picked up from the environment or shared files
    Ambient,
}

/// A credential triple plus the metadata needed to decide whether it is still usable
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialSet {
    #[serde(rename = "AccessKeyID")]
    pub access_key_id: String,
    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,
    #[serde(rename = "SessionToken", default)]
    pub session_token: String,
    #[serde(
        rename = "Expiration",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub expiration: Option<DateTime<Utc>>,
    #[serde(rename = "ProviderName", default)]
    pub provider_name: String,
    #[serde(rename = "Provenance", default)]
    pub provenance: Provenance,
}

impl CredentialSet {
    /// True when every secret a usable record needs is present
    pub fn is_complete(&self) -> bool {
        if self.access_key_id.is_empty() || self.secret_access_key.is_empty() {
            return false;
        }
        match self.provenance {
            Provenance::Issued => !self.session_token.is_empty(),
            Provenance::Ambient => true,
        }
    }

    /// A set without a recorded expiration is never considered fresh.
    pub fn is_expired(&self, now: DateTime<Utc>, window: Duration) -> bool {
        let Some(expiration) = self.expiration else {
            return true;
        };
        let Ok(window) = chrono::Duration::from_std(window) else {
            return true;
        };
        now.checked_add_signed(window)
            .is_none_or(|deadline| deadline >= expiration)
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field("session_token", &"** redacted **")
            .field("expiration", &self.expiration)
            .field("provider_name", &self.provider_name)
            .field("provenance", &self.provenance)
            .finish()
    }
}
