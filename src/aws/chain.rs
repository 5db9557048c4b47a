use anyhow::{Context, Result};
use aws_config::profile::ProfileFileCredentialsProvider;
use aws_credential_types::{Credentials, provider::ProvideCredentials};
use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::cache::{CredentialSet, Provenance};

const DEFAULT_CHAIN_PROVIDER: &str = "DefaultChain";

/// Credentials taken from the named profile only
///
/// The SDK's default chain checks AWS_ACCESS_KEY_ID and friends before any
/// profile, and those are exactly what a previous `eval` of this tool exports.
pub fn profile_credentials(profile: &str) -> ProfileFileCredentialsProvider {
    ProfileFileCredentialsProvider::builder()
        .profile_name(profile)
        .build()
}

/// Resolve a profile without role or MFA settings through its shared-file entry
///
/// SSO, credential_process and similar sources return expiring credentials and
/// count as issued. Static keys have no expiry and are ambient.
pub async fn load_credentials(profile: &str) -> Result<CredentialSet> {
    info!("Resolving credentials for profile {} via default chain", profile);

    let credentials = profile_credentials(profile)
        .provide_credentials()
        .await
        .with_context(|| format!("Failed to load credentials for profile '{profile}'"))?;

    Ok(from_sdk_credentials(&credentials))
}

fn from_sdk_credentials(credentials: &Credentials) -> CredentialSet {
    let expiration = credentials.expiry().map(DateTime::<Utc>::from);
    let provenance = classify(expiration.is_some());
    debug!("Default chain credentials are {:?}", provenance);

    CredentialSet {
        access_key_id: credentials.access_key_id().to_string(),
        secret_access_key: credentials.secret_access_key().to_string(),
        session_token: credentials.session_token().unwrap_or_default().to_string(),
        expiration,
        provider_name: DEFAULT_CHAIN_PROVIDER.to_string(),
        provenance,
    }
}

fn classify(expires: bool) -> Provenance {
    if expires {
        Provenance::Issued
    } else {
        Provenance::Ambient
    }
}
