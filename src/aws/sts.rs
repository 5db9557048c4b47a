use anyhow::{Context, Result};
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sts::{Client as StsClient, types::Credentials as StsCredentials};
use aws_smithy_types::{DateTime, date_time::Format};
use tracing::{debug, info};

use super::chain;
use crate::{
    cache::{CredentialSet, Provenance},
    config::ProfileConfig,
    constants::DEFAULT_AWS_REGION,
};

/// MFA device and the code read for it
#[derive(Debug, Clone)]
pub struct Mfa {
    pub serial: String,
    pub code: String,
}

/// Build an STS client authenticated as `profile`
///
/// Credentials come from the profile's shared-file entry, never from the
/// environment. Region priority: the target profile's `region` -> whatever the
/// SDK resolves for `profile` -> DEFAULT_AWS_REGION
pub async fn client(profile: &str, region: Option<&str>) -> StsClient {
    let loader = || {
        aws_config::defaults(BehaviorVersion::latest())
            .profile_name(profile)
            .credentials_provider(chain::profile_credentials(profile))
    };

    let mut configured = loader();
    if let Some(region) = region {
        configured = configured.region(Region::new(region.to_string()));
    }
    let loaded = configured.load().await;

    let config = match loaded.region() {
        Some(region) => {
            info!("Using region: {}", region);
            loaded
        }
        None => {
            info!(
                "No region configured, using default {} for STS",
                DEFAULT_AWS_REGION
            );
            loader()
                .region(Region::new(DEFAULT_AWS_REGION))
                .load()
                .await
        }
    };

    StsClient::new(&config)
}

/// Assume a role, passing the MFA device and code when the profile requires them
pub async fn assume_role(
    client: &StsClient,
    role_arn: &str,
    session_name: &str,
    config: &ProfileConfig,
    mfa: Option<Mfa>,
) -> Result<CredentialSet> {
    info!("Calling AWS STS AssumeRole");
    debug!("Role ARN: {}", role_arn);
    debug!("Session name: {}", session_name);
    debug!("Duration: {:?} seconds", config.duration_seconds);

    let (serial, code) = mfa.map(|m| (m.serial, m.code)).unzip();

    let response = client
        .assume_role()
        .role_arn(role_arn)
        .role_session_name(session_name)
        .set_duration_seconds(config.duration_seconds)
        .set_external_id(config.external_id.clone())
        .set_serial_number(serial)
        .set_token_code(code)
        .send()
        .await
        .context("Failed to assume role")?;

    let sts_creds = response
        .credentials()
        .context("AWS STS returned no credentials")?;

    info!("Successfully obtained AWS credentials");
    Ok(issued_credentials(sts_creds, "AssumeRole"))
}

/// Exchange the profile's own keys for MFA-backed session credentials
pub async fn get_session_token(
    client: &StsClient,
    duration_seconds: Option<i32>,
    mfa: Mfa,
) -> Result<CredentialSet> {
    info!("Calling AWS STS GetSessionToken");
    debug!("MFA device: {}", mfa.serial);

    let response = client
        .get_session_token()
        .set_duration_seconds(duration_seconds)
        .serial_number(mfa.serial)
        .token_code(mfa.code)
        .send()
        .await
        .context("Failed to get session token")?;

    let sts_creds = response
        .credentials()
        .context("AWS STS returned no credentials")?;

    info!("Successfully obtained AWS credentials");
    Ok(issued_credentials(sts_creds, "GetSessionToken"))
}

fn issued_credentials(sts_creds: &StsCredentials, provider_name: &str) -> CredentialSet {
    let expiration = sts_creds.expiration();
    debug!(
        "Credentials expire at {}",
        expiration
            .fmt(Format::DateTime)
            .unwrap_or_else(|_| "unknown".to_string())
    );

    CredentialSet {
        access_key_id: sts_creds.access_key_id().to_string(),
        secret_access_key: sts_creds.secret_access_key().to_string(),
        session_token: sts_creds.session_token().to_string(),
        expiration: to_utc(expiration),
        provider_name: provider_name.to_string(),
        provenance: Provenance::Issued,
    }
}

fn to_utc(time: &DateTime) -> Option<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp(time.secs(), time.subsec_nanos())
}
