use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{debug, info};

use crate::{
    cache::{CredentialSet, SessionProvider},
    config::{self, ProfileConfig},
};

pub mod chain;
pub mod mfa;
pub mod sts;

/// How a session is obtained for a profile
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPlan {
    /// sts:AssumeRole with credentials from `source_profile`
    AssumeRole {
        source_profile: String,
        role_arn: String,
        session_name: String,
        mfa_serial: Option<String>,
    },
    /// sts:GetSessionToken with an MFA code on the profile's own keys
    SessionToken { mfa_serial: String },
    /// Whatever the SDK's default chain yields for the profile
    DefaultChain,
}

impl SessionPlan {
    pub fn for_profile(profile: &str, config: &ProfileConfig) -> Result<Self> {
        match (&config.role_arn, &config.mfa_serial) {
            (Some(role_arn), mfa_serial) => {
                let source_profile = config.source_profile.clone().with_context(|| {
                    format!("Profile '{profile}' sets role_arn without source_profile")
                })?;
                let session_name = config
                    .role_session_name
                    .clone()
                    .unwrap_or_else(|| format!("aws-switchrole-{}", Utc::now().timestamp()));

                Ok(Self::AssumeRole {
                    source_profile,
                    role_arn: role_arn.clone(),
                    session_name,
                    mfa_serial: mfa_serial.clone(),
                })
            }
            (None, Some(mfa_serial)) => Ok(Self::SessionToken {
                mfa_serial: mfa_serial.clone(),
            }),
            (None, None) => Ok(Self::DefaultChain),
        }
    }
}

/// Issues sessions according to the profile's entry in the AWS config file
#[derive(Debug, Clone, Default)]
pub struct AwsSessionProvider;

impl SessionProvider for AwsSessionProvider {
    async fn new_session(&self, profile: &str) -> Result<CredentialSet> {
        let config = config::load_profile(profile).await?;
        let plan = SessionPlan::for_profile(profile, &config)?;
        debug!("Session plan for {}: {:?}", profile, plan);

        match plan {
            SessionPlan::AssumeRole {
                source_profile,
                role_arn,
                session_name,
                mfa_serial,
            } => {
                let mfa = match mfa_serial {
                    Some(serial) => {
                        let code = mfa::prompt_token_code(&serial)?;
                        Some(sts::Mfa { serial, code })
                    }
                    None => None,
                };
                let client = sts::client(&source_profile, config.region.as_deref()).await;
                info!("Assuming role {} via profile {}", role_arn, source_profile);
                sts::assume_role(&client, &role_arn, &session_name, &config, mfa).await
            }
            SessionPlan::SessionToken { mfa_serial } => {
                let code = mfa::prompt_token_code(&mfa_serial)?;
                let client = sts::client(profile, config.region.as_deref()).await;
                sts::get_session_token(
                    &client,
                    config.duration_seconds,
                    sts::Mfa {
                        serial: mfa_serial,
                        code,
                    },
                )
                .await
            }
            SessionPlan::DefaultChain => chain::load_credentials(profile).await,
        }
    }
}
