//! Explicit client configuration, built once by the caller

use std::fmt;

use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, SdkConfig};
use aws_credential_types::Credentials;
use aws_sdk_iam::config::Region;
use log::debug;

use crate::aws::arn::DEFAULT_SIGN_IN_DOMAIN;
use crate::error::{IamcError, IamcResult};

/// IAM is a global service; any commercial region resolves its endpoint.
const FALLBACK_REGION: &str = "us-east-1";

#[derive(Clone)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct IamcConfig {
    /// Static keys; when absent the default AWS credential chain is used
    pub credentials: Option<StaticCredentials>,
    pub profile: Option<String>,
    pub region: Option<String>,
    pub sign_in_domain: String,
}

impl Default for IamcConfig {
    fn default() -> Self {
        Self {
            credentials: None,
            profile: None,
            region: None,
            sign_in_domain: DEFAULT_SIGN_IN_DOMAIN.to_string(),
        }
    }
}

impl IamcConfig {
    pub fn validate(&self) -> IamcResult<()> {
        if let Some(creds) = &self.credentials {
            if creds.access_key_id.trim().is_empty() {
                return Err(IamcError::config("access key id must not be empty"));
            }
            if creds.secret_access_key.is_empty() {
                return Err(IamcError::config("secret access key must not be empty"));
            }
        }
        if self.sign_in_domain.trim().is_empty() {
            return Err(IamcError::config("sign-in domain must not be empty"));
        }
        Ok(())
    }

    /// Load the SDK configuration described by this value
    pub async fn load_sdk_config(&self) -> SdkConfig {
        let region = RegionProviderChain::first_try(self.region.clone().map(Region::new))
            .or_default_provider()
            .or_else(Region::from_static(FALLBACK_REGION));

        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
        if let Some(profile) = &self.profile {
            debug!("Using AWS profile '{profile}'");
            loader = loader.profile_name(profile);
        }
        if let Some(creds) = &self.credentials {
            debug!("Using static credentials for key '{}'", creds.access_key_id);
            loader = loader.credentials_provider(Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                None,
                None,
                "iamc",
            ));
        }
        loader.load().await
    }
}
