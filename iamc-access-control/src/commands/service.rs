//! iamc service layer
//!
//! This module provides the access-control orchestrator. The service holds the
//! identity-service client and exposes the high-level operations (list, add,
//! delete, grant, revoke) that the CLI drives. Each operation is a fresh,
//! strictly ordered sequence of remote calls; no state is kept between calls.

use aws_sdk_iam::Client as IamClient;

use crate::aws::iam_client::AwsIamClient;
use crate::aws::identity::IdentityService;
use crate::config::IamcConfig;
use crate::error::IamcResult;

/// Orchestrates user lifecycle and group-based access grants
pub struct AccessControlService<C = AwsIamClient> {
    pub(crate) client: C,
}

impl<C: IdentityService> AccessControlService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

impl AccessControlService<AwsIamClient> {
    /// Create a service backed by the AWS IAM API
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub async fn from_config(config: &IamcConfig) -> IamcResult<Self> {
        config.validate()?;
        let sdk_config = config.load_sdk_config().await;
        Ok(Self::new(AwsIamClient::new(IamClient::new(&sdk_config))))
    }

    // user operations are in users.rs
    // grant/revoke are in access.rs
}
