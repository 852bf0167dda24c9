//! This crate provides the core business logic for iamc:
//! - User lifecycle (list, add with console password, best-effort delete)
//! - Group-based per-service access grants (grant, revoke)
//! - The identity-service seam and its AWS IAM binding
//! - Account number extraction and console sign-in links
//!

mod aws;
pub mod commands;
mod config;
mod error;
mod grants;
mod synthesis;
mod types;

// Re-exports for a small, focused public API
pub use aws::arn::{account_number, sign_in_url, DEFAULT_SIGN_IN_DOMAIN};
pub use aws::iam_client::AwsIamClient;
pub use aws::identity::IdentityService;
pub use aws::{AwsError, AwsResult};
pub use commands::AccessControlService;
pub use config::{IamcConfig, StaticCredentials};
pub use error::{IamcError, IamcResult};
pub use grants::{Service, ServiceGrant};
pub use synthesis::build_service_policy;
pub use types::{
    DeleteUserReport, Group, PhaseOutcome, PolicyDocument, Statement, User, UserDeletion,
};
