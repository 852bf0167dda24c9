//! AWS SDK integration: identity-service seam, IAM client binding, ARN helpers.

pub mod arn;
#[cfg(test)]
pub(crate) mod fake;
pub(crate) mod iam_client;
pub mod identity;

use thiserror::Error;

/// Failure conditions reported by the identity service.
///
/// `NotFound`, `Conflict` and `AlreadyExists` are the conditions the
/// orchestrator reacts to; everything else (transport, authorization,
/// throttling) ends up in `IamError` and is propagated unchanged.
#[derive(Error, Debug)]
pub enum AwsError {
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Delete conflict: {0}")]
    Conflict(String),
    #[error("Entity already exists: {0}")]
    AlreadyExists(String),
    #[error("IAM client error: {0}")]
    IamError(String),
    #[error("Policy document error: {0}")]
    PolicyError(String),
}

impl AwsError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

pub type AwsResult<T> = Result<T, AwsError>;
