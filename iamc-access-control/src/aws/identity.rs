//! The identity-service seam the orchestrator is written against

use async_trait::async_trait;

use crate::aws::AwsResult;
use crate::types::{Group, User};

/// Remote identity API used by [`AccessControlService`](crate::AccessControlService).
///
/// Implementations are thin pass-throughs. They map the service's
/// not-found, delete-conflict and already-exists conditions onto
/// [`AwsError::NotFound`](crate::AwsError::NotFound),
/// [`AwsError::Conflict`](crate::AwsError::Conflict) and
/// [`AwsError::AlreadyExists`](crate::AwsError::AlreadyExists) and leave every
/// other failure as [`AwsError::IamError`](crate::AwsError::IamError).
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn list_users(&self) -> AwsResult<Vec<User>>;

    async fn create_user(&self, user_name: &str) -> AwsResult<User>;

    async fn delete_user(&self, user_name: &str) -> AwsResult<()>;

    async fn create_login_profile(&self, user_name: &str, password: &str) -> AwsResult<()>;

    async fn delete_login_profile(&self, user_name: &str) -> AwsResult<()>;

    /// Names of the inline policies attached directly to a user
    async fn list_user_policies(&self, user_name: &str) -> AwsResult<Vec<String>>;

    async fn delete_user_policy(&self, user_name: &str, policy_name: &str) -> AwsResult<()>;

    async fn list_groups_for_user(&self, user_name: &str) -> AwsResult<Vec<Group>>;

    async fn add_user_to_group(&self, group_name: &str, user_name: &str) -> AwsResult<()>;

    async fn remove_user_from_group(&self, group_name: &str, user_name: &str) -> AwsResult<()>;

    async fn get_group(&self, group_name: &str) -> AwsResult<Group>;

    async fn create_group(&self, group_name: &str) -> AwsResult<Group>;

    /// Create or overwrite an inline group policy
    async fn put_group_policy(
        &self,
        group_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> AwsResult<()>;
}
