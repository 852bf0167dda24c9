//! User lifecycle: list, add, delete

use log::{debug, info, warn};

use crate::aws::identity::IdentityService;
use crate::aws::AwsError;
use crate::error::IamcResult;
use crate::types::{DeleteUserReport, PhaseOutcome, User, UserDeletion};

impl<C: IdentityService> super::service::AccessControlService<C> {
    /// All users known to the identity service, in the order it returns them
    pub async fn list_users(&self) -> IamcResult<Vec<User>> {
        Ok(self.client.list_users().await?)
    }

    /// Create a user and give it a console password.
    ///
    /// Not atomic: when the login profile cannot be created the user is left
    /// in place without a password and the error is returned.
    pub async fn add_user(&self, user_name: &str, password: &str) -> IamcResult<User> {
        let user = self.client.create_user(user_name).await?;
        debug!("Created user '{}' ({})", user.user_name, user.arn);

        if let Err(e) = self.client.create_login_profile(user_name, password).await {
            warn!("User '{user_name}' was created but has no console password: {e}");
            return Err(e.into());
        }
        info!("User '{user_name}' created with a login profile");
        Ok(user)
    }

    /// Delete a user after stripping everything IAM requires to be gone first.
    ///
    /// The inline policy, group membership and login profile phases are best
    /// effort and never stop the next phase. Only the final deletion decides
    /// the outcome; a failure there other than not-found or conflict is
    /// returned as an error.
    pub async fn delete_user(&self, user_name: &str) -> IamcResult<DeleteUserReport> {
        let policies = self.remove_inline_policies(user_name).await;
        let groups = self.leave_all_groups(user_name).await;
        let login_profile = self.remove_login_profile(user_name).await;

        let outcome = match self.client.delete_user(user_name).await {
            Ok(()) => {
                info!("User '{user_name}' deleted");
                UserDeletion::Deleted
            }
            Err(AwsError::NotFound(_)) => {
                debug!("User '{user_name}' does not exist");
                UserDeletion::NotFound
            }
            Err(AwsError::Conflict(reason)) => {
                warn!("User '{user_name}' still has dependents and was not deleted: {reason}");
                UserDeletion::Conflict(reason)
            }
            Err(e) => return Err(e.into()),
        };

        Ok(DeleteUserReport {
            policies,
            groups,
            login_profile,
            outcome,
        })
    }

    async fn remove_inline_policies(&self, user_name: &str) -> PhaseOutcome {
        let policy_names = match self.client.list_user_policies(user_name).await {
            Ok(names) => names,
            Err(e) => return phase_failure("list inline policies", user_name, &e),
        };

        let mut outcome = PhaseOutcome::Succeeded;
        for policy_name in &policy_names {
            match self.client.delete_user_policy(user_name, policy_name).await {
                Ok(()) => debug!("Deleted inline policy '{policy_name}' of '{user_name}'"),
                // already gone
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    outcome = outcome.fold(phase_failure("delete inline policy", user_name, &e));
                }
            }
        }
        outcome
    }

    async fn leave_all_groups(&self, user_name: &str) -> PhaseOutcome {
        let groups = match self.client.list_groups_for_user(user_name).await {
            Ok(groups) => groups,
            Err(e) => return phase_failure("list groups", user_name, &e),
        };

        let mut outcome = PhaseOutcome::Succeeded;
        for group in &groups {
            match self
                .client
                .remove_user_from_group(&group.group_name, user_name)
                .await
            {
                Ok(()) => debug!("Removed '{user_name}' from group '{}'", group.group_name),
                Err(e) if e.is_not_found() => {}
                Err(e) => {
                    outcome = outcome.fold(phase_failure("leave group", user_name, &e));
                }
            }
        }
        outcome
    }

    async fn remove_login_profile(&self, user_name: &str) -> PhaseOutcome {
        match self.client.delete_login_profile(user_name).await {
            Ok(()) => {
                debug!("Deleted login profile of '{user_name}'");
                PhaseOutcome::Succeeded
            }
            Err(e) => phase_failure("delete login profile", user_name, &e),
        }
    }
}

/// Not-found means the phase has nothing left to do; anything else is logged
/// and recorded while cleanup carries on.
fn phase_failure(step: &str, user_name: &str, err: &AwsError) -> PhaseOutcome {
    let outcome = PhaseOutcome::from_error(err);
    if outcome.is_failed() {
        warn!("Could not {step} for '{user_name}', continuing: {err}");
    }
    outcome
}
