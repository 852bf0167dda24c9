//! Group-based service access: grant and revoke

use log::{debug, info, warn};

use crate::aws::identity::IdentityService;
use crate::aws::{AwsError, AwsResult};
use crate::error::IamcResult;
use crate::grants::Service;
use crate::synthesis::build_service_policy;
use crate::types::PhaseOutcome;

impl<C: IdentityService> super::service::AccessControlService<C> {
    /// Grant `user_name` access to the service named `service_name`.
    ///
    /// Returns `Ok(false)` without contacting the identity service when the
    /// name does not resolve to a known [`Service`].
    pub async fn grant_access(&self, user_name: &str, service_name: &str) -> IamcResult<bool> {
        let Some(service) = Service::from_name(service_name) else {
            warn!("Unknown service '{service_name}', nothing granted");
            return Ok(false);
        };
        self.grant(user_name, service).await?;
        Ok(true)
    }

    /// Revoke `user_name`'s access to the service named `service_name`.
    ///
    /// Returns `Ok(false)` for an unknown service name and `Ok(true)`
    /// otherwise, whether or not access had ever been granted.
    pub async fn revoke_access(&self, user_name: &str, service_name: &str) -> IamcResult<bool> {
        let Some(service) = Service::from_name(service_name) else {
            warn!("Unknown service '{service_name}', nothing revoked");
            return Ok(false);
        };
        self.revoke(user_name, service).await;
        Ok(true)
    }

    /// Make `user_name` a member of the service's group, creating the group
    /// on first use and (re)writing its policy.
    pub async fn grant(&self, user_name: &str, service: Service) -> IamcResult<()> {
        let group_name = service.group_name();
        self.ensure_group(group_name).await?;

        let document = serde_json::to_string(&build_service_policy(service)).map_err(|e| {
            AwsError::PolicyError(format!("Failed to serialize policy for '{group_name}': {e}"))
        })?;
        // policy name == group name
        self.client
            .put_group_policy(group_name, group_name, &document)
            .await?;
        self.client.add_user_to_group(group_name, user_name).await?;

        info!("Granted '{user_name}' access to {service} through group '{group_name}'");
        Ok(())
    }

    /// Best-effort removal of `user_name` from the service's group.
    /// Never fails; the group and its policy are left in place. The returned
    /// outcome is `AlreadyAbsent` when the user was not a member.
    pub async fn revoke(&self, user_name: &str, service: Service) -> PhaseOutcome {
        let group_name = service.group_name();
        match self.client.get_group(group_name).await {
            Ok(_) => {}
            Err(AwsError::NotFound(_)) => {
                debug!("Group '{group_name}' does not exist, no access to revoke");
            }
            Err(e) => warn!("Could not look up group '{group_name}': {e}"),
        }

        match self
            .client
            .remove_user_from_group(group_name, user_name)
            .await
        {
            Ok(()) => {
                info!("Revoked '{user_name}' access to {service}");
                PhaseOutcome::Succeeded
            }
            Err(e) if e.is_not_found() => {
                debug!("'{user_name}' is not a member of '{group_name}': {e}");
                PhaseOutcome::AlreadyAbsent
            }
            Err(e) => {
                warn!("Could not remove '{user_name}' from '{group_name}': {e}");
                PhaseOutcome::from_error(&e)
            }
        }
    }

    /// Look the group up and create it when missing. A concurrent creation
    /// surfacing as already-exists counts as success.
    async fn ensure_group(&self, group_name: &str) -> AwsResult<()> {
        match self.client.get_group(group_name).await {
            Ok(_) => Ok(()),
            Err(AwsError::NotFound(_)) => match self.client.create_group(group_name).await {
                Ok(group) => {
                    info!("Created group '{}' ({})", group.group_name, group.arn);
                    Ok(())
                }
                Err(AwsError::AlreadyExists(_)) => {
                    debug!("Group '{group_name}' was created concurrently");
                    Ok(())
                }
                Err(e) => Err(e),
            },
            Err(e) => Err(e),
        }
    }
}
