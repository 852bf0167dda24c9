//! AWS IAM client wrapper implementing [`IdentityService`]

use std::error::Error as StdError;
use std::fmt::Debug;

use async_trait::async_trait;
use aws_sdk_iam::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_iam::primitives::DateTime as SdkDateTime;
use aws_sdk_iam::types::{Group as SdkGroup, User as SdkUser};
use aws_sdk_iam::Client as IamClient;
use chrono::{DateTime, Utc};
use log::debug;

use crate::aws::identity::IdentityService;
use crate::aws::{AwsError, AwsResult};
use crate::types::{Group, User};

pub struct AwsIamClient {
    client: IamClient,
}

impl AwsIamClient {
    pub fn new(client: IamClient) -> Self {
        Self { client }
    }
}

/// Map an SDK failure onto the identity-service error taxonomy by AWS error code
fn classify<E, R>(operation: &str, entity: &str, err: SdkError<E, R>) -> AwsError
where
    E: ProvideErrorMetadata + StdError + Send + Sync + 'static,
    R: Debug,
{
    let (code, message) = match err.as_service_error() {
        Some(service_err) => (
            service_err.code().map(str::to_string),
            service_err.message().unwrap_or_default().to_string(),
        ),
        None => (None, String::new()),
    };
    match code.as_deref() {
        Some("NoSuchEntity") => AwsError::NotFound(format!("{entity}: {message}")),
        Some("DeleteConflict") => AwsError::Conflict(format!("{entity}: {message}")),
        Some("EntityAlreadyExists") => AwsError::AlreadyExists(format!("{entity}: {message}")),
        _ => AwsError::IamError(format!(
            "{operation} failed for '{entity}': {}",
            DisplayErrorContext(&err)
        )),
    }
}

fn to_utc(date: &SdkDateTime) -> DateTime<Utc> {
    DateTime::from_timestamp(date.secs(), date.subsec_nanos()).unwrap_or_default()
}

fn user_from_sdk(user: &SdkUser) -> User {
    User {
        user_name: user.user_name().to_string(),
        user_id: user.user_id().to_string(),
        arn: user.arn().to_string(),
        path: user.path().to_string(),
        create_date: to_utc(user.create_date()),
    }
}

fn group_from_sdk(group: &SdkGroup) -> Group {
    Group {
        group_name: group.group_name().to_string(),
        group_id: group.group_id().to_string(),
        arn: group.arn().to_string(),
    }
}

#[async_trait]
impl IdentityService for AwsIamClient {
    async fn list_users(&self) -> AwsResult<Vec<User>> {
        let mut pages = self.client.list_users().into_paginator().items().send();
        let mut users = Vec::new();
        while let Some(user) = pages
            .try_next()
            .await
            .map_err(|e| classify("ListUsers", "*", e))?
        {
            users.push(user_from_sdk(&user));
        }
        debug!("ListUsers returned {} users", users.len());
        Ok(users)
    }

    async fn create_user(&self, user_name: &str) -> AwsResult<User> {
        let response = self
            .client
            .create_user()
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| classify("CreateUser", user_name, e))?;
        response.user().map(user_from_sdk).ok_or_else(|| {
            AwsError::IamError(format!("CreateUser response for '{user_name}' is missing User"))
        })
    }

    async fn delete_user(&self, user_name: &str) -> AwsResult<()> {
        self.client
            .delete_user()
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| classify("DeleteUser", user_name, e))?;
        Ok(())
    }

    async fn create_login_profile(&self, user_name: &str, password: &str) -> AwsResult<()> {
        self.client
            .create_login_profile()
            .user_name(user_name)
            .password(password)
            .send()
            .await
            .map_err(|e| classify("CreateLoginProfile", user_name, e))?;
        Ok(())
    }

    async fn delete_login_profile(&self, user_name: &str) -> AwsResult<()> {
        self.client
            .delete_login_profile()
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| classify("DeleteLoginProfile", user_name, e))?;
        Ok(())
    }

    async fn list_user_policies(&self, user_name: &str) -> AwsResult<Vec<String>> {
        let mut pages = self
            .client
            .list_user_policies()
            .user_name(user_name)
            .into_paginator()
            .items()
            .send();
        let mut names = Vec::new();
        while let Some(name) = pages
            .try_next()
            .await
            .map_err(|e| classify("ListUserPolicies", user_name, e))?
        {
            names.push(name);
        }
        Ok(names)
    }

    async fn delete_user_policy(&self, user_name: &str, policy_name: &str) -> AwsResult<()> {
        self.client
            .delete_user_policy()
            .user_name(user_name)
            .policy_name(policy_name)
            .send()
            .await
            .map_err(|e| classify("DeleteUserPolicy", &format!("{user_name}/{policy_name}"), e))?;
        Ok(())
    }

    async fn list_groups_for_user(&self, user_name: &str) -> AwsResult<Vec<Group>> {
        let mut pages = self
            .client
            .list_groups_for_user()
            .user_name(user_name)
            .into_paginator()
            .items()
            .send();
        let mut groups = Vec::new();
        while let Some(group) = pages
            .try_next()
            .await
            .map_err(|e| classify("ListGroupsForUser", user_name, e))?
        {
            groups.push(group_from_sdk(&group));
        }
        Ok(groups)
    }

    async fn add_user_to_group(&self, group_name: &str, user_name: &str) -> AwsResult<()> {
        self.client
            .add_user_to_group()
            .group_name(group_name)
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| classify("AddUserToGroup", &format!("{group_name}/{user_name}"), e))?;
        Ok(())
    }

    async fn remove_user_from_group(&self, group_name: &str, user_name: &str) -> AwsResult<()> {
        self.client
            .remove_user_from_group()
            .group_name(group_name)
            .user_name(user_name)
            .send()
            .await
            .map_err(|e| {
                classify("RemoveUserFromGroup", &format!("{group_name}/{user_name}"), e)
            })?;
        Ok(())
    }

    async fn get_group(&self, group_name: &str) -> AwsResult<Group> {
        let response = self
            .client
            .get_group()
            .group_name(group_name)
            .send()
            .await
            .map_err(|e| classify("GetGroup", group_name, e))?;
        response.group().map(group_from_sdk).ok_or_else(|| {
            AwsError::IamError(format!("GetGroup response for '{group_name}' is missing Group"))
        })
    }

    async fn create_group(&self, group_name: &str) -> AwsResult<Group> {
        let response = self
            .client
            .create_group()
            .group_name(group_name)
            .send()
            .await
            .map_err(|e| classify("CreateGroup", group_name, e))?;
        response.group().map(group_from_sdk).ok_or_else(|| {
            AwsError::IamError(format!("CreateGroup response for '{group_name}' is missing Group"))
        })
    }

    async fn put_group_policy(
        &self,
        group_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> AwsResult<()> {
        self.client
            .put_group_policy()
            .group_name(group_name)
            .policy_name(policy_name)
            .policy_document(policy_document)
            .send()
            .await
            .map_err(|e| classify("PutGroupPolicy", &format!("{group_name}/{policy_name}"), e))?;
        Ok(())
    }
}
