//! In-memory identity service used by the orchestrator tests.
//!
//! It enforces the same deletion precondition as IAM: a user with a login
//! profile, inline policies, access keys or group memberships cannot be
//! deleted.

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::aws::identity::IdentityService;
use crate::aws::{AwsError, AwsResult};
use crate::types::{Group, User};

pub(crate) const ACCOUNT: &str = "123456789012";

struct UserRecord {
    user: User,
    login_profile: bool,
    inline_policies: BTreeSet<String>,
    access_keys: usize,
}

struct GroupRecord {
    group: Group,
    policies: BTreeMap<String, String>,
    members: BTreeSet<String>,
}

#[derive(Default)]
struct State {
    users: Vec<UserRecord>,
    groups: BTreeMap<String, GroupRecord>,
    calls: Vec<String>,
    failing: HashSet<&'static str>,
    // exist, but lookups miss them once (created by a concurrent operator)
    racing_groups: HashSet<String>,
    next_id: u32,
}

impl State {
    fn user(&mut self, name: &str) -> AwsResult<&mut UserRecord> {
        self.users
            .iter_mut()
            .find(|r| r.user.user_name == name)
            .ok_or_else(|| AwsError::NotFound(format!("user {name}")))
    }

    fn group(&mut self, name: &str) -> AwsResult<&mut GroupRecord> {
        self.groups
            .get_mut(name)
            .ok_or_else(|| AwsError::NotFound(format!("group {name}")))
    }

    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{:012}", self.next_id)
    }

    fn insert_user(&mut self, name: &str) -> User {
        let user = User {
            user_name: name.to_string(),
            user_id: self.next_id("AIDA"),
            arn: format!("arn:aws:iam::{ACCOUNT}:user/{name}"),
            path: "/".to_string(),
            create_date: Utc::now(),
        };
        self.users.push(UserRecord {
            user: user.clone(),
            login_profile: false,
            inline_policies: BTreeSet::new(),
            access_keys: 0,
        });
        user
    }

    fn insert_group(&mut self, name: &str) -> Group {
        let group = Group {
            group_name: name.to_string(),
            group_id: self.next_id("AGPA"),
            arn: format!("arn:aws:iam::{ACCOUNT}:group/{name}"),
        };
        self.groups.insert(
            name.to_string(),
            GroupRecord {
                group: group.clone(),
                policies: BTreeMap::new(),
                members: BTreeSet::new(),
            },
        );
        group
    }

    fn is_member(&self, user_name: &str) -> bool {
        self.groups.values().any(|g| g.members.contains(user_name))
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeIdentityService {
    state: Arc<Mutex<State>>,
}

impl FakeIdentityService {
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().expect("fake identity state poisoned")
    }

    /// Record a call and apply any injected failure
    fn begin(&self, operation: &'static str) -> AwsResult<MutexGuard<'_, State>> {
        let mut state = self.state();
        state.calls.push(operation.to_string());
        if state.failing.contains(operation) {
            return Err(AwsError::IamError(format!("{operation}: injected failure")));
        }
        Ok(state)
    }

    /// Make every call of `operation` fail with a generic service error
    pub(crate) fn fail_on(&self, operation: &'static str) {
        self.state().failing.insert(operation);
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    pub(crate) fn seed_user(&self, name: &str) -> User {
        self.state().insert_user(name)
    }

    pub(crate) fn seed_login_profile(&self, name: &str) {
        if let Ok(user) = self.state().user(name) {
            user.login_profile = true;
        }
    }

    pub(crate) fn seed_user_policy(&self, name: &str, policy_name: &str) {
        if let Ok(user) = self.state().user(name) {
            user.inline_policies.insert(policy_name.to_string());
        }
    }

    pub(crate) fn seed_access_key(&self, name: &str) {
        if let Ok(user) = self.state().user(name) {
            user.access_keys += 1;
        }
    }

    pub(crate) fn seed_membership(&self, group_name: &str, user_name: &str) {
        let mut state = self.state();
        if !state.groups.contains_key(group_name) {
            state.insert_group(group_name);
        }
        if let Ok(group) = state.group(group_name) {
            group.members.insert(user_name.to_string());
        }
    }

    /// Create a group that the next `GetGroup` for it will not see yet
    pub(crate) fn seed_racing_group(&self, group_name: &str) {
        let mut state = self.state();
        state.insert_group(group_name);
        state.racing_groups.insert(group_name.to_string());
    }

    pub(crate) fn has_user(&self, name: &str) -> bool {
        self.state().user(name).is_ok()
    }

    pub(crate) fn has_login_profile(&self, name: &str) -> bool {
        self.state().user(name).is_ok_and(|u| u.login_profile)
    }

    pub(crate) fn has_group(&self, name: &str) -> bool {
        self.state().groups.contains_key(name)
    }

    pub(crate) fn group_members(&self, group_name: &str) -> Vec<String> {
        self.state()
            .group(group_name)
            .map(|g| g.members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub(crate) fn group_policies(&self, group_name: &str) -> Vec<(String, String)> {
        self.state()
            .group(group_name)
            .map(|g| {
                g.policies
                    .iter()
                    .map(|(name, doc)| (name.clone(), doc.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl IdentityService for FakeIdentityService {
    async fn list_users(&self) -> AwsResult<Vec<User>> {
        let state = self.begin("ListUsers")?;
        Ok(state.users.iter().map(|r| r.user.clone()).collect())
    }

    async fn create_user(&self, user_name: &str) -> AwsResult<User> {
        let mut state = self.begin("CreateUser")?;
        if state.user(user_name).is_ok() {
            return Err(AwsError::AlreadyExists(format!("user {user_name}")));
        }
        Ok(state.insert_user(user_name))
    }

    async fn delete_user(&self, user_name: &str) -> AwsResult<()> {
        let mut state = self.begin("DeleteUser")?;
        let member = state.is_member(user_name);
        let record = state.user(user_name)?;
        if member
            || record.login_profile
            || record.access_keys > 0
            || !record.inline_policies.is_empty()
        {
            return Err(AwsError::Conflict(format!(
                "user {user_name}: cannot delete entity, must remove dependents first"
            )));
        }
        state.users.retain(|r| r.user.user_name != user_name);
        Ok(())
    }

    async fn create_login_profile(&self, user_name: &str, _password: &str) -> AwsResult<()> {
        let mut state = self.begin("CreateLoginProfile")?;
        let record = state.user(user_name)?;
        if record.login_profile {
            return Err(AwsError::AlreadyExists(format!("login profile {user_name}")));
        }
        record.login_profile = true;
        Ok(())
    }

    async fn delete_login_profile(&self, user_name: &str) -> AwsResult<()> {
        let mut state = self.begin("DeleteLoginProfile")?;
        let record = state.user(user_name)?;
        if !record.login_profile {
            return Err(AwsError::NotFound(format!("login profile {user_name}")));
        }
        record.login_profile = false;
        Ok(())
    }

    async fn list_user_policies(&self, user_name: &str) -> AwsResult<Vec<String>> {
        let mut state = self.begin("ListUserPolicies")?;
        Ok(state.user(user_name)?.inline_policies.iter().cloned().collect())
    }

    async fn delete_user_policy(&self, user_name: &str, policy_name: &str) -> AwsResult<()> {
        let mut state = self.begin("DeleteUserPolicy")?;
        if state.user(user_name)?.inline_policies.remove(policy_name) {
            Ok(())
        } else {
            Err(AwsError::NotFound(format!("policy {policy_name}")))
        }
    }

    async fn list_groups_for_user(&self, user_name: &str) -> AwsResult<Vec<Group>> {
        let mut state = self.begin("ListGroupsForUser")?;
        state.user(user_name)?;
        Ok(state
            .groups
            .values()
            .filter(|g| g.members.contains(user_name))
            .map(|g| g.group.clone())
            .collect())
    }

    async fn add_user_to_group(&self, group_name: &str, user_name: &str) -> AwsResult<()> {
        let mut state = self.begin("AddUserToGroup")?;
        state.group(group_name)?;
        state.user(user_name)?;
        state.group(group_name)?.members.insert(user_name.to_string());
        Ok(())
    }

    async fn remove_user_from_group(&self, group_name: &str, user_name: &str) -> AwsResult<()> {
        let mut state = self.begin("RemoveUserFromGroup")?;
        state.user(user_name)?;
        if state.group(group_name)?.members.remove(user_name) {
            Ok(())
        } else {
            Err(AwsError::NotFound(format!(
                "user {user_name} is not a member of {group_name}"
            )))
        }
    }

    async fn get_group(&self, group_name: &str) -> AwsResult<Group> {
        let mut state = self.begin("GetGroup")?;
        if state.racing_groups.remove(group_name) {
            return Err(AwsError::NotFound(format!("group {group_name}")));
        }
        Ok(state.group(group_name)?.group.clone())
    }

    async fn create_group(&self, group_name: &str) -> AwsResult<Group> {
        let mut state = self.begin("CreateGroup")?;
        if state.groups.contains_key(group_name) {
            return Err(AwsError::AlreadyExists(format!("group {group_name}")));
        }
        Ok(state.insert_group(group_name))
    }

    async fn put_group_policy(
        &self,
        group_name: &str,
        policy_name: &str,
        policy_document: &str,
    ) -> AwsResult<()> {
        let mut state = self.begin("PutGroupPolicy")?;
        state
            .group(group_name)?
            .policies
            .insert(policy_name.to_string(), policy_document.to_string());
        Ok(())
    }
}
