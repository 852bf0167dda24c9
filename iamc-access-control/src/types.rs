//! Domain types shared by the orchestrator, the IAM binding and the CLI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aws::arn::account_number;
use crate::aws::AwsError;

/// An IAM user as returned by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub user_name: String,
    pub user_id: String,
    pub arn: String,
    pub path: String,
    pub create_date: DateTime<Utc>,
}

impl User {
    /// Account number embedded in the user's ARN
    pub fn account_number(&self) -> Option<&str> {
        account_number(&self.arn)
    }
}

/// An IAM group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Group {
    pub group_name: String,
    pub group_id: String,
    pub arn: String,
}

/// IAM policy document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PolicyDocument {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub statement: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statement {
    pub sid: String,
    pub effect: String,
    pub action: String,
    pub resource: String,
}

/// Result of one best-effort cleanup phase of a user deletion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum PhaseOutcome {
    /// The phase ran and removed whatever it found
    Succeeded,
    /// The entity the phase works on was already gone
    AlreadyAbsent,
    /// The phase hit an error other than not-found; cleanup carried on
    Failed(String),
}

impl PhaseOutcome {
    pub(crate) fn from_error(err: &AwsError) -> Self {
        if err.is_not_found() {
            Self::AlreadyAbsent
        } else {
            Self::Failed(err.to_string())
        }
    }

    /// Combine with the outcome of a later step of the same phase.
    /// The first failure wins.
    pub(crate) fn fold(self, next: Self) -> Self {
        match (self, next) {
            (failed @ Self::Failed(_), _) => failed,
            (_, failed @ Self::Failed(_)) => failed,
            (current, _) => current,
        }
    }

    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Terminal outcome of a user deletion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum UserDeletion {
    Deleted,
    NotFound,
    /// The user still has dependents this tool does not manage (e.g. access keys)
    Conflict(String),
}

/// Per-phase record of a `delete_user` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteUserReport {
    pub policies: PhaseOutcome,
    pub groups: PhaseOutcome,
    pub login_profile: PhaseOutcome,
    pub outcome: UserDeletion,
}

impl DeleteUserReport {
    pub const fn deleted(&self) -> bool {
        matches!(self.outcome, UserDeletion::Deleted)
    }
}
