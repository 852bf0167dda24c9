//! Services that access can be granted to, and the group each one maps to

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::IamcError;

/// Service categories with a dedicated access group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Service {
    ElasticBeanstalk,
    Ec2,
}

/// Group name and IAM action namespace backing a [`Service`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceGrant {
    pub group_name: &'static str,
    pub action_namespace: &'static str,
}

impl ServiceGrant {
    /// Action pattern covering every action of the namespace, e.g. `ec2:*`
    pub fn all_actions(&self) -> String {
        format!("{}:*", self.action_namespace)
    }
}

impl Service {
    pub const ALL: [Self; 2] = [Self::ElasticBeanstalk, Self::Ec2];

    pub const fn grant(self) -> ServiceGrant {
        match self {
            Self::ElasticBeanstalk => ServiceGrant {
                group_name: "iamc-eb",
                action_namespace: "elasticbeanstalk",
            },
            Self::Ec2 => ServiceGrant {
                group_name: "iamc-ec2",
                action_namespace: "ec2",
            },
        }
    }

    pub const fn group_name(self) -> &'static str {
        self.grant().group_name
    }

    /// Resolve a free-text service name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "eb" | "elasticbeanstalk" => Some(Self::ElasticBeanstalk),
            "ec2" => Some(Self::Ec2),
            _ => None,
        }
    }
}

impl FromStr for Service {
    type Err = IamcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| IamcError::UnknownService(s.to_string()))
    }
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ElasticBeanstalk => write!(f, "Elastic Beanstalk"),
            Self::Ec2 => write!(f, "EC2"),
        }
    }
}
