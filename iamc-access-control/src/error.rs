//! Crate-level error type

use crate::aws::AwsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IamcError {
    #[error(transparent)]
    Aws(#[from] AwsError),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Unknown service '{0}', expected one of: eb, ec2")]
    UnknownService(String),
}

impl IamcError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

pub type IamcResult<T> = Result<T, IamcError>;
