use std::{io, time::Duration};

use testcontainers::TestcontainersError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid customization: {0}")]
    InvalidCustomization(String),
    #[error("Invalid bucket name '{0}'")]
    InvalidBucketName(String),
    #[error("Invalid readiness pattern")]
    Pattern(#[from] regex::Error),
    #[error("Container runtime error: {0}")]
    Runtime(#[from] TestcontainersError),
    #[error("Container did not become ready within {timeout:?}, waiting for '{pattern}'")]
    StartupTimeout { pattern: String, timeout: Duration },
    #[error("Container log streams closed before a line matched '{pattern}'")]
    LogStreamClosed { pattern: String },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
