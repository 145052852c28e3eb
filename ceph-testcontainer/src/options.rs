//! Ready made customizations for [`crate::LaunchBuilder`].
//!
//! Each function returns a closure which touches a single part of the
//! [`LaunchRequest`], so they compose in any order. The one interaction worth
//! knowing about is between [`with_bucket`] and [`with_ready_condition`]: the
//! default readiness pattern is derived from the bucket name, unless a readiness
//! condition has been set explicitly.

use std::time::Duration;

use crate::{
    constants::{DEMO_SCRIPT, ENV_DEMO_ACCESS_KEY, ENV_DEMO_BUCKET, ENV_DEMO_SECRET_KEY},
    request::{Entrypoint, LaunchRequest, Readiness},
    Error, Result,
};

pub fn with_access_key(
    key: impl Into<String>,
) -> impl FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send + 'static {
    let key = key.into();

    move |request| {
        if key.is_empty() {
            return Err(Error::InvalidCustomization(
                "access key must not be empty".into(),
            ));
        }

        Ok(request.with_env_var(ENV_DEMO_ACCESS_KEY, key))
    }
}

pub fn with_secret_key(
    key: impl Into<String>,
) -> impl FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send + 'static {
    let key = key.into();

    move |request| {
        if key.is_empty() {
            return Err(Error::InvalidCustomization(
                "secret key must not be empty".into(),
            ));
        }

        Ok(request.with_env_var(ENV_DEMO_SECRET_KEY, key))
    }
}

pub fn with_bucket(
    name: impl Into<String>,
) -> impl FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send + 'static {
    let name = name.into();

    move |request| {
        if !is_valid_bucket_name(&name) {
            return Err(Error::InvalidBucketName(name));
        }

        Ok(request.with_env_var(ENV_DEMO_BUCKET, name))
    }
}

/// Patch the demo script so the gateway neither verifies nor requires SSL, then run it.
pub fn with_ssl_disabled() -> impl FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send + 'static
{
    |request| Ok(request.with_entrypoint(ssl_disabled_entrypoint()))
}

pub fn with_ready_condition(
    readiness: Readiness,
) -> impl FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send + 'static {
    move |request| Ok(request.with_readiness(readiness))
}

pub fn with_startup_timeout(
    timeout: Duration,
) -> impl FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send + 'static {
    move |request| Ok(request.with_startup_timeout(timeout))
}

/// Attach the container to an existing Docker network.
pub fn with_network(
    network: impl Into<String>,
) -> impl FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send + 'static {
    let network = network.into();

    move |request| Ok(request.with_network(network))
}

fn ssl_disabled_entrypoint() -> Entrypoint {
    let script = format!(
        "sed -i '/^rgw frontends = .*/a rgw verify ssl = false\\\n\
         rgw crypt require ssl = false' {DEMO_SCRIPT};\n\
         {DEMO_SCRIPT};"
    );

    Entrypoint::new("bash", vec!["-c".to_owned(), script])
}

/// The relaxed bucket naming the demo gateway accepts: 1 to 255 characters of ASCII
/// letters, digits, dots, hyphens and underscores. The name also ends up in the demo
/// script's shell environment, so nothing else is let through.
fn is_valid_bucket_name(name: &str) -> bool {
    (1..=255).contains(&name.len())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
}
