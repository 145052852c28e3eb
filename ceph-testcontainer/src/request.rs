use std::{collections::HashMap, time::Duration};

use regex::Regex;
use testcontainers::core::WaitFor;

use crate::{
    constants::{
        ENV_DEMO_ACCESS_KEY, ENV_DEMO_BUCKET, ENV_DEMO_SECRET_KEY, ENV_DEMO_UID, ENV_MONITOR_IP,
        ENV_PUBLIC_NETWORK, ENV_RGW_NAME,
    },
    defaults::{ConfigDefaults, ExposedPort},
    Result,
};

/// Replaces the image's entrypoint. `program` becomes the Docker entrypoint and
/// `args` the command passed to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entrypoint {
    pub program: String,
    pub args: Vec<String>,
}

impl Entrypoint {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = String>) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().collect(),
        }
    }
}

/// How to decide that a started container is usable.
#[derive(Debug, Clone)]
pub enum Readiness {
    /// Wait for any line of the combined stdout and stderr to match
    LogMatches(Regex),
    /// Hand the conditions to the container runtime
    Conditions(Vec<WaitFor>),
}

impl Readiness {
    /// The pattern matching the log line the demo image writes once it has created `bucket`.
    pub fn bucket_created(bucket: &str) -> Result<Self> {
        let pattern = format!("Bucket 's3://{}/' created", regex::escape(bucket));

        Ok(Readiness::LogMatches(Regex::new(&pattern)?))
    }

    pub fn describe(&self) -> String {
        match self {
            Readiness::LogMatches(regex) => regex.as_str().to_owned(),
            Readiness::Conditions(conditions) => format!("{conditions:?}"),
        }
    }
}

/// An in-progress launch description.
///
/// Every setter consumes the request and returns the updated value, so a
/// customization can only produce a new request, never mutate one it
/// doesn't own.
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    image_name: String,
    image_tag: String,
    env_vars: HashMap<String, String>,
    exposed_ports: Vec<ExposedPort>,
    rgw_port: ExposedPort,
    entrypoint: Option<Entrypoint>,
    readiness: Option<Readiness>,
    startup_timeout: Duration,
    network: Option<String>,
}

impl LaunchRequest {
    pub fn from_defaults(defaults: &ConfigDefaults) -> Self {
        let mut env_vars = HashMap::new();
        env_vars.insert(ENV_DEMO_UID.to_owned(), defaults.uid.clone());
        env_vars.insert(ENV_DEMO_BUCKET.to_owned(), defaults.bucket.clone());
        env_vars.insert(ENV_DEMO_ACCESS_KEY.to_owned(), defaults.access_key.clone());
        env_vars.insert(ENV_DEMO_SECRET_KEY.to_owned(), defaults.secret_key.clone());
        env_vars.insert(
            ENV_PUBLIC_NETWORK.to_owned(),
            defaults.public_network.clone(),
        );
        env_vars.insert(ENV_MONITOR_IP.to_owned(), defaults.monitor_ip.clone());
        env_vars.insert(ENV_RGW_NAME.to_owned(), defaults.rgw_name.clone());

        Self {
            image_name: defaults.image_name.clone(),
            image_tag: defaults.image_tag.clone(),
            env_vars,
            exposed_ports: vec![defaults.rgw_port, defaults.monitor_port],
            rgw_port: defaults.rgw_port,
            entrypoint: None,
            readiness: None,
            startup_timeout: defaults.startup_timeout,
            network: None,
        }
    }

    pub fn with_env_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars.insert(key.into(), value.into());
        self
    }

    pub fn with_entrypoint(mut self, entrypoint: Entrypoint) -> Self {
        self.entrypoint = Some(entrypoint);
        self
    }

    pub fn with_readiness(mut self, readiness: Readiness) -> Self {
        self.readiness = Some(readiness);
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn image_tag(&self) -> &str {
        &self.image_tag
    }

    pub fn env_var(&self, key: &str) -> Option<&str> {
        self.env_vars.get(key).map(String::as_str)
    }

    pub fn env_vars(&self) -> &HashMap<String, String> {
        &self.env_vars
    }

    pub fn exposed_ports(&self) -> &[ExposedPort] {
        &self.exposed_ports
    }

    /// The container-internal port the S3 API listens on
    pub fn rgw_port(&self) -> ExposedPort {
        self.rgw_port
    }

    pub fn entrypoint(&self) -> Option<&Entrypoint> {
        self.entrypoint.as_ref()
    }

    pub fn readiness(&self) -> Option<&Readiness> {
        self.readiness.as_ref()
    }

    pub fn startup_timeout(&self) -> Duration {
        self.startup_timeout
    }

    pub fn network(&self) -> Option<&str> {
        self.network.as_deref()
    }

    fn env_or_empty(&self, key: &str) -> String {
        self.env_var(key).unwrap_or_default().to_owned()
    }
}

/// A single step applied to a [`LaunchRequest`] before the container is started.
///
/// Any `FnOnce(LaunchRequest) -> Result<LaunchRequest>` can be boxed into one; the
/// ready made ones live in [`crate::options`].
pub type Customization = Box<dyn FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send>;

/// A fully resolved launch: customizations applied and a readiness condition always present.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    pub(crate) request: LaunchRequest,
    pub(crate) readiness: Readiness,
}

impl LaunchConfig {
    pub fn request(&self) -> &LaunchRequest {
        &self.request
    }

    pub fn readiness(&self) -> &Readiness {
        &self.readiness
    }

    pub fn access_key(&self) -> String {
        self.request.env_or_empty(ENV_DEMO_ACCESS_KEY)
    }

    pub fn secret_key(&self) -> String {
        self.request.env_or_empty(ENV_DEMO_SECRET_KEY)
    }

    pub fn bucket(&self) -> String {
        self.request.env_or_empty(ENV_DEMO_BUCKET)
    }

    pub fn startup_timeout(&self) -> Duration {
        self.request.startup_timeout
    }
}

pub struct LaunchBuilder {
    defaults: ConfigDefaults,
    customizations: Vec<Customization>,
}

impl Default for LaunchBuilder {
    fn default() -> Self {
        Self::new(ConfigDefaults::default())
    }
}

impl LaunchBuilder {
    pub fn new(defaults: ConfigDefaults) -> Self {
        Self {
            defaults,
            customizations: vec![],
        }
    }

    pub fn with<F>(mut self, customization: F) -> Self
    where
        F: FnOnce(LaunchRequest) -> Result<LaunchRequest> + Send + 'static,
    {
        self.customizations.push(Box::new(customization));
        self
    }

    pub fn with_all(mut self, customizations: impl IntoIterator<Item = Customization>) -> Self {
        self.customizations.extend(customizations);
        self
    }

    /// Applies the customizations in the order they were added. The first failure is returned as is.
    pub fn build(self) -> Result<LaunchConfig> {
        let request = self.customizations.into_iter().try_fold(
            LaunchRequest::from_defaults(&self.defaults),
            |request, customization| customization(request),
        )?;

        // The derived pattern has to follow the bucket as customized, not the default one
        let readiness = match request.readiness() {
            Some(readiness) => readiness.clone(),
            None => Readiness::bucket_created(&request.env_or_empty(ENV_DEMO_BUCKET))?,
        };

        Ok(LaunchConfig { request, readiness })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{constants::DEMO_ENV_KEYS, Error};

    #[test]
    fn no_customizations_yield_the_defaults() {
        let config = LaunchBuilder::default().build().unwrap();
        let request = config.request();

        assert_eq!(request.env_vars().len(), 7);
        for key in DEMO_ENV_KEYS {
            assert!(request.env_var(key).is_some(), "missing {key}");
        }
        assert_eq!(request.env_var(ENV_DEMO_UID), Some("demo"));
        assert_eq!(request.env_var(ENV_DEMO_BUCKET), Some("demo"));
        assert_eq!(request.env_var(ENV_DEMO_ACCESS_KEY), Some("demo"));
        assert_eq!(
            request.env_var(ENV_DEMO_SECRET_KEY),
            Some("b36361c4-1589-42f7-a369-d9dafb926d55")
        );
        assert_eq!(request.env_var(ENV_PUBLIC_NETWORK), Some("0.0.0.0/0"));
        assert_eq!(request.env_var(ENV_MONITOR_IP), Some("127.0.0.1"));
        assert_eq!(request.env_var(ENV_RGW_NAME), Some("localhost"));

        assert_eq!(
            request.exposed_ports(),
            &[ExposedPort::tcp(8080), ExposedPort::tcp(3300)]
        );
        assert!(request.entrypoint().is_none());
        assert_eq!(request.image_name(), "quay.io/ceph/demo");
        assert_eq!(request.image_tag(), "latest-quincy");
        assert_eq!(config.startup_timeout(), Duration::from_secs(300));
    }

    #[test]
    fn derived_readiness_matches_the_bucket_created_line() {
        let config = LaunchBuilder::default().build().unwrap();

        let Readiness::LogMatches(regex) = config.readiness() else {
            panic!("expected a log pattern");
        };

        assert!(regex.is_match("2024-01-01 12:00:00  /opt/ceph-container/bin/demo: Bucket 's3://demo/' created"));
        assert!(!regex.is_match("Bucket 's3://other/' created"));
    }

    #[test]
    fn derived_readiness_follows_customized_bucket() {
        let config = LaunchBuilder::default()
            .with(|request| Ok(request.with_env_var(ENV_DEMO_BUCKET, "my.bucket")))
            .build()
            .unwrap();

        let Readiness::LogMatches(regex) = config.readiness() else {
            panic!("expected a log pattern");
        };

        assert!(regex.is_match("Bucket 's3://my.bucket/' created"));
        assert!(!regex.is_match("Bucket 's3://demo/' created"));
        // Dots in the bucket name are literal
        assert!(!regex.is_match("Bucket 's3://myxbucket/' created"));
        assert_eq!(config.bucket(), "my.bucket");
    }

    #[test]
    fn explicit_readiness_wins_over_derived() {
        let config = LaunchBuilder::default()
            .with(|request| {
                Ok(request.with_readiness(Readiness::Conditions(vec![WaitFor::message_on_stdout(
                    "custom",
                )])))
            })
            .with(|request| Ok(request.with_env_var(ENV_DEMO_BUCKET, "renamed")))
            .build()
            .unwrap();

        assert!(matches!(config.readiness(), Readiness::Conditions(c) if c.len() == 1));
    }

    #[test]
    fn customizations_apply_in_order() {
        let config = LaunchBuilder::default()
            .with(|request| Ok(request.with_env_var(ENV_DEMO_ACCESS_KEY, "first")))
            .with(|request| Ok(request.with_env_var(ENV_DEMO_ACCESS_KEY, "second")))
            .build()
            .unwrap();

        assert_eq!(config.access_key(), "second");
    }

    #[test]
    fn first_failure_aborts_the_build() {
        let result = LaunchBuilder::default()
            .with(|_| Err(Error::InvalidCustomization("first".into())))
            .with(|_| -> Result<LaunchRequest> {
                panic!("customizations after a failure must not run")
            })
            .build();

        match result {
            Err(Error::InvalidCustomization(reason)) => assert_eq!(reason, "first"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn defaults_are_taken_from_the_supplied_value() {
        let defaults = ConfigDefaults {
            bucket: "fixtures".into(),
            startup_timeout: Duration::from_secs(10),
            ..ConfigDefaults::default()
        };

        let config = LaunchBuilder::new(defaults).build().unwrap();

        assert_eq!(config.bucket(), "fixtures");
        assert_eq!(config.startup_timeout(), Duration::from_secs(10));
        assert_eq!(
            config.readiness().describe(),
            "Bucket 's3://fixtures/' created"
        );
    }
}
