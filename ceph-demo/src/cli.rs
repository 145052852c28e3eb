use clap::Parser;
use common::clap::{AwsConfig, CliSecret, KeyPrefixRedactor, PlainRedactor};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// Access key of the demo user
    #[clap(long, env = "CEPH_DEMO_ACCESS_KEY")]
    pub access_key: Option<CliSecret<String, KeyPrefixRedactor>>,
    /// Secret key of the demo user
    #[clap(long, env = "CEPH_DEMO_SECRET_KEY")]
    pub secret_key: Option<CliSecret<String, PlainRedactor>>,
    /// Bucket created when the container starts
    #[clap(long, env = "CEPH_DEMO_BUCKET")]
    pub bucket: Option<String>,
    /// Patch the gateway so it neither verifies nor requires SSL
    #[clap(long)]
    pub ssl_disabled: bool,
    /// Docker network to attach the container to
    #[clap(long)]
    pub network: Option<String>,
    /// How long to wait for the demo bucket to be created
    #[clap(long, default_value_t = 300)]
    pub startup_timeout_seconds: u64,
    /// Create a bucket, write an object and read it back once the container is ready
    #[clap(long)]
    pub smoke_test: bool,
    #[command(flatten)]
    pub aws_config: AwsConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["ceph-demo"]).unwrap();

        assert!(cli.access_key.is_none());
        assert!(cli.bucket.is_none());
        assert!(!cli.ssl_disabled);
        assert_eq!(cli.startup_timeout_seconds, 300);
        assert_eq!(cli.aws_config.region, "us-east-1");
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let cli = Cli::try_parse_from([
            "ceph-demo",
            "--access-key",
            "access-key-1",
            "--secret-key",
            "very-secret",
            "--bucket",
            "fixtures",
            "--ssl-disabled",
        ])
        .unwrap();

        let debug = format!("{cli:?}");
        assert!(debug.contains("acce<REDACTED>"));
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("fixtures"));
        assert!(cli.ssl_disabled);
    }
}
