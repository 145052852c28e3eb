use std::time::Duration;

use ceph_testcontainer::{
    options::{
        with_access_key, with_bucket, with_network, with_secret_key, with_ssl_disabled,
        with_startup_timeout,
    },
    CephContainer, LaunchBuilder,
};
use clap::Parser;
use common::{aws::s3::client::S3Client, tracing::init_tracing};
use reqwest::Url;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let _ = start(cli).await.map_err(|e| {
        tracing::error!("{}", e);
    });
}

async fn start(cli: Cli) -> anyhow::Result<()> {
    init_tracing("info");

    tracing::info!("Cli args: {cli:?}");

    let mut builder = LaunchBuilder::default().with(with_startup_timeout(Duration::from_secs(
        cli.startup_timeout_seconds,
    )));

    if let Some(access_key) = cli.access_key {
        builder = builder.with(with_access_key(access_key.into_inner()));
    }
    if let Some(secret_key) = cli.secret_key {
        builder = builder.with(with_secret_key(secret_key.into_inner()));
    }
    if let Some(bucket) = cli.bucket {
        builder = builder.with(with_bucket(bucket));
    }
    if let Some(network) = cli.network {
        builder = builder.with(with_network(network));
    }
    if cli.ssl_disabled {
        builder = builder.with(with_ssl_disabled());
    }

    let ceph = builder.start().await?;

    let http_url = ceph.http_url().await?;
    let https_url = ceph.https_url().await?;

    tracing::info!("Ceph demo container {} is ready", ceph.id());
    tracing::info!("Bucket:     {}", ceph.bucket());
    tracing::info!("Access key: {}", ceph.access_key());
    tracing::info!("Secret key: {}", ceph.secret_key());
    tracing::info!("HTTP URL:   {}", http_url);
    tracing::info!("HTTPS URL:  {}", https_url);

    let result = run(&cli.aws_config, &ceph, &http_url, cli.smoke_test).await;

    tracing::info!("Terminating ceph demo container {}", ceph.id());
    ceph.terminate().await?;

    result
}

async fn run(
    aws_config: &common::clap::AwsConfig,
    ceph: &CephContainer,
    http_url: &str,
    smoke_test: bool,
) -> anyhow::Result<()> {
    if smoke_test {
        let s3_client = S3Client::new(
            aws_config.clone(),
            Url::parse(http_url)?,
            ceph.access_key(),
            ceph.secret_key(),
        );

        smoke_test_bucket(&s3_client).await?;
    }

    tracing::info!("Press Ctrl-C to stop the container");
    tokio::signal::ctrl_c().await?;

    Ok(())
}

async fn smoke_test_bucket(s3_client: &S3Client) -> anyhow::Result<()> {
    const BUCKET: &str = "smoke-test";
    const KEY: &str = "smoke-test-key";
    const CONTENT: &str = "Hello, World!";

    s3_client.create_bucket(BUCKET).await?;
    s3_client
        .put_object(BUCKET, KEY, CONTENT.as_bytes().to_vec())
        .await?;

    let content = s3_client.get_object_string(BUCKET, KEY).await?;
    anyhow::ensure!(
        content == CONTENT,
        "Read back '{content}' instead of '{CONTENT}'"
    );

    s3_client.delete_object(BUCKET, KEY).await?;
    s3_client.delete_bucket(BUCKET).await?;

    tracing::info!("Smoke test passed");

    Ok(())
}
