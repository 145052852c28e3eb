use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use reqwest::Url;

use crate::clap::AwsConfig;

const CREDENTIALS_PROVIDER_NAME: &str = "static-test-credentials";

#[derive(Clone)]
pub struct S3Client {
    inner: Client,
}

impl S3Client {
    /// Build a client for an S3 compatible gateway using a fixed pair of credentials,
    /// such as the ones of a test container.
    pub fn new(
        aws_config: AwsConfig,
        s3_endpoint_url: Url,
        access_key: &str,
        secret_key: &str,
    ) -> S3Client {
        let region = Region::new(aws_config.region);
        let credentials = Credentials::new(
            access_key,
            secret_key,
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let config = aws_sdk_s3::Config::builder()
            .behavior_version_latest()
            .region(region)
            .force_path_style(true) // gateways like ceph and minio don't serve virtual hosted buckets
            .credentials_provider(credentials)
            .endpoint_url(s3_endpoint_url.as_str())
            .build();

        let inner = Client::from_conf(config);

        S3Client { inner }
    }

    pub async fn create_bucket(&self, bucket: &str) -> anyhow::Result<()> {
        self.inner.create_bucket().bucket(bucket).send().await?;

        Ok(())
    }

    pub async fn delete_bucket(&self, bucket: &str) -> anyhow::Result<()> {
        self.inner.delete_bucket().bucket(bucket).send().await?;

        Ok(())
    }

    pub async fn list_buckets(&self) -> anyhow::Result<Vec<String>> {
        let resp = self.inner.list_buckets().send().await?;

        let names = resp
            .buckets
            .unwrap_or_default()
            .into_iter()
            .filter_map(|bucket| bucket.name)
            .collect();

        Ok(names)
    }

    pub async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: impl Into<ByteStream>,
    ) -> anyhow::Result<()> {
        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body.into())
            .send()
            .await?;

        Ok(())
    }

    pub async fn get_object(&self, bucket: &str, key: &str) -> anyhow::Result<Vec<u8>> {
        let object_output = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        let bytes = object_output.body.collect().await?.into_bytes();

        Ok(bytes.to_vec())
    }

    pub async fn get_object_string(&self, bucket: &str, key: &str) -> anyhow::Result<String> {
        let bytes = self.get_object(bucket, key).await?;

        Ok(String::from_utf8(bytes)?)
    }

    pub async fn delete_object(&self, bucket: &str, key: &str) -> anyhow::Result<()> {
        self.inner
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await?;

        Ok(())
    }
}
