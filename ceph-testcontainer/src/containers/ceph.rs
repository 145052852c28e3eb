use std::{
    fmt::{self, Display},
    time::{Duration, Instant},
};

use regex::Regex;
use testcontainers::{runners::AsyncRunner, ContainerAsync, RunnableImage};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::{
    images::CephDemo,
    request::{Customization, LaunchBuilder, LaunchConfig, Readiness},
    Error, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Http => write!(f, "http"),
            Scheme::Https => write!(f, "https"),
        }
    }
}

/// A running Ceph demo container.
///
/// The credentials are the ones the container was launched with. The container is
/// removed by [`CephContainer::terminate`], or when the handle is dropped.
pub struct CephContainer {
    container: ContainerAsync<CephDemo>,
    access_key: String,
    secret_key: String,
    bucket: String,
    rgw_port: u16,
}

impl CephContainer {
    pub fn access_key(&self) -> &str {
        &self.access_key
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// The bucket the demo user created on startup
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub async fn http_url(&self) -> Result<String> {
        self.endpoint(Scheme::Http).await
    }

    pub async fn https_url(&self) -> Result<String> {
        self.endpoint(Scheme::Https).await
    }

    /// The URL of the RADOS gateway as seen from the host running the tests.
    pub async fn endpoint(&self, scheme: Scheme) -> Result<String> {
        let host = self.container.get_host().await?;
        let port = self.container.get_host_port_ipv4(self.rgw_port).await?;

        Ok(endpoint_url(scheme, host, port))
    }

    pub fn id(&self) -> &str {
        self.container.id()
    }

    pub fn container(&self) -> &ContainerAsync<CephDemo> {
        &self.container
    }

    pub async fn terminate(self) -> Result<()> {
        tracing::debug!("Removing ceph container {}", self.container.id());
        self.container.rm().await?;

        Ok(())
    }
}

/// `host` is the runtime's host value, whose `Display` already brackets IPv6 addresses.
fn endpoint_url(scheme: Scheme, host: impl Display, port: u16) -> String {
    format!("{scheme}://{host}:{port}")
}

/// Start a container for an already resolved configuration and wait until it is ready.
pub async fn start_ceph(config: LaunchConfig) -> Result<CephContainer> {
    let (image, args) = CephDemo::from_config(&config);
    let mut runnable_image = RunnableImage::from((image, args));

    if let Some(network) = config.request().network() {
        runnable_image = runnable_image.with_network(network);
    }

    let timeout = config.startup_timeout();
    let stopwatch = Instant::now();

    let ports = config
        .request()
        .exposed_ports()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    tracing::info!(
        "Starting {}:{} exposing {}, waiting up to {:?} for '{}'",
        config.request().image_name(),
        config.request().image_tag(),
        ports,
        timeout,
        config.readiness().describe()
    );

    let container = match config.readiness() {
        Readiness::LogMatches(pattern) => {
            let container = runnable_image.start().await?;

            // Follow the logs, otherwise the streams end at the current tail before the
            // demo script gets to create its bucket. Dropping the container on failure removes it.
            let line = wait_for_log_line(
                container.stdout(true),
                container.stderr(true),
                pattern,
                timeout,
            )
            .await?;
            tracing::debug!("Readiness line: {}", line);

            container
        }
        Readiness::Conditions(_) => tokio::time::timeout(timeout, runnable_image.start())
            .await
            .map_err(|_| Error::StartupTimeout {
                pattern: config.readiness().describe(),
                timeout,
            })??,
    };

    tracing::info!(
        "Ceph container {} ready after {:?}",
        container.id(),
        stopwatch.elapsed()
    );

    Ok(CephContainer {
        access_key: config.access_key(),
        secret_key: config.secret_key(),
        bucket: config.bucket(),
        rgw_port: config.request().rgw_port().port,
        container,
    })
}

/// Start a container using the default configuration and the given customizations.
pub async fn run_container(
    customizations: impl IntoIterator<Item = Customization>,
) -> Result<CephContainer> {
    LaunchBuilder::default()
        .with_all(customizations)
        .start()
        .await
}

impl LaunchBuilder {
    pub async fn start(self) -> Result<CephContainer> {
        start_ceph(self.build()?).await
    }
}

/// Read both output streams line by line until one of the lines matches `pattern`.
async fn wait_for_log_line<O, E>(
    stdout: O,
    stderr: E,
    pattern: &Regex,
    timeout: Duration,
) -> Result<String>
where
    O: AsyncBufRead + Unpin,
    E: AsyncBufRead + Unpin,
{
    let wait = async {
        let mut stdout = stdout.lines();
        let mut stderr = stderr.lines();
        let mut stdout_open = true;
        let mut stderr_open = true;

        while stdout_open || stderr_open {
            let line = tokio::select! {
                line = stdout.next_line(), if stdout_open => match line? {
                    Some(line) => line,
                    None => {
                        stdout_open = false;
                        continue;
                    }
                },
                line = stderr.next_line(), if stderr_open => match line? {
                    Some(line) => line,
                    None => {
                        stderr_open = false;
                        continue;
                    }
                },
            };

            if pattern.is_match(&line) {
                return Ok(line);
            }
        }

        Err::<String, Error>(Error::LogStreamClosed {
            pattern: pattern.as_str().to_owned(),
        })
    };

    tokio::time::timeout(timeout, wait)
        .await
        .map_err(|_| Error::StartupTimeout {
            pattern: pattern.as_str().to_owned(),
            timeout,
        })?
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use tokio::io::{duplex, AsyncWriteExt, BufReader};
    use url::Host;

    use super::*;

    #[test]
    fn urls_differ_only_in_scheme() {
        let host: Host = Host::Domain("localhost".to_owned());
        let http = endpoint_url(Scheme::Http, &host, 32768);
        let https = endpoint_url(Scheme::Https, &host, 32768);

        assert_eq!(http, "http://localhost:32768");
        assert_eq!(https, "https://localhost:32768");
        assert_eq!(
            http.trim_start_matches("http://"),
            https.trim_start_matches("https://")
        );
    }

    #[test]
    fn ipv6_hosts_are_bracketed_once() {
        let host: Host = Host::Ipv6(Ipv6Addr::LOCALHOST);
        assert_eq!(
            endpoint_url(Scheme::Http, &host, 32768),
            "http://[::1]:32768"
        );

        let host: Host = Host::Ipv4(Ipv4Addr::LOCALHOST);
        assert_eq!(
            endpoint_url(Scheme::Https, &host, 8080),
            "https://127.0.0.1:8080"
        );
    }

    fn bucket_created() -> Regex {
        let Readiness::LogMatches(regex) = Readiness::bucket_created("demo").unwrap() else {
            unreachable!()
        };
        regex
    }

    #[tokio::test]
    async fn ready_line_on_stdout() {
        let stdout: &[u8] = b"starting mon\nstarting rgw\n2024-05-01 /opt/ceph-container/bin/demo: Bucket 's3://demo/' created\nmore\n";
        let stderr: &[u8] = b"";

        let line = wait_for_log_line(stdout, stderr, &bucket_created(), Duration::from_secs(5))
            .await
            .unwrap();

        assert!(line.ends_with("Bucket 's3://demo/' created"));
    }

    #[tokio::test]
    async fn ready_line_on_stderr_while_stdout_stays_open() {
        // Keeping the writer alive means stdout never ends
        let (_stdout_writer, stdout_reader) = duplex(64);
        let stderr: &[u8] = b"noise\nBucket 's3://demo/' created\n";

        let line = wait_for_log_line(
            BufReader::new(stdout_reader),
            stderr,
            &bucket_created(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(line, "Bucket 's3://demo/' created");
    }

    #[tokio::test]
    async fn ready_line_arrives_late() {
        let (mut writer, reader) = duplex(256);
        let stderr: &[u8] = b"";

        tokio::spawn(async move {
            writer.write_all(b"starting\n").await.unwrap();
            tokio::time::sleep(Duration::from_millis(20)).await;
            writer
                .write_all(b"Bucket 's3://demo/' created\n")
                .await
                .unwrap();
        });

        let line = wait_for_log_line(
            BufReader::new(reader),
            stderr,
            &bucket_created(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();

        assert_eq!(line, "Bucket 's3://demo/' created");
    }

    #[tokio::test]
    async fn closed_streams_without_match() {
        let stdout: &[u8] = b"Bucket 's3://other/' created\n";
        let stderr: &[u8] = b"error\n";

        let result =
            wait_for_log_line(stdout, stderr, &bucket_created(), Duration::from_secs(5)).await;

        assert!(matches!(result, Err(Error::LogStreamClosed { .. })));
    }

    #[tokio::test]
    async fn mismatched_bucket_times_out() {
        let (mut writer, reader) = duplex(256);
        let (_stderr_writer, stderr) = duplex(64);
        writer
            .write_all(b"Bucket 's3://other/' created\n")
            .await
            .unwrap();

        let timeout = Duration::from_millis(50);
        let result = wait_for_log_line(
            BufReader::new(reader),
            BufReader::new(stderr),
            &bucket_created(),
            timeout,
        )
        .await;

        match result {
            Err(Error::StartupTimeout {
                pattern,
                timeout: reported,
            }) => {
                assert_eq!(pattern, "Bucket 's3://demo/' created");
                assert_eq!(reported, timeout);
            }
            other => panic!("expected a startup timeout, got {other:?}"),
        }

        drop(writer);
    }
}
