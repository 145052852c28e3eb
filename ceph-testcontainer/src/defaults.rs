use std::{
    fmt::{self, Display},
    time::Duration,
};

use crate::constants::{MONITOR_PORT, RGW_PORT};

const NAME: &str = "quay.io/ceph/demo";
const TAG: &str = "latest-quincy";

const DEFAULT_RGW_ACCESS_KEY: &str = "demo";
const DEFAULT_RGW_SECRET_KEY: &str = "b36361c4-1589-42f7-a369-d9dafb926d55";

const DEFAULT_UID: &str = "demo";
const DEFAULT_BUCKET: &str = "demo";

const DEFAULT_PUBLIC_NETWORK: &str = "0.0.0.0/0";
const DEFAULT_MONITOR_IP: &str = "127.0.0.1";
const DEFAULT_RGW_NAME: &str = "localhost";

const DEFAULT_STARTUP_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// A container-internal TCP port, written the way Docker does: `8080/tcp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExposedPort {
    pub port: u16,
}

impl ExposedPort {
    pub const fn tcp(port: u16) -> Self {
        Self { port }
    }
}

impl Display for ExposedPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/tcp", self.port)
    }
}

/// The values a launch starts from before any customization is applied.
///
/// `ConfigDefaults::default()` describes the upstream `quay.io/ceph/demo` image.
/// Tests which need a different starting point build their own value rather than
/// patching anything global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDefaults {
    pub image_name: String,
    pub image_tag: String,
    pub uid: String,
    pub bucket: String,
    pub access_key: String,
    pub secret_key: String,
    pub public_network: String,
    pub monitor_ip: String,
    pub rgw_name: String,
    pub rgw_port: ExposedPort,
    pub monitor_port: ExposedPort,
    pub startup_timeout: Duration,
}

impl Default for ConfigDefaults {
    fn default() -> Self {
        Self {
            image_name: NAME.to_owned(),
            image_tag: TAG.to_owned(),
            uid: DEFAULT_UID.to_owned(),
            bucket: DEFAULT_BUCKET.to_owned(),
            access_key: DEFAULT_RGW_ACCESS_KEY.to_owned(),
            secret_key: DEFAULT_RGW_SECRET_KEY.to_owned(),
            public_network: DEFAULT_PUBLIC_NETWORK.to_owned(),
            monitor_ip: DEFAULT_MONITOR_IP.to_owned(),
            rgw_name: DEFAULT_RGW_NAME.to_owned(),
            rgw_port: ExposedPort::tcp(RGW_PORT),
            monitor_port: ExposedPort::tcp(MONITOR_PORT),
            startup_timeout: DEFAULT_STARTUP_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ports_display_like_docker() {
        let defaults = ConfigDefaults::default();

        assert_eq!(defaults.rgw_port.to_string(), "8080/tcp");
        assert_eq!(defaults.monitor_port.to_string(), "3300/tcp");
        assert_eq!(defaults.startup_timeout, Duration::from_secs(300));
    }
}
