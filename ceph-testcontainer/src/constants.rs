/// Unique identifier of the demo user created by the image on startup
pub const ENV_DEMO_UID: &str = "CEPH_DEMO_UID";

/// Bucket created by the demo user on startup
pub const ENV_DEMO_BUCKET: &str = "CEPH_DEMO_BUCKET";

/// S3 access key of the demo user
pub const ENV_DEMO_ACCESS_KEY: &str = "CEPH_DEMO_ACCESS_KEY";

/// S3 secret key of the demo user
pub const ENV_DEMO_SECRET_KEY: &str = "CEPH_DEMO_SECRET_KEY";

/// CIDR of the network the Ceph daemons bind to
pub const ENV_PUBLIC_NETWORK: &str = "CEPH_PUBLIC_NETWORK";

/// Address of the monitor daemon
pub const ENV_MONITOR_IP: &str = "MON_IP";

/// Hostname of the RADOS gateway
pub const ENV_RGW_NAME: &str = "RGW_NAME";

/// All the environment keys a default launch sets, in the order they are inserted.
pub const DEMO_ENV_KEYS: [&str; 7] = [
    ENV_DEMO_UID,
    ENV_DEMO_BUCKET,
    ENV_DEMO_ACCESS_KEY,
    ENV_DEMO_SECRET_KEY,
    ENV_PUBLIC_NETWORK,
    ENV_MONITOR_IP,
    ENV_RGW_NAME,
];

/// The script the demo image runs on startup. Overridden entrypoints must still call it.
pub const DEMO_SCRIPT: &str = "/opt/ceph-container/bin/demo";

/// The port used by the RADOS gateway (S3 API) within the Docker network.
/// On the host the port will be randomized and can be retrieved using
/// `container.get_host_port_ipv4(PORT)`
pub const RGW_PORT: u16 = 8080;

/// The port used by the Ceph monitor within the Docker network.
pub const MONITOR_PORT: u16 = 3300;
