mod ceph;

pub use self::ceph::{CephDemo, CephDemoArgs};
