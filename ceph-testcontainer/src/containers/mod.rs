mod ceph;

pub use self::ceph::{run_container, start_ceph, CephContainer, Scheme};
