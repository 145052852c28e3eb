//! Launches the Ceph demo image (a single node cluster with a RADOS gateway)
//! as a test container and exposes its S3 credentials and endpoints.
//!
//! ```no_run
//! # async fn example() -> ceph_testcontainer::Result<()> {
//! use ceph_testcontainer::{options::with_bucket, LaunchBuilder};
//!
//! let ceph = LaunchBuilder::default()
//!     .with(with_bucket("fixtures"))
//!     .start()
//!     .await?;
//!
//! let endpoint = ceph.http_url().await?;
//! println!("{endpoint} {} {}", ceph.access_key(), ceph.secret_key());
//!
//! ceph.terminate().await?;
//! # Ok(())
//! # }
//! ```
pub mod constants;
pub mod containers;
pub mod defaults;
mod error;
pub mod images;
pub mod must;
pub mod options;
pub mod request;

pub use containers::{run_container, start_ceph, CephContainer, Scheme};
pub use defaults::ConfigDefaults;
pub use error::{Error, Result};
pub use must::MustEndpoints;
pub use request::{Customization, LaunchBuilder, LaunchConfig, LaunchRequest, Readiness};
