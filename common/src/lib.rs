//! The `common` crate provides the pieces shared by the Ceph test container
//! tooling: tracing setup, CLI argument groups and an S3 client for talking to
//! the gateway from tests.

pub mod aws;
pub mod clap;
pub mod tracing;
