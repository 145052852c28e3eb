//! Panicking variants of the endpoint accessors, for test setup code where a
//! container without a reachable gateway is an environment problem rather than
//! something to recover from. Prefer [`CephContainer::http_url`] and
//! [`CephContainer::https_url`] everywhere else.

use crate::containers::CephContainer;

#[allow(async_fn_in_trait)]
pub trait MustEndpoints {
    async fn must_http_url(&self) -> String;

    async fn must_https_url(&self) -> String;
}

impl MustEndpoints for CephContainer {
    async fn must_http_url(&self) -> String {
        self.http_url()
            .await
            .unwrap_or_else(|e| panic!("Get ceph HTTP endpoint: {e}"))
    }

    async fn must_https_url(&self) -> String {
        self.https_url()
            .await
            .unwrap_or_else(|e| panic!("Get ceph HTTPS endpoint: {e}"))
    }
}
