//! Timeout and retry wrapper around any directory.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use wsso_core::config::DirectoryConfig;
use wsso_core::traits::{Directory, DirectoryError, IdentitySummary, NewIdentity};

/// How directory calls are bounded and retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Upper bound for a single attempt.
    pub timeout: Duration,
    /// Extra attempts after the first for retryable failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubled for each one after.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Builds the policy from directory configuration.
    pub fn from_config(config: &DirectoryConfig) -> Self {
        Self {
            timeout: Duration::from_millis(config.timeout_ms),
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
        }
    }

    /// Backoff before retry number `attempt` (1-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

/// Wraps a directory so every call is time-bounded.
///
/// Idempotent reads (bind, group lookups, listing) are retried with
/// exponential backoff on `Unavailable` and `Timeout`. Writes are never
/// retried, since a timed-out write may still have been applied.
#[derive(Debug)]
pub struct ResilientDirectory<D> {
    inner: D,
    policy: RetryPolicy,
}

impl<D: Directory> ResilientDirectory<D> {
    /// Wraps `inner` with the given policy.
    pub fn new(inner: D, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    /// The wrapped directory.
    pub fn inner(&self) -> &D {
        &self.inner
    }

    async fn bounded<T, Fut>(&self, op: &'static str, call: Fut) -> Result<T, DirectoryError>
    where
        Fut: Future<Output = Result<T, DirectoryError>>,
    {
        match tokio::time::timeout(self.policy.timeout, call).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    op,
                    timeout_ms = self.policy.timeout.as_millis() as u64,
                    "Directory call timed out"
                );
                Err(DirectoryError::Timeout)
            }
        }
    }

    async fn retrying<T, F, Fut>(&self, op: &'static str, mut call: F) -> Result<T, DirectoryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DirectoryError>>,
    {
        let mut attempt = 0;
        loop {
            match self.bounded(op, call()).await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_retryable() && attempt < self.policy.max_retries => {
                    attempt += 1;
                    let delay = self.policy.delay_for(attempt);
                    warn!(
                        op,
                        attempt,
                        max = self.policy.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        detail = e.detail().unwrap_or_default(),
                        "Retrying directory call"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

#[async_trait]
impl<D: Directory> Directory for ResilientDirectory<D> {
    async fn bind(&self, username: &str, password: &str) -> Result<(), DirectoryError> {
        self.retrying("bind", || self.inner.bind(username, password))
            .await
    }

    async fn group_membership(&self, username: &str) -> Result<Vec<String>, DirectoryError> {
        self.retrying("group_membership", || self.inner.group_membership(username))
            .await
    }

    async fn is_member_of(&self, username: &str, group: &str) -> Result<bool, DirectoryError> {
        self.retrying("is_member_of", || self.inner.is_member_of(username, group))
            .await
    }

    async fn register(&self, identity: NewIdentity) -> Result<(), DirectoryError> {
        self.bounded("register", self.inner.register(identity)).await
    }

    async fn list_identities(
        &self,
        manager_password: &str,
    ) -> Result<Vec<IdentitySummary>, DirectoryError> {
        self.retrying("list_identities", || {
            self.inner.list_identities(manager_password)
        })
        .await
    }

    async fn delete_identity(
        &self,
        username: &str,
        manager_password: &str,
    ) -> Result<String, DirectoryError> {
        self.bounded(
            "delete_identity",
            self.inner.delete_identity(username, manager_password),
        )
        .await
    }
}
