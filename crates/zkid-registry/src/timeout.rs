//! Bounded lookups.
//!
//! Wraps any [`VerificationKeySource`] so each lookup is cancelled after a
//! fixed duration. There is no retry: a timed-out lookup fails the
//! sub-circuit being formatted.

use std::time::Duration;

use crate::error::RegistryError;
use crate::source::{PackagedCircuit, VerificationKeySource};

/// A key source whose lookups are bounded by `timeout`.
#[derive(Debug, Clone)]
pub struct TimeoutSource<S> {
    inner: S,
    timeout: Duration,
}

impl<S: VerificationKeySource> TimeoutSource<S> {
    /// Bound every lookup on `inner` by `timeout`.
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// The wrapped source.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The per-lookup budget.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Shorthand for [`TimeoutSource::new`].
pub fn with_timeout<S: VerificationKeySource>(inner: S, timeout: Duration) -> TimeoutSource<S> {
    TimeoutSource::new(inner, timeout)
}

impl<S: VerificationKeySource> VerificationKeySource for TimeoutSource<S> {
    async fn fetch_verification_key(
        &self,
        name: &str,
        version: &str,
    ) -> Result<PackagedCircuit, RegistryError> {
        match tokio::time::timeout(self.timeout, self.inner.fetch_verification_key(name, version))
            .await
        {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    source = self.inner.source_name(),
                    name,
                    version,
                    timeout = ?self.timeout,
                    "verification key lookup timed out"
                );
                Err(RegistryError::Timeout {
                    name: name.to_string(),
                    version: version.to_string(),
                    elapsed: self.timeout,
                })
            }
        }
    }

    fn source_name(&self) -> &str {
        self.inner.source_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::StaticKeySource;

    struct StalledSource;

    impl VerificationKeySource for StalledSource {
        async fn fetch_verification_key(
            &self,
            _name: &str,
            _version: &str,
        ) -> Result<PackagedCircuit, RegistryError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            unreachable!("the lookup is always cancelled first")
        }

        fn source_name(&self) -> &str {
            "StalledSource"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn stalled_lookup_times_out() {
        let src = with_timeout(StalledSource, Duration::from_millis(250));
        let err = src.fetch_verification_key("dsc_check", "0.5.0").await.unwrap_err();
        match err {
            RegistryError::Timeout { name, elapsed, .. } => {
                assert_eq!(name, "dsc_check");
                assert_eq!(elapsed, Duration::from_millis(250));
            }
            other => panic!("expected Timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn fast_lookup_passes_through() {
        let src = with_timeout(
            StaticKeySource::new().with_key("dsc_check", "AAAA"),
            Duration::from_secs(1),
        );
        assert_eq!(src.source_name(), "StaticKeySource");
        let pc = src.fetch_verification_key("dsc_check", "0.5.0").await.unwrap();
        assert_eq!(pc.vkey, "AAAA");
    }
}
