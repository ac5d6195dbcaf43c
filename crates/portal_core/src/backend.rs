use std::{ops::Range, sync::Arc, time::Duration};

use anyhow::Result;
use async_trait::async_trait;
use shared::domain::{Credential, LoginAttempt};
use thiserror::Error;
use tracing::debug;

use crate::timing::DelaySource;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("login backend unavailable: {reason}")]
    Unavailable { reason: String },
}

/// The network leg of a login. Resolves once the "server" has answered.
#[async_trait]
pub trait LoginBackend: Send + Sync {
    async fn round_trip(&self) -> Result<()>;
}

/// Waits a random delay from the configured range, like a slow server.
pub struct SimulatedBackend {
    delays: Arc<dyn DelaySource>,
    delay_range: Range<Duration>,
}

impl SimulatedBackend {
    pub fn new(delays: Arc<dyn DelaySource>, delay_range: Range<Duration>) -> Self {
        Self {
            delays,
            delay_range,
        }
    }
}

#[async_trait]
impl LoginBackend for SimulatedBackend {
    async fn round_trip(&self) -> Result<()> {
        let delay = self.delays.login_delay(self.delay_range.clone());
        debug!(delay_ms = delay.as_millis() as u64, "simulating login round trip");
        tokio::time::sleep(delay).await;
        Ok(())
    }
}

pub struct UnavailableBackend {
    reason: String,
}

impl UnavailableBackend {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl LoginBackend for UnavailableBackend {
    async fn round_trip(&self) -> Result<()> {
        Err(BackendError::Unavailable {
            reason: self.reason.clone(),
        }
        .into())
    }
}

/// The allow-list logins are matched against.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    pub fn matches(&self, attempt: &LoginAttempt) -> bool {
        self.credentials.iter().any(|credential| attempt.matches(credential))
    }

    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::Settings, timing::FixedDelays};

    #[test]
    fn store_needs_a_complete_tuple_match() {
        let store = CredentialStore::new(Settings::default().credentials);
        assert_eq!(store.len(), 3);

        assert!(store.matches(&LoginAttempt::new("student", "2021001234", "010-1234-5678")));
        // every field belongs to some credential, but not the same one
        assert!(!store.matches(&LoginAttempt::new("admin", "2021001234", "010-9999-8888")));
        let admin = LoginAttempt::new("admin", "1234", "010-0000-0000");
        assert!(!CredentialStore::default().matches(&admin));
    }

    #[tokio::test(start_paused = true)]
    async fn simulated_round_trip_waits_for_the_drawn_delay() {
        let backend = SimulatedBackend::new(
            Arc::new(FixedDelays {
                login_delay: Duration::from_millis(1800),
                drift: 0.0,
            }),
            Duration::from_millis(1500)..Duration::from_millis(2500),
        );

        let started = tokio::time::Instant::now();
        backend.round_trip().await.expect("round trip");
        assert!(started.elapsed() >= Duration::from_millis(1800));
    }

    #[tokio::test]
    async fn unavailable_backend_reports_its_reason() {
        let err = UnavailableBackend::new("maintenance")
            .round_trip()
            .await
            .expect_err("unavailable");
        assert!(err.to_string().contains("maintenance"));
    }
}
