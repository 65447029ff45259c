//! Driving port for identity-provider lifecycle events.

use async_trait::async_trait;

use crate::domain::{Error, IdentityEvent, IdentitySyncOutcome};

/// Domain use-case port applying verified identity events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentitySyncCommand: Send + Sync {
    /// Apply one event. Callers must verify the event's origin first.
    async fn apply(&self, event: IdentityEvent) -> Result<IdentitySyncOutcome, Error>;
}
