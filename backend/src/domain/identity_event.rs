//! Identity-provider lifecycle events.

use super::trader::UserId;

/// Lifecycle event forwarded by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityEvent {
    /// A user signed up.
    Created(UserId),
    /// A user's provider-side profile changed. Nothing is stored locally.
    Updated(UserId),
    /// A user was removed from the provider.
    Deleted(UserId),
    /// Any other event type, acknowledged and ignored.
    Other {
        /// Provider event type, e.g. `session.created`.
        kind: String,
    },
}

impl IdentityEvent {
    /// Short label used in logs.
    #[must_use]
    pub fn kind(&self) -> &str {
        match self {
            Self::Created(_) => "created",
            Self::Updated(_) => "updated",
            Self::Deleted(_) => "deleted",
            Self::Other { kind } => kind.as_str(),
        }
    }
}

/// Effect of applying an identity event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySyncOutcome {
    /// A trader record was created.
    Created,
    /// A create event arrived for a trader that already exists.
    AlreadyPresent,
    /// A trader record was deleted.
    Deleted,
    /// A delete event arrived for an unknown trader.
    NotPresent,
    /// The event needs no local change.
    Ignored,
}
