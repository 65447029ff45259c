//! Applies identity-provider lifecycle events to trader records.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::domain::ports::{IdentitySyncCommand, TraderRepository};
use crate::domain::trade_list_service::map_trader_error;
use crate::domain::{Error, IdentityEvent, IdentitySyncOutcome};

/// Identity sync service implementing [`IdentitySyncCommand`].
#[derive(Clone)]
pub struct IdentitySyncService<T> {
    traders: Arc<T>,
}

impl<T> IdentitySyncService<T> {
    /// Create a new service over the given repository.
    pub fn new(traders: Arc<T>) -> Self {
        Self { traders }
    }
}

#[async_trait]
impl<T> IdentitySyncCommand for IdentitySyncService<T>
where
    T: TraderRepository,
{
    async fn apply(&self, event: IdentityEvent) -> Result<IdentitySyncOutcome, Error> {
        match event {
            IdentityEvent::Created(user_id) => {
                let created = self
                    .traders
                    .create_if_absent(&user_id)
                    .await
                    .map_err(map_trader_error)?;
                if created {
                    info!(%user_id, "trader created from identity event");
                    Ok(IdentitySyncOutcome::Created)
                } else {
                    debug!(%user_id, "trader already present");
                    Ok(IdentitySyncOutcome::AlreadyPresent)
                }
            }
            IdentityEvent::Deleted(user_id) => {
                let deleted = self
                    .traders
                    .delete(&user_id)
                    .await
                    .map_err(map_trader_error)?;
                if deleted {
                    info!(%user_id, "trader deleted from identity event");
                    Ok(IdentitySyncOutcome::Deleted)
                } else {
                    debug!(%user_id, "delete event for unknown trader");
                    Ok(IdentitySyncOutcome::NotPresent)
                }
            }
            other => {
                debug!(kind = other.kind(), "identity event ignored");
                Ok(IdentitySyncOutcome::Ignored)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockTraderRepository, TraderRepositoryError};
    use crate::domain::{ErrorCode, UserId};
    use rstest::rstest;

    fn user() -> UserId {
        UserId::new("user_2abc").expect("user id")
    }

    #[rstest]
    #[case(true, IdentitySyncOutcome::Created)]
    #[case(false, IdentitySyncOutcome::AlreadyPresent)]
    #[tokio::test]
    async fn created_events_insert_once(
        #[case] inserted: bool,
        #[case] expected: IdentitySyncOutcome,
    ) {
        let mut repo = MockTraderRepository::new();
        repo.expect_create_if_absent()
            .withf(|id| id.as_str() == "user_2abc")
            .times(1)
            .return_once(move |_| Ok(inserted));

        let outcome = IdentitySyncService::new(Arc::new(repo))
            .apply(IdentityEvent::Created(user()))
            .await
            .expect("applied");
        assert_eq!(outcome, expected);
    }

    #[rstest]
    #[case(true, IdentitySyncOutcome::Deleted)]
    #[case(false, IdentitySyncOutcome::NotPresent)]
    #[tokio::test]
    async fn deleted_events_remove_trader(
        #[case] removed: bool,
        #[case] expected: IdentitySyncOutcome,
    ) {
        let mut repo = MockTraderRepository::new();
        repo.expect_delete()
            .times(1)
            .return_once(move |_| Ok(removed));

        let outcome = IdentitySyncService::new(Arc::new(repo))
            .apply(IdentityEvent::Deleted(user()))
            .await
            .expect("applied");
        assert_eq!(outcome, expected);
    }

    #[rstest]
    #[case(IdentityEvent::Updated(user()))]
    #[case(IdentityEvent::Other { kind: "session.created".to_owned() })]
    #[tokio::test]
    async fn other_events_touch_nothing(#[case] event: IdentityEvent) {
        let mut repo = MockTraderRepository::new();
        repo.expect_create_if_absent().never();
        repo.expect_delete().never();

        let outcome = IdentitySyncService::new(Arc::new(repo))
            .apply(event)
            .await
            .expect("applied");
        assert_eq!(outcome, IdentitySyncOutcome::Ignored);
    }

    #[tokio::test]
    async fn repository_failure_is_internal() {
        let mut repo = MockTraderRepository::new();
        repo.expect_create_if_absent()
            .times(1)
            .return_once(|_| Err(TraderRepositoryError::connection("pool closed")));

        let error = IdentitySyncService::new(Arc::new(repo))
            .apply(IdentityEvent::Created(user()))
            .await
            .expect_err("failure");
        assert_eq!(error.code(), ErrorCode::InternalError);
    }
}
