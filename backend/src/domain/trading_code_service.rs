//! Trading code service.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{TraderRepository, TradingCodeCommand};
use crate::domain::trade_list_service::map_trader_error;
use crate::domain::{Error, TradingCode, UserId};

/// Trading code service implementing [`TradingCodeCommand`].
#[derive(Clone)]
pub struct TradingCodeService<T> {
    traders: Arc<T>,
}

impl<T> TradingCodeService<T> {
    /// Create a new service over the given repository.
    pub fn new(traders: Arc<T>) -> Self {
        Self { traders }
    }
}

#[async_trait]
impl<T> TradingCodeCommand for TradingCodeService<T>
where
    T: TraderRepository,
{
    async fn has_trading_code(&self, user_id: &UserId) -> Result<bool, Error> {
        let profile = self
            .traders
            .find(user_id)
            .await
            .map_err(map_trader_error)?;
        Ok(profile.is_some_and(|profile| profile.trading_code.is_some()))
    }

    async fn save_trading_code(&self, user_id: &UserId, code: &TradingCode) -> Result<(), Error> {
        self.traders
            .save_trading_code(user_id, code)
            .await
            .map_err(map_trader_error)?;
        info!(%user_id, "trading code saved");
        Ok(())
    }
}
