//! Driving port for the trader's trading code.

use async_trait::async_trait;

use crate::domain::{Error, TradingCode, UserId};

/// Domain use-case port for reading and saving trading codes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TradingCodeCommand: Send + Sync {
    /// Whether the trader has saved a trading code.
    async fn has_trading_code(&self, user_id: &UserId) -> Result<bool, Error>;

    /// Save a trading code, creating the trader record when missing.
    async fn save_trading_code(&self, user_id: &UserId, code: &TradingCode) -> Result<(), Error>;
}
