//! Trader identity and profile.
//!
//! A trader is a user record owned by the external identity provider. The
//! provider issues opaque string identifiers, so [`UserId`] only enforces
//! shape, never a particular encoding.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::card::CardId;
use super::membership::{ListAction, TradeList, apply_list_action};

/// Maximum accepted length of an identity-provider user id.
pub const USER_ID_MAX: usize = 128;

/// Validation errors raised by trader primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TraderValidationError {
    /// User id was empty.
    #[error("user id must not be empty")]
    EmptyUserId,
    /// User id contained whitespace or was too long.
    #[error("user id must be at most {USER_ID_MAX} characters without whitespace")]
    InvalidUserId,
    /// Trading code did not match `XXXX-XXXX-XXXX-XXXX`.
    #[error("Invalid trading code format. Please use format: XXXX-XXXX-XXXX-XXXX")]
    InvalidTradingCode,
}

/// Identity-provider user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Validate and construct a [`UserId`].
    ///
    /// # Examples
    /// ```
    /// use tradepost::domain::UserId;
    ///
    /// let id = UserId::new("user_2abc").expect("valid id");
    /// assert_eq!(id.as_str(), "user_2abc");
    /// assert!(UserId::new("has space").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, TraderValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(TraderValidationError::EmptyUserId);
        }
        if id.chars().count() > USER_ID_MAX || id.chars().any(char::is_whitespace) {
            return Err(TraderValidationError::InvalidUserId);
        }
        Ok(Self(id))
    }

    /// Borrow the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for UserId {
    type Error = TraderValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0
    }
}

static TRADING_CODE_RE: OnceLock<Regex> = OnceLock::new();

fn trading_code_regex() -> &'static Regex {
    TRADING_CODE_RE.get_or_init(|| {
        Regex::new(r"^[0-9]{4}-[0-9]{4}-[0-9]{4}-[0-9]{4}$")
            .unwrap_or_else(|error| panic!("trading code regex failed to compile: {error}"))
    })
}

/// In-game friend code shared with trade partners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradingCode(String);

impl TradingCode {
    /// Validate a trading code of the form `XXXX-XXXX-XXXX-XXXX` (digits).
    ///
    /// # Examples
    /// ```
    /// use tradepost::domain::TradingCode;
    ///
    /// assert!(TradingCode::new("1234-5678-9012-3456").is_ok());
    /// assert!(TradingCode::new("1234567890123456").is_err());
    /// ```
    pub fn new(code: impl Into<String>) -> Result<Self, TraderValidationError> {
        let code = code.into();
        if trading_code_regex().is_match(&code) {
            Ok(Self(code))
        } else {
            Err(TraderValidationError::InvalidTradingCode)
        }
    }

    /// Borrow the code.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TradingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TradingCode {
    type Error = TraderValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TradingCode> for String {
    fn from(value: TradingCode) -> Self {
        value.0
    }
}

/// Reasons a membership change is refused by the trader profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MembershipRejection {
    /// Adding to a list requires the trader to have shared a trading code.
    #[error("Trading code required to trade")]
    TradingCodeRequired,
}

/// Trader record: the owning side of the trade bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraderProfile {
    /// Owning identity.
    pub id: UserId,
    /// Trading code, absent until the trader saves one.
    pub trading_code: Option<TradingCode>,
    /// Cards offered for trade, unique and in insertion order.
    pub cards_for_trade: Vec<CardId>,
    /// Cards wanted, unique and in insertion order.
    pub wishlist: Vec<CardId>,
}

impl TraderProfile {
    /// Fresh profile as created by the identity webhook.
    #[must_use]
    pub fn empty(id: UserId) -> Self {
        Self {
            id,
            trading_code: None,
            cards_for_trade: Vec::new(),
            wishlist: Vec::new(),
        }
    }

    /// Borrow the list selected by `list`.
    #[must_use]
    pub fn list(&self, list: TradeList) -> &[CardId] {
        match list {
            TradeList::ForTrade => &self.cards_for_trade,
            TradeList::Wishlist => &self.wishlist,
        }
    }

    fn list_mut(&mut self, list: TradeList) -> &mut Vec<CardId> {
        match list {
            TradeList::ForTrade => &mut self.cards_for_trade,
            TradeList::Wishlist => &mut self.wishlist,
        }
    }

    /// Whether `card` is on `list`.
    #[must_use]
    pub fn contains(&self, list: TradeList, card: &CardId) -> bool {
        self.list(list).contains(card)
    }

    /// Apply a membership change to this profile.
    ///
    /// Returns whether the list changed. Additions require a trading code;
    /// removals never do.
    ///
    /// # Errors
    /// [`MembershipRejection::TradingCodeRequired`] when adding without a code.
    pub fn apply_membership(
        &mut self,
        list: TradeList,
        action: ListAction,
        card: &CardId,
    ) -> Result<bool, MembershipRejection> {
        if action == ListAction::Add && self.trading_code.is_none() {
            return Err(MembershipRejection::TradingCodeRequired);
        }
        Ok(apply_list_action(self.list_mut(list), action, card))
    }
}
