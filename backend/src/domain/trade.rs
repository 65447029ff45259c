//! Trade proposals and the per-trader trade log.
//!
//! A proposal is a permanent log entry. It is recorded twice: once on the
//! proposer as a `proposed` entry and once on the counterparty as a
//! `requests` entry with the roles and cards swapped. Both copies share one
//! timestamp.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::card::CardId;
use super::trader::UserId;

/// Maximum length of a proposal message, in characters.
pub const TRADE_MESSAGE_MAX: usize = 500;

/// Validation errors raised when building a proposal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TradeProposalValidationError {
    /// Proposer and counterparty are the same trader.
    #[error("cannot propose a trade to yourself")]
    SelfTrade,
    /// Message exceeded [`TRADE_MESSAGE_MAX`].
    #[error("message must be at most {TRADE_MESSAGE_MAX} characters")]
    MessageTooLong,
}

/// Free-text note attached to a proposal. Trimmed; may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TradeMessage(String);

impl TradeMessage {
    /// Trim and validate a message.
    pub fn new(message: impl AsRef<str>) -> Result<Self, TradeProposalValidationError> {
        let trimmed = message.as_ref().trim();
        if trimmed.chars().count() > TRADE_MESSAGE_MAX {
            return Err(TradeProposalValidationError::MessageTooLong);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the message.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for TradeMessage {
    type Error = TradeProposalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TradeMessage> for String {
    fn from(value: TradeMessage) -> Self {
        value.0
    }
}

/// Which side of a proposal a log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeDirection {
    /// Sent by the log owner.
    Proposed,
    /// Received by the log owner.
    Requested,
}

impl TradeDirection {
    /// Stable label used by storage adapters.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Proposed => "proposed",
            Self::Requested => "requested",
        }
    }

    /// Parse a storage label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "proposed" => Some(Self::Proposed),
            "requested" => Some(Self::Requested),
            _ => None,
        }
    }
}

/// A trade proposal from one trader to another.
///
/// # Examples
/// ```
/// use chrono::Utc;
/// use tradepost::domain::{CardId, TradeMessage, TradeProposal, UserId};
///
/// let proposal = TradeProposal::new(
///     UserId::new("alice").unwrap(),
///     UserId::new("bob").unwrap(),
///     CardId::parse("genetic-apex-a1-1").unwrap(),
///     CardId::parse("genetic-apex-a1-2").unwrap(),
///     TradeMessage::new("hi").unwrap(),
///     Utc::now(),
/// )
/// .unwrap();
/// let request = proposal.request_entry();
/// assert_eq!(request.friend_id.as_str(), "alice");
/// assert_eq!(request.card_to_trade.as_str(), "genetic-apex-a1-2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeProposal {
    proposer: UserId,
    counterparty: UserId,
    offered: CardId,
    requested: CardId,
    message: TradeMessage,
    created_at: DateTime<Utc>,
}

impl TradeProposal {
    /// Build a proposal, rejecting proposals addressed to the proposer.
    pub fn new(
        proposer: UserId,
        counterparty: UserId,
        offered: CardId,
        requested: CardId,
        message: TradeMessage,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TradeProposalValidationError> {
        if proposer == counterparty {
            return Err(TradeProposalValidationError::SelfTrade);
        }
        Ok(Self {
            proposer,
            counterparty,
            offered,
            requested,
            message,
            created_at,
        })
    }

    /// Trader sending the proposal.
    #[must_use]
    pub fn proposer(&self) -> &UserId {
        &self.proposer
    }

    /// Trader receiving the proposal.
    #[must_use]
    pub fn counterparty(&self) -> &UserId {
        &self.counterparty
    }

    /// Creation timestamp shared by both log entries.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Entry appended to the proposer's `proposed` list.
    #[must_use]
    pub fn proposed_entry(&self) -> TradeEntry {
        TradeEntry {
            friend_id: self.counterparty.clone(),
            card_to_trade: self.offered.clone(),
            card_to_receive: self.requested.clone(),
            message: self.message.clone(),
            timestamp: self.created_at,
        }
    }

    /// Mirrored entry appended to the counterparty's `requests` list.
    #[must_use]
    pub fn request_entry(&self) -> TradeEntry {
        TradeEntry {
            friend_id: self.proposer.clone(),
            card_to_trade: self.requested.clone(),
            card_to_receive: self.offered.clone(),
            message: self.message.clone(),
            timestamp: self.created_at,
        }
    }
}

/// One trade log entry, from the perspective of the log owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeEntry {
    /// The other trader.
    pub friend_id: UserId,
    /// Card the log owner gives.
    pub card_to_trade: CardId,
    /// Card the log owner receives.
    pub card_to_receive: CardId,
    /// Message attached by the proposer.
    pub message: TradeMessage,
    /// Proposal creation time.
    pub timestamp: DateTime<Utc>,
}

/// All trade entries for one trader, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TradeLog {
    /// Proposals the trader sent.
    pub proposed: Vec<TradeEntry>,
    /// Proposals the trader received.
    pub requests: Vec<TradeEntry>,
}

impl TradeLog {
    /// Append `entry` to the list selected by `direction`.
    pub fn push(&mut self, direction: TradeDirection, entry: TradeEntry) {
        match direction {
            TradeDirection::Proposed => self.proposed.push(entry),
            TradeDirection::Requested => self.requests.push(entry),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    fn user(raw: &str) -> UserId {
        UserId::new(raw).expect("user id")
    }

    fn card(raw: &str) -> CardId {
        CardId::parse(raw).expect("card id")
    }

    #[fixture]
    fn proposal() -> TradeProposal {
        TradeProposal::new(
            user("alice"),
            user("bob"),
            card("genetic-apex-a1-1"),
            card("mythical-islands-a2-7"),
            TradeMessage::new("  swap?  ").expect("message"),
            Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).single().expect("timestamp"),
        )
        .expect("proposal")
    }

    #[rstest]
    fn entries_mirror_each_other(proposal: TradeProposal) {
        let proposed = proposal.proposed_entry();
        let request = proposal.request_entry();

        assert_eq!(proposed.friend_id, user("bob"));
        assert_eq!(request.friend_id, user("alice"));
        assert_eq!(proposed.card_to_trade, request.card_to_receive);
        assert_eq!(proposed.card_to_receive, request.card_to_trade);
        assert_eq!(proposed.timestamp, request.timestamp);
        assert_eq!(proposed.message.as_str(), "swap?");
    }

    #[rstest]
    fn rejects_self_trade() {
        let result = TradeProposal::new(
            user("alice"),
            user("alice"),
            card("genetic-apex-a1-1"),
            card("genetic-apex-a1-2"),
            TradeMessage::default(),
            Utc::now(),
        );
        assert_eq!(result, Err(TradeProposalValidationError::SelfTrade));
    }

    #[rstest]
    #[case(TRADE_MESSAGE_MAX, true)]
    #[case(TRADE_MESSAGE_MAX + 1, false)]
    fn caps_message_length(#[case] length: usize, #[case] accepted: bool) {
        assert_eq!(TradeMessage::new("x".repeat(length)).is_ok(), accepted);
    }

    #[rstest]
    #[case("proposed", Some(TradeDirection::Proposed))]
    #[case("requested", Some(TradeDirection::Requested))]
    #[case("accepted", None)]
    fn parses_direction_labels(#[case] label: &str, #[case] expected: Option<TradeDirection>) {
        assert_eq!(TradeDirection::from_label(label), expected);
    }
}
