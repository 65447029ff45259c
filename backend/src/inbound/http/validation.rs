//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper returns an `invalid_request` domain error whose details carry
//! `{ field, code[, value] }` so clients can point at the offending input.

use serde_json::json;

use crate::domain::{CardId, CardNumber, Error, PackId, TradeMessage, TradingCode, UserId};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidCardId,
    InvalidTradingCode,
    InvalidUserId,
    InvalidMessage,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidCardId => "invalid_card_id",
            ErrorCode::InvalidTradingCode => "invalid_trading_code",
            ErrorCode::InvalidUserId => "invalid_user_id",
            ErrorCode::InvalidMessage => "invalid_message",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_card_id_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, "Invalid card ID").with_value(ErrorCode::InvalidCardId, value)
}

/// Parse a required card id body field.
pub(crate) fn parse_card_id(value: Option<String>, field: FieldName) -> Result<CardId, Error> {
    let raw = require(value, field)?;
    CardId::parse(&raw).map_err(|_| invalid_card_id_error(field, &raw))
}

/// Build a card id from the `{pack}/{number}` path segments.
pub(crate) fn card_id_from_path(pack: &str, number: &str) -> Result<CardId, Error> {
    let (pack, number) = parse_card_path(pack, number)?;
    Ok(CardId::from_parts(pack, number))
}

/// Validate the `{pack}/{number}` path segments.
pub(crate) fn parse_card_path(pack: &str, number: &str) -> Result<(PackId, CardNumber), Error> {
    let raw = format!("{pack}-{number}");
    let pack = PackId::new(pack)
        .map_err(|_| invalid_card_id_error(FieldName::new("pack"), &raw))?;
    let number = CardNumber::new(number)
        .map_err(|_| invalid_card_id_error(FieldName::new("number"), &raw))?;
    Ok((pack, number))
}

/// Parse a required trading code body field.
pub(crate) fn parse_trading_code(
    value: Option<String>,
    field: FieldName,
) -> Result<TradingCode, Error> {
    let raw = require(value, field)?;
    TradingCode::new(raw.clone()).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidTradingCode, raw)
    })
}

/// Parse a required user id body field.
pub(crate) fn parse_user_id(value: Option<String>, field: FieldName) -> Result<UserId, Error> {
    let raw = require(value, field)?;
    UserId::new(raw.clone()).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidUserId, raw)
    })
}

/// Parse an optional proposal message. Absent means empty.
pub(crate) fn parse_message(value: Option<String>, field: FieldName) -> Result<TradeMessage, Error> {
    TradeMessage::new(value.unwrap_or_default()).map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string()).with_code(ErrorCode::InvalidMessage)
    })
}
