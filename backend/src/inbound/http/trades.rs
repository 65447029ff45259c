//! Trade proposal HTTP handlers.
//!
//! ```text
//! GET  /api/v1/users/me/trades
//! POST /api/v1/users/me/trades {"friendId":"user_2","cardToTrade":"genetic-apex-a1-1",
//!                               "cardToReceive":"genetic-apex-a1-2","message":"hi"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ProposeTradeRequest, ResolvedTradeEntry, ResolvedTradeLog};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Caller;
use crate::inbound::http::schemas::{CardBody, ErrorSchema, SuccessBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_card_id, parse_message, parse_user_id};

/// Request body for proposing a trade.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProposeTradeBody {
    #[schema(example = "user_2abc")]
    pub friend_id: Option<String>,
    #[schema(example = "genetic-apex-a1-1")]
    pub card_to_trade: Option<String>,
    #[schema(example = "genetic-apex-a1-2")]
    pub card_to_receive: Option<String>,
    pub message: Option<String>,
}

/// One trade log entry with both cards resolved.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeView {
    pub friend_id: String,
    pub card_to_trade: CardBody,
    pub card_to_receive: CardBody,
    pub message: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
}

impl From<ResolvedTradeEntry> for TradeView {
    fn from(entry: ResolvedTradeEntry) -> Self {
        Self {
            friend_id: entry.friend_id.to_string(),
            card_to_trade: CardBody::from(entry.card_to_trade),
            card_to_receive: CardBody::from(entry.card_to_receive),
            message: entry.message.as_str().to_owned(),
            timestamp: entry.timestamp.to_rfc3339(),
        }
    }
}

/// The caller's sent and received proposals.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TradesResponse {
    pub proposed: Vec<TradeView>,
    pub requests: Vec<TradeView>,
}

impl From<ResolvedTradeLog> for TradesResponse {
    fn from(log: ResolvedTradeLog) -> Self {
        Self {
            proposed: log.proposed.into_iter().map(TradeView::from).collect(),
            requests: log.requests.into_iter().map(TradeView::from).collect(),
        }
    }
}

fn parse_proposal(caller: Caller, body: ProposeTradeBody) -> ApiResult<ProposeTradeRequest> {
    Ok(ProposeTradeRequest {
        counterparty: parse_user_id(body.friend_id, FieldName::new("friendId"))?,
        card_to_trade: parse_card_id(body.card_to_trade, FieldName::new("cardToTrade"))?,
        card_to_receive: parse_card_id(body.card_to_receive, FieldName::new("cardToReceive"))?,
        message: parse_message(body.message, FieldName::new("message"))?,
        proposer: caller.0,
    })
}

/// The caller's trade log.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/trades",
    responses(
        (status = 200, description = "Trade log", body = TradesResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trades"],
    operation_id = "getTrades"
)]
#[get("/users/me/trades")]
pub async fn get_trades(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<TradesResponse>> {
    let log = state.trades_query.trades(caller.user_id()).await?;
    Ok(web::Json(TradesResponse::from(log)))
}

/// Propose a trade to another trader.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/trades",
    request_body = ProposeTradeBody,
    responses(
        (status = 200, description = "Proposal recorded", body = SuccessBody),
        (status = 400, description = "Invalid proposal", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User or card not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trades"],
    operation_id = "proposeTrade"
)]
#[post("/users/me/trades")]
pub async fn propose_trade(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<ProposeTradeBody>,
) -> ApiResult<web::Json<SuccessBody>> {
    let request = parse_proposal(caller, payload.into_inner())?;
    state.trades.propose(request).await?;
    Ok(web::Json(SuccessBody::OK))
}
