//! Offered-card list and wishlist HTTP handlers.
//!
//! ```text
//! GET    /api/v1/users/me/cards-for-trade
//! POST   /api/v1/users/me/cards-for-trade {"cardId":"genetic-apex-a1-1"}
//! DELETE /api/v1/users/me/cards-for-trade {"cardId":"genetic-apex-a1-1"}
//! GET    /api/v1/users/me/wishlist
//! POST   /api/v1/users/me/wishlist {"cardId":"genetic-apex-a1-1"}
//! DELETE /api/v1/users/me/wishlist {"cardId":"genetic-apex-a1-1"}
//! ```
//!
//! Every mutation answers with the caller's list after the change.

use actix_web::{delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{CardId, ListAction, TradeList, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Caller;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_card_id};

const CARD_ID: FieldName = FieldName::new("cardId");

/// Request body naming one card.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardIdRequest {
    #[schema(example = "genetic-apex-a1-1")]
    pub card_id: Option<String>,
}

/// The caller's offered cards.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardsForTradeResponse {
    pub cards_for_trade: Vec<String>,
}

/// The caller's wishlist.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct WishlistResponse {
    pub wishlist: Vec<String>,
}

fn to_strings(cards: Vec<CardId>) -> Vec<String> {
    cards.into_iter().map(String::from).collect()
}

async fn read_list(state: &HttpState, user: &UserId, list: TradeList) -> ApiResult<Vec<String>> {
    let cards = state.trade_lists_query.list(user, list).await?;
    Ok(to_strings(cards))
}

async fn change_list(
    state: &HttpState,
    user: &UserId,
    list: TradeList,
    action: ListAction,
    payload: CardIdRequest,
) -> ApiResult<Vec<String>> {
    let card_id = parse_card_id(payload.card_id, CARD_ID)?;
    let cards = state
        .trade_lists
        .change(user, list, action, &card_id)
        .await?;
    Ok(to_strings(cards))
}

/// The caller's offered cards.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/cards-for-trade",
    responses(
        (status = 200, description = "Offered cards", body = CardsForTradeResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trade-lists"],
    operation_id = "getCardsForTrade"
)]
#[get("/users/me/cards-for-trade")]
pub async fn get_cards_for_trade(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<CardsForTradeResponse>> {
    let cards_for_trade = read_list(&state, caller.user_id(), TradeList::ForTrade).await?;
    Ok(web::Json(CardsForTradeResponse { cards_for_trade }))
}

/// Offer a card for trade.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/cards-for-trade",
    request_body = CardIdRequest,
    responses(
        (status = 200, description = "Offered cards after the change", body = CardsForTradeResponse),
        (status = 400, description = "Invalid card ID or no trading code", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trade-lists"],
    operation_id = "markCardForTrade"
)]
#[post("/users/me/cards-for-trade")]
pub async fn mark_for_trade(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CardIdRequest>,
) -> ApiResult<web::Json<CardsForTradeResponse>> {
    let cards_for_trade = change_list(
        &state,
        caller.user_id(),
        TradeList::ForTrade,
        ListAction::Add,
        payload.into_inner(),
    )
    .await?;
    Ok(web::Json(CardsForTradeResponse { cards_for_trade }))
}

/// Withdraw a card from trade.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/cards-for-trade",
    request_body = CardIdRequest,
    responses(
        (status = 200, description = "Offered cards after the change", body = CardsForTradeResponse),
        (status = 400, description = "Invalid card ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trade-lists"],
    operation_id = "unmarkCardForTrade"
)]
#[delete("/users/me/cards-for-trade")]
pub async fn unmark_for_trade(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CardIdRequest>,
) -> ApiResult<web::Json<CardsForTradeResponse>> {
    let cards_for_trade = change_list(
        &state,
        caller.user_id(),
        TradeList::ForTrade,
        ListAction::Remove,
        payload.into_inner(),
    )
    .await?;
    Ok(web::Json(CardsForTradeResponse { cards_for_trade }))
}

/// The caller's wishlist.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/wishlist",
    responses(
        (status = 200, description = "Wishlist", body = WishlistResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trade-lists"],
    operation_id = "getWishlist"
)]
#[get("/users/me/wishlist")]
pub async fn get_wishlist(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<WishlistResponse>> {
    let wishlist = read_list(&state, caller.user_id(), TradeList::Wishlist).await?;
    Ok(web::Json(WishlistResponse { wishlist }))
}

/// Add a card to the wishlist.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/wishlist",
    request_body = CardIdRequest,
    responses(
        (status = 200, description = "Wishlist after the change", body = WishlistResponse),
        (status = 400, description = "Invalid card ID or no trading code", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trade-lists"],
    operation_id = "addToWishlist"
)]
#[post("/users/me/wishlist")]
pub async fn add_to_wishlist(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CardIdRequest>,
) -> ApiResult<web::Json<WishlistResponse>> {
    let wishlist = change_list(
        &state,
        caller.user_id(),
        TradeList::Wishlist,
        ListAction::Add,
        payload.into_inner(),
    )
    .await?;
    Ok(web::Json(WishlistResponse { wishlist }))
}

/// Remove a card from the wishlist.
#[utoipa::path(
    delete,
    path = "/api/v1/users/me/wishlist",
    request_body = CardIdRequest,
    responses(
        (status = 200, description = "Wishlist after the change", body = WishlistResponse),
        (status = 400, description = "Invalid card ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "User not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["trade-lists"],
    operation_id = "removeFromWishlist"
)]
#[delete("/users/me/wishlist")]
pub async fn remove_from_wishlist(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<CardIdRequest>,
) -> ApiResult<web::Json<WishlistResponse>> {
    let wishlist = change_list(
        &state,
        caller.user_id(),
        TradeList::Wishlist,
        ListAction::Remove,
        payload.into_inner(),
    )
    .await?;
    Ok(web::Json(WishlistResponse { wishlist }))
}
