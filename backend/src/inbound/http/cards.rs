//! Card catalogue HTTP handlers.
//!
//! ```text
//! GET /api/v1/cards
//! GET /api/v1/cards/{pack}/{number}
//! GET /api/v1/cards/{pack}/{number}/traders
//! GET /api/v1/cards/{pack}/{number}/trade-status
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{CardTradeStatus, CardTraders, TraderSummary};
use crate::domain::{CardNumber, Error, PackId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Caller;
use crate::inbound::http::schemas::{CardBody, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::card_id_from_path;

/// Trader offering the card, with the cards they want in return.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OfferingTraderBody {
    pub user_id: String,
    pub trading_code: Option<String>,
    pub wishlist: Vec<String>,
}

/// Trader wanting the card, with the cards they offer.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WantingTraderBody {
    pub user_id: String,
    pub trading_code: Option<String>,
    pub cards_for_trade: Vec<String>,
}

/// `have` and `want` lists for one card.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardTraderLists {
    pub have: Vec<OfferingTraderBody>,
    pub want: Vec<WantingTraderBody>,
}

/// Response body for the card traders endpoint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CardTradersResponse {
    pub users: CardTraderLists,
}

fn card_strings(summary: &TraderSummary) -> Vec<String> {
    summary.cards.iter().map(ToString::to_string).collect()
}

impl From<CardTraders> for CardTradersResponse {
    fn from(value: CardTraders) -> Self {
        let have = value
            .have
            .iter()
            .map(|summary| OfferingTraderBody {
                user_id: summary.user_id.to_string(),
                trading_code: summary.trading_code.as_ref().map(ToString::to_string),
                wishlist: card_strings(summary),
            })
            .collect();
        let want = value
            .want
            .iter()
            .map(|summary| WantingTraderBody {
                user_id: summary.user_id.to_string(),
                trading_code: summary.trading_code.as_ref().map(ToString::to_string),
                cards_for_trade: card_strings(summary),
            })
            .collect();
        Self {
            users: CardTraderLists { have, want },
        }
    }
}

/// The caller's relationship with one card.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradeStatusResponse {
    pub is_marked_for_trade: bool,
    pub is_wishlisted: bool,
}

impl From<CardTradeStatus> for TradeStatusResponse {
    fn from(value: CardTradeStatus) -> Self {
        Self {
            is_marked_for_trade: value.is_marked_for_trade,
            is_wishlisted: value.is_wishlisted,
        }
    }
}

/// List every catalogue card in release order.
#[utoipa::path(
    get,
    path = "/api/v1/cards",
    responses(
        (status = 200, description = "Catalogue", body = [CardBody]),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "listCards",
    security([])
)]
#[get("/cards")]
pub async fn list_cards(state: web::Data<HttpState>) -> ApiResult<web::Json<Vec<CardBody>>> {
    let cards = state.catalogue.list_cards().await?;
    Ok(web::Json(cards.into_iter().map(CardBody::from).collect()))
}

/// Fetch one card.
///
/// Malformed path segments cannot name an existing pack or card, so they
/// yield the same not-found errors as unknown ones.
#[utoipa::path(
    get,
    path = "/api/v1/cards/{pack}/{number}",
    params(
        ("pack" = String, Path, description = "Pack slug, e.g. genetic-apex-a1"),
        ("number" = String, Path, description = "Card number within the pack")
    ),
    responses(
        (status = 200, description = "Card", body = CardBody),
        (status = 404, description = "Pack or card not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "getCard",
    security([])
)]
#[get("/cards/{pack}/{number}")]
pub async fn get_card(
    state: web::Data<HttpState>,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<CardBody>> {
    let (pack, number) = path.into_inner();
    let pack = PackId::new(&pack).map_err(|_| Error::not_found("Pack not found"))?;
    let number = CardNumber::new(&number).map_err(|_| Error::not_found("Card not found"))?;
    let card = state.catalogue.card(&pack, &number).await?;
    Ok(web::Json(CardBody::from(card)))
}

/// Traders offering or wanting a card, excluding the caller.
#[utoipa::path(
    get,
    path = "/api/v1/cards/{pack}/{number}/traders",
    params(
        ("pack" = String, Path, description = "Pack slug"),
        ("number" = String, Path, description = "Card number within the pack")
    ),
    responses(
        (status = 200, description = "Traders for the card", body = CardTradersResponse),
        (status = 400, description = "Invalid card ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "getCardTraders"
)]
#[get("/cards/{pack}/{number}/traders")]
pub async fn get_card_traders(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<CardTradersResponse>> {
    let (pack, number) = path.into_inner();
    let card_id = card_id_from_path(&pack, &number)?;
    let traders = state
        .trade_lists_query
        .card_traders(&card_id, caller.user_id())
        .await?;
    Ok(web::Json(CardTradersResponse::from(traders)))
}

/// Whether the caller offers or wants a card.
#[utoipa::path(
    get,
    path = "/api/v1/cards/{pack}/{number}/trade-status",
    params(
        ("pack" = String, Path, description = "Pack slug"),
        ("number" = String, Path, description = "Card number within the pack")
    ),
    responses(
        (status = 200, description = "Caller's status", body = TradeStatusResponse),
        (status = 400, description = "Invalid card ID", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["cards"],
    operation_id = "getCardTradeStatus"
)]
#[get("/cards/{pack}/{number}/trade-status")]
pub async fn get_trade_status(
    state: web::Data<HttpState>,
    caller: Caller,
    path: web::Path<(String, String)>,
) -> ApiResult<web::Json<TradeStatusResponse>> {
    let (pack, number) = path.into_inner();
    let card_id = card_id_from_path(&pack, &number)?;
    let status = state
        .trade_lists_query
        .card_status(&card_id, caller.user_id())
        .await?;
    Ok(web::Json(TradeStatusResponse::from(status)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockCatalogueQuery, MockTradeListQuery};
    use crate::domain::{CardId, CatalogueCard, TradingCode, UserId};
    use crate::inbound::http::test_utils::{bearer, state_builder};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use serde_json::{Value, json};

    fn sample_card() -> CatalogueCard {
        CatalogueCard::new(
            PackId::new("genetic-apex-a1").expect("pack"),
            CardNumber::new("1").expect("number"),
            "Bulbasaur",
            "https://cards.example/a1-1.png",
            "Genetic Apex A1",
            "◊",
        )
        .expect("card")
    }

    fn app_state(
        catalogue: MockCatalogueQuery,
        lists: MockTradeListQuery,
    ) -> web::Data<HttpState> {
        web::Data::new(
            state_builder()
                .catalogue(catalogue)
                .trade_lists_query(lists)
                .build(),
        )
    }

    #[actix_web::test]
    async fn get_card_returns_camel_case_body() {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue
            .expect_card()
            .withf(|pack, number| pack.as_str() == "genetic-apex-a1" && number.as_str() == "1")
            .times(1)
            .return_once(|_, _| Ok(sample_card()));
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(catalogue, MockTradeListQuery::new()))
                .service(get_card),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/cards/genetic-apex-a1/1")
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({
                "id": "genetic-apex-a1-1",
                "pack": "genetic-apex-a1",
                "number": "1",
                "name": "Bulbasaur",
                "imageUrl": "https://cards.example/a1-1.png",
                "packName": "Genetic Apex A1",
                "rarity": "◊",
            })
        );
    }

    #[actix_web::test]
    async fn get_card_with_malformed_pack_is_not_found() {
        let mut catalogue = MockCatalogueQuery::new();
        catalogue.expect_card().never();
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(catalogue, MockTradeListQuery::new()))
                .service(get_card),
        )
        .await;

        let req = actix_test::TestRequest::get().uri("/cards/no_such!/1").to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "Pack not found");
    }

    #[actix_web::test]
    async fn traders_require_a_session() {
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(MockCatalogueQuery::new(), MockTradeListQuery::new()))
                .service(get_card_traders),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/cards/genetic-apex-a1/1/traders")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn traders_are_reported_for_the_caller() {
        let mut lists = MockTradeListQuery::new();
        lists
            .expect_card_traders()
            .withf(|card, viewer| {
                card.as_str() == "genetic-apex-a1-1" && viewer.as_str() == "user_me"
            })
            .times(1)
            .return_once(|_, _| {
                Ok(CardTraders {
                    have: vec![TraderSummary {
                        user_id: UserId::new("user_bob").expect("user"),
                        trading_code: Some(TradingCode::new("1111-2222-3333-4444").expect("code")),
                        cards: vec![CardId::parse("genetic-apex-a1-9").expect("card")],
                    }],
                    want: Vec::new(),
                })
            });
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(MockCatalogueQuery::new(), lists))
                .service(get_card_traders),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/cards/genetic-apex-a1/1/traders")
            .insert_header(bearer("user_me"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({
                "users": {
                    "have": [{
                        "userId": "user_bob",
                        "tradingCode": "1111-2222-3333-4444",
                        "wishlist": ["genetic-apex-a1-9"],
                    }],
                    "want": [],
                }
            })
        );
    }

    #[actix_web::test]
    async fn trade_status_reports_flags() {
        let mut lists = MockTradeListQuery::new();
        lists.expect_card_status().times(1).return_once(|_, _| {
            Ok(CardTradeStatus {
                is_marked_for_trade: true,
                is_wishlisted: false,
            })
        });
        let app = actix_test::init_service(
            App::new()
                .app_data(app_state(MockCatalogueQuery::new(), lists))
                .service(get_trade_status),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/cards/genetic-apex-a1/1/trade-status")
            .insert_header(bearer("user_me"))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"isMarkedForTrade": true, "isWishlisted": false}));
    }
}
