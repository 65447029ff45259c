//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint of the inbound layer (cards, trade lists,
//!   trades, trading codes, the identity webhook and health probes)
//! - **Schemas**: request and response bodies plus the wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that describe domain types
//!   without coupling them to utoipa
//! - **Security**: bearer session token authentication scheme
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::cards::{
    CardTraderLists, CardTradersResponse, OfferingTraderBody, TradeStatusResponse,
    WantingTraderBody,
};
use crate::inbound::http::schemas::{CardBody, ErrorCodeSchema, ErrorSchema, SuccessBody};
use crate::inbound::http::trade_lists::{CardIdRequest, CardsForTradeResponse, WishlistResponse};
use crate::inbound::http::trades::{ProposeTradeBody, TradeView, TradesResponse};
use crate::inbound::http::trading_code::{TradingCodeRequest, TradingCodeStatusResponse};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session token security schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Identity-provider session token."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "__session",
                "Identity-provider session cookie, read when no bearer token is sent.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Tradepost API",
        description = "Card catalogue, trade lists and trade proposals for a card-trading community.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0.html"
        )
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionToken" = []), ("SessionCookie" = [])),
    paths(
        crate::inbound::http::cards::list_cards,
        crate::inbound::http::cards::get_card,
        crate::inbound::http::cards::get_card_traders,
        crate::inbound::http::cards::get_trade_status,
        crate::inbound::http::trading_code::get_trading_code,
        crate::inbound::http::trading_code::save_trading_code,
        crate::inbound::http::trade_lists::get_cards_for_trade,
        crate::inbound::http::trade_lists::mark_for_trade,
        crate::inbound::http::trade_lists::unmark_for_trade,
        crate::inbound::http::trade_lists::get_wishlist,
        crate::inbound::http::trade_lists::add_to_wishlist,
        crate::inbound::http::trade_lists::remove_from_wishlist,
        crate::inbound::http::trades::get_trades,
        crate::inbound::http::trades::propose_trade,
        crate::inbound::http::webhook::identity_webhook,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CardBody,
        SuccessBody,
        OfferingTraderBody,
        WantingTraderBody,
        CardTraderLists,
        CardTradersResponse,
        TradeStatusResponse,
        TradingCodeRequest,
        TradingCodeStatusResponse,
        CardIdRequest,
        CardsForTradeResponse,
        WishlistResponse,
        ProposeTradeBody,
        TradeView,
        TradesResponse,
    )),
    tags(
        (name = "cards", description = "Card catalogue and per-card trader lookups"),
        (name = "users", description = "Caller profile and trading code"),
        (name = "trade-lists", description = "Cards for trade and wishlist"),
        (name = "trades", description = "Trade proposals"),
        (name = "webhooks", description = "Identity-provider events"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
