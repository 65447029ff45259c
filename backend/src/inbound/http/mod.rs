//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod cards;
pub mod error;
pub mod health;
pub mod identity;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod trade_lists;
pub mod trades;
pub mod trading_code;
pub mod validation;
pub mod webhook;
pub mod webhook_signature;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on `cfg`.
///
/// The caller mounts this under its scope and supplies `HttpState` as app
/// data. Malformed JSON bodies are answered with the standard error body.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(error::json_config())
        .service(cards::list_cards)
        .service(cards::get_card)
        .service(cards::get_card_traders)
        .service(cards::get_trade_status)
        .service(trading_code::get_trading_code)
        .service(trading_code::save_trading_code)
        .service(trade_lists::get_cards_for_trade)
        .service(trade_lists::mark_for_trade)
        .service(trade_lists::unmark_for_trade)
        .service(trade_lists::get_wishlist)
        .service(trade_lists::add_to_wishlist)
        .service(trade_lists::remove_from_wishlist)
        .service(trades::get_trades)
        .service(trades::propose_trade)
        .service(webhook::identity_webhook);
}
