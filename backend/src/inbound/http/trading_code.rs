//! Trading code HTTP handlers.
//!
//! ```text
//! GET  /api/v1/users/me/trading-code
//! POST /api/v1/users/me/trading-code {"tradingCode":"1234-5678-9012-3456"}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::inbound::http::ApiResult;
use crate::inbound::http::identity::Caller;
use crate::inbound::http::schemas::{ErrorSchema, SuccessBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_trading_code};

const TRADING_CODE: FieldName = FieldName::new("tradingCode");

/// Request body for saving a trading code.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradingCodeRequest {
    #[schema(example = "1234-5678-9012-3456")]
    pub trading_code: Option<String>,
}

/// Whether the caller has saved a trading code.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TradingCodeStatusResponse {
    pub has_trading_code: bool,
}

/// Report whether the caller has saved a trading code.
#[utoipa::path(
    get,
    path = "/api/v1/users/me/trading-code",
    responses(
        (status = 200, description = "Trading code presence", body = TradingCodeStatusResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getTradingCodeStatus"
)]
#[get("/users/me/trading-code")]
pub async fn get_trading_code(
    state: web::Data<HttpState>,
    caller: Caller,
) -> ApiResult<web::Json<TradingCodeStatusResponse>> {
    let has_trading_code = state
        .trading_codes
        .has_trading_code(caller.user_id())
        .await?;
    Ok(web::Json(TradingCodeStatusResponse { has_trading_code }))
}

/// Save the caller's trading code.
#[utoipa::path(
    post,
    path = "/api/v1/users/me/trading-code",
    request_body = TradingCodeRequest,
    responses(
        (status = 200, description = "Trading code saved", body = SuccessBody),
        (status = 400, description = "Invalid trading code", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "saveTradingCode"
)]
#[post("/users/me/trading-code")]
pub async fn save_trading_code(
    state: web::Data<HttpState>,
    caller: Caller,
    payload: web::Json<TradingCodeRequest>,
) -> ApiResult<web::Json<SuccessBody>> {
    let code = parse_trading_code(payload.into_inner().trading_code, TRADING_CODE)?;
    state
        .trading_codes
        .save_trading_code(caller.user_id(), &code)
        .await?;
    Ok(web::Json(SuccessBody::OK))
}
