//! Identity-provider webhook receiver.
//!
//! ```text
//! POST /api/v1/webhooks/identity
//! svix-id: msg_...
//! svix-timestamp: 1700000000
//! svix-signature: v1,<base64>
//! {"type":"user.created","data":{"id":"user_2abc"}}
//! ```
//!
//! The body is read raw so the signature covers the exact bytes sent.

use actix_web::{HttpRequest, post, web};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use crate::domain::{Error, IdentityEvent, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, SuccessBody};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::webhook_signature::WebhookHeaders;

#[derive(Debug, Deserialize)]
struct EventEnvelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: EventData,
}

#[derive(Debug, Default, Deserialize)]
struct EventData {
    id: Option<String>,
}

fn invalid_payload(message: &str) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": "body" }))
}

/// Decode a verified payload into a lifecycle event.
fn parse_event(body: &[u8]) -> Result<IdentityEvent, Error> {
    let envelope: EventEnvelope = serde_json::from_slice(body).map_err(|err| {
        debug!(error = %err, "webhook payload did not parse");
        invalid_payload("Invalid webhook payload")
    })?;

    let user = || -> Result<UserId, Error> {
        let id = envelope
            .data
            .id
            .as_deref()
            .ok_or_else(|| invalid_payload("Webhook payload is missing data.id"))?;
        UserId::new(id).map_err(|err| invalid_payload(&err.to_string()))
    };

    match envelope.kind.as_str() {
        "user.created" => Ok(IdentityEvent::Created(user()?)),
        "user.updated" => Ok(IdentityEvent::Updated(user()?)),
        "user.deleted" => Ok(IdentityEvent::Deleted(user()?)),
        other => Ok(IdentityEvent::Other {
            kind: other.to_owned(),
        }),
    }
}

/// Receive a signed identity-provider event.
#[utoipa::path(
    post,
    path = "/api/v1/webhooks/identity",
    request_body(content = String, content_type = "application/json"),
    params(
        ("svix-id" = String, Header, description = "Message id"),
        ("svix-timestamp" = String, Header, description = "Unix seconds"),
        ("svix-signature" = String, Header, description = "Space-separated v1 signatures")
    ),
    responses(
        (status = 200, description = "Event processed", body = SuccessBody),
        (status = 400, description = "Unverified or malformed event", body = ErrorSchema),
        (status = 500, description = "Webhook not configured", body = ErrorSchema)
    ),
    tags = ["webhooks"],
    operation_id = "identityWebhook",
    security([])
)]
#[post("/webhooks/identity")]
pub async fn identity_webhook(
    state: web::Data<HttpState>,
    req: HttpRequest,
    body: web::Bytes,
) -> ApiResult<web::Json<SuccessBody>> {
    let Some(verifier) = state.webhooks.as_ref() else {
        error!("identity webhook called without a configured secret");
        return Err(Error::internal("webhook secret is not configured"));
    };
    let headers = WebhookHeaders::from_request(&req)
        .ok_or_else(|| Error::invalid_request("Missing webhook signature headers"))?;
    verifier
        .verify(&headers, &body, state.clock.utc())
        .map_err(|err| {
            debug!(message_id = %headers.id, error = %err, "webhook rejected");
            Error::invalid_request(err.to_string())
        })?;

    let event = parse_event(&body)?;
    let kind = event.kind().to_owned();
    let outcome = state.identity_sync.apply(event).await?;
    info!(message_id = %headers.id, event = %kind, ?outcome, "identity webhook processed");
    Ok(web::Json(SuccessBody::OK))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::IdentitySyncOutcome;
    use crate::domain::ports::MockIdentitySyncCommand;
    use crate::inbound::http::test_utils::{fixed_now, state_builder};
    use crate::inbound::http::webhook_signature::{
        WEBHOOK_ID_HEADER, WEBHOOK_SIGNATURE_HEADER, WEBHOOK_TIMESTAMP_HEADER,
    };
    use crate::test_support::{TEST_WEBHOOK_SECRET, signed_webhook_headers};
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use chrono::Duration;
    use rstest::rstest;
    use serde_json::Value;

    const CREATED: &[u8] = br#"{"type":"user.created","data":{"id":"user_new"}}"#;

    fn signed(body: &'static [u8], headers: &WebhookHeaders) -> actix_test::TestRequest {
        actix_test::TestRequest::post()
            .uri("/webhooks/identity")
            .insert_header((WEBHOOK_ID_HEADER, headers.id.clone()))
            .insert_header((WEBHOOK_TIMESTAMP_HEADER, headers.timestamp.clone()))
            .insert_header((WEBHOOK_SIGNATURE_HEADER, headers.signature.clone()))
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
    }

    async fn call(state: HttpState, req: actix_test::TestRequest) -> actix_web::dev::ServiceResponse {
        let app = actix_test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(identity_webhook),
        )
        .await;
        actix_test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn created_event_reaches_sync_port() {
        let mut sync = MockIdentitySyncCommand::new();
        sync.expect_apply()
            .withf(|event| matches!(event, IdentityEvent::Created(id) if id.as_str() == "user_new"))
            .times(1)
            .return_once(|_| Ok(IdentitySyncOutcome::Created));
        let headers = signed_webhook_headers(TEST_WEBHOOK_SECRET, CREATED, fixed_now());

        let res = call(
            state_builder().identity_sync(sync).with_webhooks().build(),
            signed(CREATED, &headers),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body, json!({"success": true}));
    }

    #[actix_web::test]
    async fn unknown_event_types_are_acknowledged() {
        const BODY: &[u8] = br#"{"type":"session.created","data":{"id":"sess_1"}}"#;
        let mut sync = MockIdentitySyncCommand::new();
        sync.expect_apply()
            .withf(|event| matches!(event, IdentityEvent::Other { kind } if kind == "session.created"))
            .times(1)
            .return_once(|_| Ok(IdentitySyncOutcome::Ignored));
        let headers = signed_webhook_headers(TEST_WEBHOOK_SECRET, BODY, fixed_now());

        let res = call(
            state_builder().identity_sync(sync).with_webhooks().build(),
            signed(BODY, &headers),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn missing_secret_is_internal_error() {
        let headers = signed_webhook_headers(TEST_WEBHOOK_SECRET, CREATED, fixed_now());
        let res = call(state_builder().build(), signed(CREATED, &headers)).await;
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[actix_web::test]
    async fn missing_headers_are_rejected() {
        let req = actix_test::TestRequest::post()
            .uri("/webhooks/identity")
            .set_payload(CREATED);
        let res = call(state_builder().with_webhooks().build(), req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["message"], "Missing webhook signature headers");
    }

    #[rstest]
    #[case::stale(Duration::minutes(-6))]
    #[case::future(Duration::minutes(6))]
    #[actix_web::test]
    async fn timestamps_outside_window_are_rejected(#[case] skew: Duration) {
        let headers = signed_webhook_headers(TEST_WEBHOOK_SECRET, CREATED, fixed_now() + skew);
        let res = call(
            state_builder().with_webhooks().build(),
            signed(CREATED, &headers),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn tampered_body_is_rejected() {
        let headers = signed_webhook_headers(TEST_WEBHOOK_SECRET, CREATED, fixed_now());
        let tampered: &'static [u8] = br#"{"type":"user.deleted","data":{"id":"user_new"}}"#;
        let res = call(
            state_builder().with_webhooks().build(),
            signed(tampered, &headers),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case(br#"not json"#)]
    #[case(br#"{"type":"user.created","data":{}}"#)]
    #[case(br#"{"type":"user.deleted"}"#)]
    #[actix_web::test]
    async fn malformed_payloads_are_rejected(#[case] body: &'static [u8]) {
        let mut sync = MockIdentitySyncCommand::new();
        sync.expect_apply().never();
        let headers = signed_webhook_headers(TEST_WEBHOOK_SECRET, body, fixed_now());
        let res = call(
            state_builder().identity_sync(sync).with_webhooks().build(),
            signed(body, &headers),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[rstest]
    #[case(br#"{"type":"user.updated","data":{"id":"user_1"}}"#, "updated")]
    #[case(br#"{"type":"user.deleted","data":{"id":"user_1"}}"#, "deleted")]
    #[case(br#"{"type":"email.created"}"#, "email.created")]
    fn parse_event_maps_types(#[case] body: &[u8], #[case] kind: &str) {
        let event = parse_event(body).expect("event parses");
        assert_eq!(event.kind(), kind);
    }
}
