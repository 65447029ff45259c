//! End-to-end HTTP flows against the in-memory store.
//!
//! Requests go through the real services and the session and webhook
//! verifiers; only storage is swapped for the process-local adapter.

#[path = "support/trading_app.rs"]
mod trading_app;

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::Duration;
use rstest::rstest;
use serde_json::{Value, json};
use tradepost::domain::ports::TraderRepository;
use tradepost::domain::UserId;

use trading_app::{TradingApp, bearer, fixed_now, webhook_request};

macro_rules! call_json {
    ($app:expr, $req:expr) => {{
        let res = actix_test::call_service(&$app, $req.to_request()).await;
        let status = res.status();
        let body: Value = actix_test::read_body_json(res).await;
        (status, body)
    }};
}

fn ids(values: &Value) -> Vec<&str> {
    values
        .as_array()
        .expect("array")
        .iter()
        .map(|value| value.as_str().expect("string id"))
        .collect()
}

macro_rules! register {
    ($app:expr, $user_id:expr, $code:expr) => {{
        let user_id: &str = $user_id;
        let event = json!({"type": "user.created", "data": {"id": user_id}});
        let req = webhook_request(&event, fixed_now()).to_request();
        let res = actix_test::call_service(&$app, req).await;
        assert_eq!(res.status(), StatusCode::OK, "webhook for {user_id}");
        let code: Option<&str> = $code;
        if let Some(code) = code {
            let res = actix_test::call_service(
                &$app,
                actix_test::TestRequest::post()
                    .uri("/api/v1/users/me/trading-code")
                    .insert_header(bearer(user_id))
                    .set_json(json!({"tradingCode": code}))
                    .to_request(),
            )
            .await;
            assert_eq!(res.status(), StatusCode::OK, "trading code for {user_id}");
        }
    }};
}

#[actix_web::test]
async fn catalogue_is_public_and_sorted() {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;

    let (status, body) = call_json!(app, actix_test::TestRequest::get().uri("/api/v1/cards"));
    assert_eq!(status, StatusCode::OK);
    let order: Vec<&str> = body
        .as_array()
        .expect("card list")
        .iter()
        .map(|card| card["id"].as_str().expect("id"))
        .collect();
    assert_eq!(
        order,
        [
            "genetic-apex-a1-1",
            "genetic-apex-a1-2",
            "genetic-apex-a1-10",
            "mythical-island-a1a-1"
        ]
    );

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::get().uri("/api/v1/cards/genetic-apex-a1/2")
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ivysaur");
    assert_eq!(body["packName"], "Genetic Apex A1");
}

#[rstest]
#[case("/api/v1/cards/genetic-apex-a1/99", "Card not found")]
#[case("/api/v1/cards/space-a9/1", "Pack not found")]
#[actix_web::test]
async fn unknown_cards_are_not_found(#[case] uri: &str, #[case] message: &str) {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;

    let (status, body) = call_json!(app, actix_test::TestRequest::get().uri(uri));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
    assert_eq!(body["message"], message);
}

#[rstest]
#[case("/api/v1/users/me/wishlist")]
#[case("/api/v1/users/me/trades")]
#[case("/api/v1/cards/genetic-apex-a1/1/traders")]
#[actix_web::test]
async fn session_routes_require_login(#[case] uri: &str) {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;

    let (status, body) = call_json!(app, actix_test::TestRequest::get().uri(uri));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}

#[actix_web::test]
async fn offers_and_wishlists_meet_on_the_card() {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;
    register!(app, "alice", Some("1111-2222-3333-4444"));
    register!(app, "bob", Some("5555-6666-7777-8888"));

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/me/cards-for-trade")
            .insert_header(bearer("alice"))
            .set_json(json!({"cardId": "genetic-apex-a1-1"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["cardsForTrade"]), ["genetic-apex-a1-1"]);

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/me/wishlist")
            .insert_header(bearer("bob"))
            .set_json(json!({"cardId": "genetic-apex-a1-1"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&body["wishlist"]), ["genetic-apex-a1-1"]);

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/cards/genetic-apex-a1/1/traders")
            .insert_header(bearer("bob"))
    );
    assert_eq!(status, StatusCode::OK);
    let have = body["users"]["have"].as_array().expect("have list");
    assert_eq!(have.len(), 1);
    assert_eq!(have[0]["userId"], "alice");
    assert_eq!(have[0]["tradingCode"], "1111-2222-3333-4444");
    assert!(
        body["users"]["want"].as_array().expect("want list").is_empty(),
        "caller is excluded"
    );

    let (_, status_body) = call_json!(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/cards/genetic-apex-a1/1/trade-status")
            .insert_header(bearer("alice"))
    );
    assert_eq!(
        status_body,
        json!({"isMarkedForTrade": true, "isWishlisted": false})
    );

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::delete()
            .uri("/api/v1/users/me/cards-for-trade")
            .insert_header(bearer("alice"))
            .set_json(json!({"cardId": "genetic-apex-a1-1"}))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(ids(&body["cardsForTrade"]).is_empty());

    let (_, body) = call_json!(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/cards/genetic-apex-a1/1/traders")
            .insert_header(bearer("bob"))
    );
    assert!(body["users"]["have"].as_array().expect("have list").is_empty());
}

#[actix_web::test]
async fn list_additions_need_a_trading_code() {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;
    register!(app, "carol", None);

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/trading-code")
            .insert_header(bearer("carol"))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"hasTradingCode": false}));

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/me/wishlist")
            .insert_header(bearer("carol"))
            .set_json(json!({"cardId": "genetic-apex-a1-2"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/me/trading-code")
            .insert_header(bearer("carol"))
            .set_json(json!({"tradingCode": "12-34"}))
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "tradingCode");
}

#[actix_web::test]
async fn proposals_appear_in_both_trade_logs() {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;
    register!(app, "alice", Some("1111-2222-3333-4444"));
    register!(app, "bob", Some("5555-6666-7777-8888"));

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/me/trades")
            .insert_header(bearer("alice"))
            .set_json(json!({
                "friendId": "bob",
                "cardToTrade": "genetic-apex-a1-1",
                "cardToReceive": "genetic-apex-a1-2",
                "message": "Bulbasaur for Ivysaur?"
            }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true}));

    let (_, alice) = call_json!(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/trades")
            .insert_header(bearer("alice"))
    );
    let (_, bob) = call_json!(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/trades")
            .insert_header(bearer("bob"))
    );

    let proposed = &alice["proposed"][0];
    let requested = &bob["requests"][0];
    assert_eq!(proposed["friendId"], "bob");
    assert_eq!(requested["friendId"], "alice");
    assert_eq!(proposed["cardToTrade"]["id"], "genetic-apex-a1-1");
    assert_eq!(requested["cardToTrade"]["id"], "genetic-apex-a1-2");
    assert_eq!(requested["cardToReceive"]["name"], "Bulbasaur");
    assert_eq!(proposed["timestamp"], requested["timestamp"]);
    assert!(alice["requests"].as_array().expect("requests").is_empty());
    assert!(bob["proposed"].as_array().expect("proposed").is_empty());
}

#[actix_web::test]
async fn proposals_to_unknown_traders_are_not_found() {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;
    register!(app, "alice", Some("1111-2222-3333-4444"));

    let (status, _) = call_json!(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/me/trades")
            .insert_header(bearer("alice"))
            .set_json(json!({
                "friendId": "nobody",
                "cardToTrade": "genetic-apex-a1-1",
                "cardToReceive": "genetic-apex-a1-2",
                "message": ""
            }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[case("bogus-pack-999", "genetic-apex-a1-2")]
#[case("genetic-apex-a1-1", "genetic-apex-a1-99")]
#[actix_web::test]
async fn proposals_of_uncatalogued_cards_are_not_found(
    #[case] card_to_trade: &str,
    #[case] card_to_receive: &str,
) {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;
    register!(app, "alice", Some("1111-2222-3333-4444"));
    register!(app, "bob", Some("5555-6666-7777-8888"));

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::post()
            .uri("/api/v1/users/me/trades")
            .insert_header(bearer("alice"))
            .set_json(json!({
                "friendId": "bob",
                "cardToTrade": card_to_trade,
                "cardToReceive": card_to_receive,
                "message": ""
            }))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Card not found");

    let (status, body) = call_json!(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/trades")
            .insert_header(bearer("bob"))
    );
    assert_eq!(status, StatusCode::OK);
    assert!(body["requests"].as_array().expect("requests").is_empty());
}

#[actix_web::test]
async fn deleted_users_lose_their_records() {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;
    register!(app, "dave", Some("1111-2222-3333-4444"));
    assert!(
        harness
            .store
            .find(&UserId::new("dave").expect("user id"))
            .await
            .expect("lookup")
            .is_some()
    );

    let event = json!({"type": "user.deleted", "data": {"id": "dave"}});
    let req = webhook_request(&event, fixed_now()).to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);

    let (status, _) = call_json!(
        app,
        actix_test::TestRequest::get()
            .uri("/api/v1/users/me/trades")
            .insert_header(bearer("dave"))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn stale_webhooks_are_rejected() {
    let harness = TradingApp::new().await;
    let app = actix_test::init_service(harness.app()).await;
    let event = json!({"type": "user.created", "data": {"id": "erin"}});

    harness.clock.advance(Duration::minutes(10));
    let (status, body) = call_json!(app, webhook_request(&event, fixed_now()));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert!(
        harness
            .store
            .find(&UserId::new("erin").expect("user id"))
            .await
            .expect("lookup")
            .is_none()
    );
}
