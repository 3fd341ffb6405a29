//! Sign-up, sign-in and bearer authentication through the HTTP router

mod common;

use axum::http::{Method, StatusCode};
use common::{assert_error, TestApp, PASSWORD};
use paps_core::domain::AccountStatus;
use serde_json::json;

#[tokio::test]
async fn test_signup_then_signin() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/signup",
            None,
            json!({
                "prenom": "Moussa",
                "nom": "Fall",
                "telephone": "+221771112233",
                "email": "moussa@shop.sn",
                "password": PASSWORD,
                "nom_boutique": "Chez Moussa",
                "adress": "Thiès",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["role"], "commercant");
    assert!(body["user"]["merchant_id"].is_string());
    assert!(body["user"].get("password_hash").is_none());

    let (status, body) = app
        .post(
            "/api/signin",
            None,
            json!({ "email": "moussa@shop.sn", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/admin/dashboard");
    assert!(!body["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    app.merchant("dup@shop.sn").await;

    let (status, body) = app
        .post(
            "/api/signup",
            None,
            json!({
                "first_name": "Autre",
                "last_name": "Personne",
                "email": "dup@shop.sn",
                "password": PASSWORD,
                "shop_name": "Autre boutique",
                "address": "Dakar",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_error(&body, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_wrong_password_is_unauthorized() {
    let app = TestApp::new().await;
    app.merchant("awa@shop.sn").await;

    let (status, body) = app
        .post(
            "/api/signin",
            None,
            json!({ "email": "awa@shop.sn", "password": "nope" }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .post(
            "/api/signin",
            None,
            json!({ "email": "ghost@shop.sn", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_verify_token() {
    let app = TestApp::new().await;
    let (token, user) = app.merchant("verify@shop.sn").await;

    let (status, body) = app.get(&format!("/api/verify-token/{}", token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], user["id"]);
    assert_eq!(body["user"]["email"], "verify@shop.sn");

    let (status, _) = app.get("/api/verify-token/garbage", None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_protected_routes_need_a_bearer() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/getProductByCommercant", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_error(&body, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .get("/api/getProductByCommercant", Some("not-a-jwt"))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_courier_lands_on_delivery_page_but_not_merchant_routes() {
    let app = TestApp::new().await;
    let (_, merchant) = app.merchant("boss@shop.sn").await;

    let (status, _) = app
        .post(
            "/api/createLivreur",
            None,
            json!({
                "first_name": "Ibra",
                "last_name": "Ndiaye",
                "email": "ibra@shop.sn",
                "password": PASSWORD,
                "merchant_id": merchant["merchant_id"],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post(
            "/api/signin",
            None,
            json!({ "email": "ibra@shop.sn", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["redirect"], "/agent/delivery");

    let token = body["token"].as_str().unwrap();
    let (status, body) = app
        .call(Method::GET, "/api/getcategoriesByCommercant", Some(token), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_suspended_shop_is_locked_out() {
    let app = TestApp::new().await;
    let (token, user) = app.merchant("suspended@shop.sn").await;
    let merchant_id = user["merchant_id"].as_str().unwrap();

    app.state
        .backoffice
        .set_merchant_status(merchant_id, AccountStatus::Suspended)
        .await
        .unwrap();

    let (status, body) = app
        .post(
            "/api/signin",
            None,
            json!({ "email": "suspended@shop.sn", "password": PASSWORD }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_error(&body, StatusCode::FORBIDDEN);

    let (status, _) = app
        .get("/api/getProductByCommercant", Some(&token))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.state
        .backoffice
        .set_merchant_status(merchant_id, AccountStatus::Active)
        .await
        .unwrap();
    let (status, _) = app
        .get("/api/getProductByCommercant", Some(&token))
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::new().await;

    let response = {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;

        app.router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/signin")
                    .header("content-type", "application/json")
                    .body(Body::from("{not json"))
                    .unwrap(),
            )
            .await
            .unwrap()
    };
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
