use axum::{
    Json, Router,
    routing::{get, post, put},
};
use serde_json::{Value, json};

use crate::{
    AppState,
    middleware::{authenticate, log_errors},
};

pub mod category;
pub mod user;
pub mod xozmak;

pub fn router(state: AppState) -> Router {
    let public_routes = Router::new().route("/users/register", post(user::register));

    let protected_routes = Router::new()
        .route(
            "/users/profile",
            get(user::get_profile).put(user::update_profile),
        )
        .route(
            "/users/locations",
            get(user::list_locations).post(user::add_location),
        )
        .route(
            "/xozmaks",
            get(xozmak::list_xozmaks).post(xozmak::create_xozmak),
        )
        .route(
            "/xozmaks/{id}",
            put(xozmak::update_xozmak).delete(xozmak::delete_xozmak),
        )
        .route(
            "/categories",
            get(category::list_categories).post(category::create_category),
        )
        .route(
            "/categories/{id}",
            put(category::update_category).delete(category::delete_category),
        )
        .route(
            "/sub-categories",
            get(category::list_sub_categories).post(category::create_sub_category),
        )
        .route(
            "/sub-categories/{id}",
            put(category::update_sub_category).delete(category::delete_sub_category),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            authenticate,
        ));

    let api = Router::new().merge(public_routes).merge(protected_routes);

    let base = state.config.api_base_uri.trim_end_matches('/');
    let router = Router::new().route("/health", get(health));
    let router = if base.is_empty() {
        router.merge(api)
    } else {
        router.nest(base, api)
    };

    router
        .layer(axum::middleware::from_fn(log_errors))
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use super::*;
    use crate::cache::verification::memory::MemoryVerificationCache;
    use crate::config::Config;
    use crate::database::memory::MemoryStore;

    const PHONE: &str = "+19998887777";

    fn app_with(cache: MemoryVerificationCache) -> (Router, AppState) {
        let state = AppState::new(
            Config::for_tests(),
            Arc::new(cache),
            Arc::new(MemoryStore::default()),
        );
        (router(state.clone()), state)
    }

    async fn send(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    async fn register(app: &Router, code: &str) -> (StatusCode, Value) {
        send(
            app,
            Method::POST,
            "/api/v1/users/register",
            None,
            Some(json!({ "phone_number": PHONE, "code": code, "fcm_token": "tok1" })),
        )
        .await
    }

    #[tokio::test]
    async fn register_then_duplicate() {
        let (app, _) = app_with(MemoryVerificationCache::with_code(PHONE, "4521"));

        let (status, body) = register(&app, "4521").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], 0);
        let data = &body["resp_data"];
        assert!(!data["id"].as_str().unwrap().is_empty());
        assert!(!data["access_token"].as_str().unwrap().is_empty());
        assert!(!data["refresh_token"].as_str().unwrap().is_empty());

        let (status, body) = register(&app, "4521").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], crate::utils::error_codes::USER_EXISTS);
    }

    #[tokio::test]
    async fn register_with_wrong_or_missing_code() {
        let (app, _) = app_with(MemoryVerificationCache::with_code(PHONE, "4521"));
        let (status, body) = register(&app, "1111").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], crate::utils::error_codes::INVALID_CODE);

        let (app, _) = app_with(MemoryVerificationCache::default());
        let (status, _) = register(&app, "4521").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn cache_outage_is_a_server_error_with_generic_message() {
        let cache = MemoryVerificationCache::with_code(PHONE, "4521");
        cache.go_down();
        let (app, _) = app_with(cache);

        let (status, body) = register(&app, "4521").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!body["msg"].as_str().unwrap().contains("refused"));
    }

    #[tokio::test]
    async fn profile_follows_the_token() {
        let (app, _) = app_with(MemoryVerificationCache::with_code(PHONE, "4521"));
        let (_, body) = register(&app, "4521").await;
        let token = body["resp_data"]["access_token"].as_str().unwrap().to_string();
        let id = body["resp_data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::GET, "/api/v1/users/profile", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resp_data"]["id"], id);
        assert_eq!(body["resp_data"]["phone_number"], PHONE);

        let (status, body) = send(
            &app,
            Method::PUT,
            "/api/v1/users/profile",
            Some(token.as_str()),
            Some(json!({ "first_name": "Aziz" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resp_data"]["first_name"], "Aziz");
        assert_eq!(body["resp_data"]["fcm_token"], "tok1");
    }

    #[tokio::test]
    async fn anonymous_and_invalid_callers() {
        let (app, _) = app_with(MemoryVerificationCache::default());

        let (status, _) = send(&app, Method::GET, "/api/v1/users/profile", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = send(&app, Method::GET, "/api/v1/users/profile", Some("garbage"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // reads stay open to anonymous callers
        let (status, body) = send(&app, Method::GET, "/api/v1/xozmaks", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resp_data"], json!([]));
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let (app, state) = app_with(MemoryVerificationCache::default());
        let issued = chrono::Utc::now() - chrono::Duration::hours(3);
        let token = state
            .tokens
            .mint_at(
                &crate::utils::TokenClaims::for_user("someone"),
                std::time::Duration::from_secs(3600),
                issued,
            )
            .unwrap();

        let (status, _) = send(&app, Method::GET, "/api/v1/users/locations", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn registration_ignores_a_stale_bearer_token() {
        let (app, state) = app_with(MemoryVerificationCache::with_code(PHONE, "4521"));
        let issued = chrono::Utc::now() - chrono::Duration::hours(3);
        let stale = state
            .tokens
            .mint_at(
                &crate::utils::TokenClaims::for_user("someone"),
                std::time::Duration::from_secs(3600),
                issued,
            )
            .unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/users/register",
            Some(stale.as_str()),
            Some(json!({ "phone_number": PHONE, "code": "4521" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], 0);

        let (status, _) = send(&app, Method::GET, "/api/v1/users/profile", Some(stale.as_str()), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_body_gets_the_error_envelope() {
        let (app, _) = app_with(MemoryVerificationCache::with_code(PHONE, "4521"));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/users/register",
            None,
            Some(json!({ "phone_number": PHONE })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], crate::utils::error_codes::VALIDATION_ERROR);
        assert!(body["msg"].as_str().unwrap().contains("code"));

        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/users/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["code"], crate::utils::error_codes::VALIDATION_ERROR);
    }

    #[tokio::test]
    async fn locations_belong_to_the_caller() {
        let (app, _) = app_with(MemoryVerificationCache::with_code(PHONE, "4521"));
        let (_, body) = register(&app, "4521").await;
        let token = body["resp_data"]["access_token"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/users/locations",
            Some(token.as_str()),
            Some(json!({ "name": "Home", "latitude": 41.31, "longitude": 69.28 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/users/locations",
            Some(token.as_str()),
            Some(json!({ "name": "Nowhere", "latitude": 141.0, "longitude": 0.0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(&app, Method::GET, "/api/v1/users/locations", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resp_data"].as_array().unwrap().len(), 1);
        assert_eq!(body["resp_data"][0]["name"], "Home");
    }

    #[tokio::test]
    async fn xozmak_lifecycle_uses_soft_delete() {
        let (app, state) = app_with(MemoryVerificationCache::default());
        let token = state
            .tokens
            .mint(
                &crate::utils::TokenClaims::for_user("admin-1"),
                std::time::Duration::from_secs(600),
            )
            .unwrap();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/xozmaks",
            Some(token.as_str()),
            Some(json!({ "name": "Plov Center", "address": "Chilonzor 5" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["resp_data"]["created_by"], "admin-1");
        let id = body["resp_data"]["id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            Method::PUT,
            &format!("/api/v1/xozmaks/{id}"),
            Some(token.as_str()),
            Some(json!({ "description": "Best plov" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resp_data"]["description"], "Best plov");
        assert_eq!(body["resp_data"]["name"], "Plov Center");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/xozmaks/{id}"), Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, body) = send(&app, Method::GET, "/api/v1/xozmaks", None, None).await;
        assert_eq!(body["resp_data"], json!([]));

        let (status, _) = send(&app, Method::DELETE, &format!("/api/v1/xozmaks/{id}"), Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::POST, "/api/v1/xozmaks", None, Some(json!({ "name": "x" }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn sub_category_needs_existing_category() {
        let (app, state) = app_with(MemoryVerificationCache::default());
        let token = state
            .tokens
            .mint(
                &crate::utils::TokenClaims::for_user("admin-1"),
                std::time::Duration::from_secs(600),
            )
            .unwrap();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/sub-categories",
            Some(token.as_str()),
            Some(json!({ "category_id": "missing", "name": "Soups" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/v1/categories",
            Some(token.as_str()),
            Some(json!({ "name": "Food" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let category_id = body["resp_data"]["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/categories",
            Some(token.as_str()),
            Some(json!({ "name": "Food" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/v1/sub-categories",
            Some(token.as_str()),
            Some(json!({ "category_id": category_id, "name": "Soups" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, body) = send(
            &app,
            Method::GET,
            &format!("/api/v1/sub-categories?category_id={category_id}"),
            None,
            None,
        )
        .await;
        assert_eq!(body["resp_data"].as_array().unwrap().len(), 1);

        let (_, body) = send(&app, Method::GET, "/api/v1/sub-categories?category_id=other", None, None).await;
        assert_eq!(body["resp_data"], json!([]));
    }

    #[tokio::test]
    async fn health_is_outside_the_api_prefix() {
        let (app, _) = app_with(MemoryVerificationCache::default());
        let (status, body) = send(&app, Method::GET, "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
