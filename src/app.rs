use std::path::Path;
use std::sync::Arc;

use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, post},
};
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{
    AppState,
    middleware::{RateLimiter, admin_gate, log_errors, rate_limit},
    routes::{admin, auth, health, local, reservation, store},
};

/// Full application router: API routes, the admin gate, and the static
/// frontend as fallback.
pub fn create_app(state: AppState) -> Router {
    let rate_limiter = Arc::new(RateLimiter::new(
        state.redis.clone(),
        state.config.clone(),
    ));

    // these spend Kakao quota, so they are rate limited per client
    let proxy_routes = Router::new()
        .route("/api/local/search", get(local::search_keyword))
        .route("/api/kakao/search", get(local::search_keyword))
        .route("/api/local/reverse", get(local::reverse_geocode))
        .layer(from_fn_with_state(rate_limiter, rate_limit));

    let public_routes = Router::new()
        .route("/api/ping", get(health::ping))
        .route("/api/search", get(local::search_local_places))
        .route("/api/stores", get(store::list_stores))
        .route("/api/stores/{id}", get(store::get_store))
        .route("/api/reservations", post(reservation::create_reservation))
        .route("/api/auth/kakao/login", get(auth::kakao_login))
        .route("/api/auth/kakao/callback", get(auth::kakao_callback))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/logout", post(auth::logout))
        .route("/api/admin/login", post(admin::login))
        .route("/api/admin/logout", post(admin::logout));

    // guarded per handler by the RequireAdmin extractor
    let admin_routes = Router::new()
        .route(
            "/api/admin/reservations",
            get(reservation::list_reservations),
        )
        .route(
            "/api/reservations/{id}",
            delete(reservation::delete_reservation),
        );

    let static_dir = Path::new(&state.config.static_dir);
    let frontend =
        ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    let router = Router::new()
        .merge(public_routes)
        .merge(proxy_routes)
        .merge(admin_routes)
        .fallback_service(frontend)
        .layer(from_fn_with_state(state.clone(), admin_gate))
        .layer(from_fn(log_errors))
        .layer(TraceLayer::new_for_http());

    #[cfg(debug_assertions)]
    let router = {
        tracing::debug!("Adding CORS layer for development mode");
        router.layer(tower_http::cors::CorsLayer::permissive())
    };

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        middleware::ADMIN_COOKIE,
        utils::{SessionRole, generate_token},
    };
    use axum::{
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
        response::Response,
    };
    use tower::ServiceExt;

    async fn send(request: Request<Body>) -> Response {
        let app = create_app(AppState::for_tests(Config::for_tests()));
        app.oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn admin_cookie() -> String {
        let token = generate_token("admin", SessionRole::Admin, &Config::for_tests()).unwrap();
        format!("{}={}", ADMIN_COOKIE, token)
    }

    #[tokio::test]
    async fn ping() {
        let response = send(Request::get("/api/ping").body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["data"]["status"], "ok");
    }

    #[tokio::test]
    async fn local_search_through_router() {
        let uri = "/api/search?q=%EC%B9%B4%ED%8E%98"; // 카페
        let response = send(Request::get(uri).body(Body::empty()).unwrap()).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["ok"], true);
        let results = body["results"].as_array().unwrap();
        assert!(!results.is_empty() && results.len() <= 20);
    }

    #[tokio::test]
    async fn admin_page_redirects_to_login() {
        let response = send(
            Request::get("/admin/reservations")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/admin/login");
    }

    #[tokio::test]
    async fn admin_api_requires_session() {
        let response = send(
            Request::get("/api/admin/reservations")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"], "unauthorized");

        let response = send(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/reservations/6c1f5c1e-3f7a-4d4e-9a55-1f0c2b9f7f10")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn delete_with_unusable_id_is_500() {
        let response = send(
            Request::builder()
                .method(Method::DELETE)
                .uri("/api/reservations/not-a-reservation")
                .header(header::COOKIE, admin_cookie())
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
        assert_eq!(body["error"], sqlx::Error::RowNotFound.to_string());
    }

    async fn assert_bad_request_envelope(response: Response) {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["ok"], false);
        assert!(!body["error"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn reservation_with_missing_fields_gets_envelope() {
        let response = send(
            Request::post("/api/reservations")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await;
        assert_bad_request_envelope(response).await;
    }

    #[tokio::test]
    async fn admin_login_without_body_gets_envelope() {
        let response = send(
            Request::post("/api/admin/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_bad_request_envelope(response).await;
    }

    #[tokio::test]
    async fn malformed_store_query_gets_envelope() {
        let response = send(
            Request::get("/api/stores?lat=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_bad_request_envelope(response).await;
    }

    #[tokio::test]
    async fn admin_logout_is_open() {
        let response = send(
            Request::post("/api/admin/logout")
                .body(Body::empty())
                .unwrap(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(header::SET_COOKIE));
    }

    #[tokio::test]
    async fn kakao_login_redirect() {
        let response = send(
            Request::get("/api/auth/kakao/login")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::FOUND);
    }
}
