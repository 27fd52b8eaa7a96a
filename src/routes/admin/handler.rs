use axum::{
    extract::State,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::{
    AppState,
    error::{AppError, AppResult},
    extract::AppJson,
    middleware::{ADMIN_COOKIE, cleared_cookie, session_cookie},
    utils::{SessionRole, generate_token, ok_response, verify_password},
};

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

#[axum::debug_handler]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    AppJson(req): AppJson<AdminLoginRequest>,
) -> AppResult<impl IntoResponse> {
    let hash = state
        .config
        .admin_password_hash
        .as_deref()
        .ok_or(AppError::MissingConfig("ADMIN_PASSWORD_HASH"))?;

    if !verify_password(&req.password, hash)? {
        tracing::warn!("admin login rejected");
        return Err(AppError::Unauthorized);
    }

    let token = generate_token("admin", SessionRole::Admin, &state.config)?;
    let jar = jar.add(session_cookie(ADMIN_COOKIE, token, &state.config));
    tracing::info!("admin logged in");

    Ok((jar, ok_response()))
}

#[axum::debug_handler]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(cleared_cookie(ADMIN_COOKIE)), ok_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::{
        body::to_bytes,
        http::{StatusCode, header},
    };

    async fn call_login(config: Config, password: &str) -> axum::response::Response {
        let state = AppState::for_tests(config);
        login(
            State(state),
            CookieJar::new(),
            AppJson(AdminLoginRequest {
                password: password.into(),
            }),
        )
        .await
        .into_response()
    }

    #[tokio::test]
    async fn logout_clears_cookie() {
        let response = logout(CookieJar::new()).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("hama_admin=;"));
        assert!(set_cookie.contains("Max-Age=0"));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), br#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn login_sets_signed_cookie() {
        let mut config = Config::for_tests();
        config.admin_password_hash = Some(bcrypt::hash("hunter22", 4).unwrap());

        let response = call_login(config.clone(), "hunter22").await;
        assert_eq!(response.status(), StatusCode::OK);

        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        let token = set_cookie
            .strip_prefix("hama_admin=")
            .and_then(|rest| rest.split(';').next())
            .unwrap();
        assert!(crate::utils::verify_token(token, SessionRole::Admin, &config).is_ok());
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let mut config = Config::for_tests();
        config.admin_password_hash = Some(bcrypt::hash("hunter22", 4).unwrap());

        let response = call_login(config, "guess").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn missing_hash_is_500() {
        let response = call_login(Config::for_tests(), "anything").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
