use axum::{
    extract::State,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, AppResult},
    extract::AppQuery,
    middleware::{OptionalUser, USER_COOKIE, cleared_cookie, session_cookie},
    utils::{SessionRole, generate_token, ok_response, success_to_api_response},
};

use super::model::{KakaoCallbackQuery, User};

const LOGIN_FAILED_PATH: &str = "/?login=failed";

fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

#[axum::debug_handler]
pub async fn kakao_login(State(state): State<AppState>) -> AppResult<Response> {
    let url = state.kakao.authorize_url()?;
    Ok(found(url.as_str()))
}

async fn complete_kakao_login(state: &AppState, code: &str) -> AppResult<User> {
    let token = state.kakao.exchange_code(code).await?;
    let profile = state.kakao.fetch_profile(&token.access_token).await?;
    Ok(User::upsert_from_kakao(&state.pool, &profile).await?)
}

#[axum::debug_handler]
pub async fn kakao_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    AppQuery(query): AppQuery<KakaoCallbackQuery>,
) -> Response {
    if let Some(error) = query.error.as_deref() {
        tracing::warn!(
            "kakao login cancelled: {} {}",
            error,
            query.error_description.as_deref().unwrap_or_default()
        );
        return found(LOGIN_FAILED_PATH);
    }
    let Some(code) = query.code.as_deref().filter(|c| !c.is_empty()) else {
        return found(LOGIN_FAILED_PATH);
    };

    let user = match complete_kakao_login(&state, code).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("kakao login failed: {}", e);
            return found(LOGIN_FAILED_PATH);
        }
    };

    match generate_token(&user.id.to_string(), SessionRole::User, &state.config) {
        Ok(token) => {
            tracing::info!("user {} logged in via kakao", user.id);
            let jar = jar.add(session_cookie(USER_COOKIE, token, &state.config));
            (jar, found("/")).into_response()
        }
        Err(e) => {
            tracing::error!("failed to sign user session: {}", e);
            found(LOGIN_FAILED_PATH)
        }
    }
}

/// Current user from the session cookie.
#[axum::debug_handler]
pub async fn me(
    State(state): State<AppState>,
    OptionalUser(claims): OptionalUser,
) -> AppResult<impl IntoResponse> {
    let claims = claims.ok_or(AppError::Unauthorized)?;
    let id = Uuid::parse_str(&claims.sub).map_err(|_| AppError::Unauthorized)?;

    let user = User::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(success_to_api_response(user))
}

#[axum::debug_handler]
pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    (jar.add(cleared_cookie(USER_COOKIE)), ok_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn callback_query(code: Option<&str>, error: Option<&str>) -> KakaoCallbackQuery {
        KakaoCallbackQuery {
            code: code.map(Into::into),
            error: error.map(Into::into),
            error_description: None,
        }
    }

    #[tokio::test]
    async fn login_redirects_to_kakao_with_302() {
        let state = AppState::for_tests(Config::for_tests());
        let response = kakao_login(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::FOUND);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(location.starts_with("https://kauth.kakao.com/oauth/authorize?"));
        assert!(location.contains("client_id=test-client"));
        assert!(location.contains("response_type=code"));
    }

    #[tokio::test]
    async fn login_without_client_id_is_500() {
        let mut config = Config::for_tests();
        config.kakao_client_id = None;
        let state = AppState::for_tests(config);
        let response = kakao_login(State(state)).await.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn callback_with_error_goes_back_home() {
        let state = AppState::for_tests(Config::for_tests());
        let response = kakao_callback(
            State(state),
            CookieJar::new(),
            AppQuery(callback_query(None, Some("access_denied"))),
        )
        .await;

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()[header::LOCATION], LOGIN_FAILED_PATH);
        assert!(response.headers().get(header::SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn callback_without_code_goes_back_home() {
        let state = AppState::for_tests(Config::for_tests());
        let response = kakao_callback(
            State(state),
            CookieJar::new(),
            AppQuery(callback_query(Some(""), None)),
        )
        .await;

        assert_eq!(response.headers()[header::LOCATION], LOGIN_FAILED_PATH);
    }

    #[tokio::test]
    async fn me_without_cookie_is_401() {
        let state = AppState::for_tests(Config::for_tests());
        let response = me(State(state), OptionalUser(None)).await.into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_clears_user_cookie() {
        let response = logout(CookieJar::new()).await.into_response();
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.starts_with("hama_session=;"));
        assert!(set_cookie.contains("Max-Age=0"));
    }
}
