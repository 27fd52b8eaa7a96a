//! Session cookies and the extractors that read them.
//!
//! Both cookies hold an HS256 token signed with `SESSION_SECRET`; a bare
//! presence flag is never accepted.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    AppState,
    config::Config,
    error::AppError,
    utils::{Claims, SessionRole, verify_token},
};

pub const ADMIN_COOKIE: &str = "hama_admin";
pub const USER_COOKIE: &str = "hama_session";

pub fn session_cookie(name: &'static str, token: String, config: &Config) -> Cookie<'static> {
    Cookie::build((name, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(config.secure_cookies)
        .max_age(time::Duration::seconds(config.session_ttl().as_secs() as i64))
        .build()
}

/// Empty value and zero max-age, so the browser drops the cookie.
pub fn cleared_cookie(name: &'static str) -> Cookie<'static> {
    Cookie::build((name, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::ZERO)
        .build()
}

pub fn session_from_jar(
    jar: &CookieJar,
    name: &str,
    role: SessionRole,
    config: &Config,
) -> Option<Claims> {
    let cookie = jar.get(name)?;
    match verify_token(cookie.value(), role, config) {
        Ok(claims) => Some(claims),
        Err(e) => {
            tracing::debug!("rejected {} cookie: {}", name, e);
            None
        }
    }
}

/// Admin API guard. Rejects with 401 JSON.
pub struct RequireAdmin(pub Claims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        session_from_jar(&jar, ADMIN_COOKIE, SessionRole::Admin, &state.config)
            .map(Self)
            .ok_or(AppError::Unauthorized)
    }
}

/// The logged-in Kakao user, if any. Never rejects.
pub struct OptionalUser(pub Option<Claims>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(session_from_jar(
            &jar,
            USER_COOKIE,
            SessionRole::User,
            &state.config,
        )))
    }
}
