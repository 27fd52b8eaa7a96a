use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::{AppState, utils::SessionRole};

use super::session::{ADMIN_COOKIE, session_from_jar};

pub const ADMIN_LOGIN_PATH: &str = "/admin/login";

/// `/admin` and everything below it, except the login page.
pub fn is_protected_admin_path(path: &str) -> bool {
    let Some(rest) = path.strip_prefix("/admin") else {
        return false;
    };
    if !(rest.is_empty() || rest.starts_with('/')) {
        return false;
    }
    let rest = rest.trim_end_matches('/');
    !(rest == "/login" || rest.starts_with("/login/"))
}

pub async fn admin_gate(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();

    if is_protected_admin_path(path)
        && session_from_jar(&jar, ADMIN_COOKIE, SessionRole::Admin, &state.config).is_none()
    {
        tracing::debug!("no admin session for {}, redirecting to login", path);
        return Redirect::to(ADMIN_LOGIN_PATH).into_response();
    }

    next.run(request).await
}
