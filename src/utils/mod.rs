use axum::Json;
use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::ApiResponse;
use crate::config::Config;

pub mod geo;

pub use geo::{Coordinates, distance_between, distance_km, sort_by_distance};

pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password.as_bytes(), hash)
}

/// Opaque visitor token, `sess_` followed by 32 hex digits.
pub fn generate_session_id() -> String {
    format!("sess_{}", Uuid::new_v4().simple())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionRole {
    Admin,
    User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: SessionRole,
    pub exp: i64,
    pub iat: i64,
}

pub fn generate_token(
    subject: &str,
    role: SessionRole,
    config: &Config,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: subject.to_string(),
        role,
        exp: now + config.session_ttl().as_secs() as i64,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.session_secret.as_bytes()),
    )
}

/// Checks signature and expiry, then that the token was minted for `role`.
pub fn verify_token(
    token: &str,
    role: SessionRole,
    config: &Config,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.session_secret.as_bytes()),
        &Validation::default(),
    )?;

    if token_data.claims.role != role {
        return Err(jsonwebtoken::errors::ErrorKind::InvalidToken.into());
    }

    Ok(token_data.claims)
}

pub fn success_to_api_response<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        ok: true,
        data: Some(data),
        error: None,
    })
}

pub fn error_to_api_response<T>(error: impl Into<String>) -> Json<ApiResponse<T>> {
    Json(ApiResponse {
        ok: false,
        data: None,
        error: Some(error.into()),
    })
}

/// `{ "ok": true }` with no payload.
pub fn ok_response() -> Json<ApiResponse<()>> {
    Json(ApiResponse {
        ok: true,
        data: None,
        error: None,
    })
}

pub mod error_codes {
    pub const UNKNOWN_ERROR: &str = "unknown_error";
    pub const MISSING_CONFIG: &str = "missing_config";
    pub const INVALID_CONFIG: &str = "invalid_config";
    pub const UNAUTHORIZED: &str = "unauthorized";
    pub const NOT_FOUND: &str = "not_found";
    pub const RATE_LIMITED: &str = "rate_limited";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_ids_are_prefixed_and_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert!(a.starts_with("sess_"));
        assert_eq!(a.len(), "sess_".len() + 32);
        assert_ne!(a, b);
    }

    #[test]
    fn admin_token_verifies_with_same_secret() {
        let config = Config::for_tests();
        let token = generate_token("admin", SessionRole::Admin, &config).unwrap();
        let claims = verify_token(&token, SessionRole::Admin, &config).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.exp - claims.iat == config.session_ttl().as_secs() as i64);
    }

    #[test]
    fn token_rejected_for_other_role_or_secret() {
        let config = Config::for_tests();
        let user_token = generate_token("u-1", SessionRole::User, &config).unwrap();
        assert!(verify_token(&user_token, SessionRole::Admin, &config).is_err());

        let mut other = Config::for_tests();
        other.session_secret = "a-completely-different-signing-secret".into();
        assert!(verify_token(&user_token, SessionRole::User, &other).is_err());
    }

    #[test]
    fn presence_flag_is_not_a_session() {
        let config = Config::for_tests();
        assert!(verify_token("1", SessionRole::Admin, &config).is_err());
        assert!(verify_token("true", SessionRole::Admin, &config).is_err());
    }

    #[test]
    fn error_envelope_omits_data() {
        let Json(body) = error_to_api_response::<()>("boom");
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "ok": false, "error": "boom" }));
    }
}
