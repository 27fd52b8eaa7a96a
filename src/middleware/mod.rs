mod auth;
mod error_handler;
mod rate_limit;
mod session;

pub use auth::{ADMIN_LOGIN_PATH, admin_gate, is_protected_admin_path};
pub use error_handler::log_errors;
pub use rate_limit::{RateLimiter, client_ip, rate_limit};
pub use session::{
    ADMIN_COOKIE, OptionalUser, RequireAdmin, USER_COOKIE, cleared_cookie, session_cookie,
    session_from_jar,
};
