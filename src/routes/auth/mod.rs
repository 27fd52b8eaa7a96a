mod handler;
mod model;

pub use handler::{kakao_callback, kakao_login, logout, me};
pub use model::User;
