mod handler;

pub use handler::{AdminLoginRequest, login, logout};
