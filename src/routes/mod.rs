pub mod admin;
pub mod auth;
pub mod health;
pub mod local;
pub mod reservation;
pub mod store;
