mod handler;
mod model;

pub use handler::{get_store, list_stores};
pub use model::{RankedStore, Store, rank_stores};
