mod handler;
mod model;

pub use handler::{reverse_geocode, search_keyword, search_local_places};
pub use model::{MAX_SEARCH_RESULTS, PLACES, Place, search_places};
