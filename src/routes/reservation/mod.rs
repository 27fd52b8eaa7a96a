mod handler;
mod model;

pub use handler::{create_reservation, delete_reservation, list_reservations};
pub use model::{CreateReservationRequest, Reservation};
