mod handler;
mod model;

pub use handler::{add_location, get_profile, list_locations, register, update_profile};
pub(crate) use model::validate_coordinates;
