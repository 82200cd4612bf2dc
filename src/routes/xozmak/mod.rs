mod handler;
mod model;

pub use handler::{create_xozmak, delete_xozmak, list_xozmaks, update_xozmak};
