use sqlx::PgPool;

pub mod category;
pub mod location;
pub mod user;
pub mod xozmak;

pub use category::{CategoryStore, SubCategoryStore};
pub use location::LocationStore;
pub use user::{AccountStore, ProfileStore};
pub use xozmak::XozmakStore;

/// Postgres implementation of every repository trait, sharing one pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
