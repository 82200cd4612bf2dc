// Relational store: row models and per-aggregate repositories

pub mod models;
pub mod repositories;

#[cfg(test)]
pub(crate) mod memory;

use sqlx::postgres::PgQueryResult;
use thiserror::Error;

pub use models::*;
pub use repositories::{
    AccountStore, CategoryStore, LocationStore, PgStore, ProfileStore, SubCategoryStore,
    XozmakStore,
};

pub const STATE_ACTIVE: i16 = 1;
pub const STATE_INACTIVE: i16 = 0;

const PG_UNIQUE_VIOLATION: &str = "23505";
const PG_FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0} already exists")]
    AlreadyExists(&'static str),
    #[error("{0} references a record that does not exist")]
    ReferenceNotFound(&'static str),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("no rows affected after sql command on {0}")]
    RowsAffectedZero(&'static str),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    /// Classifies constraint violations reported by Postgres for `entity`.
    pub(crate) fn from_sqlx(entity: &'static str, e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            match db.code().as_deref() {
                Some(PG_UNIQUE_VIOLATION) => return StoreError::AlreadyExists(entity),
                Some(PG_FOREIGN_KEY_VIOLATION) => return StoreError::ReferenceNotFound(entity),
                _ => {}
            }
        }
        match e {
            sqlx::Error::RowNotFound => StoreError::NotFound(entity),
            e => StoreError::Database(e),
        }
    }
}

pub(crate) fn ensure_rows_affected(
    entity: &'static str,
    result: PgQueryResult,
) -> Result<(), StoreError> {
    if result.rows_affected() == 0 {
        return Err(StoreError::RowsAffectedZero(entity));
    }
    Ok(())
}
