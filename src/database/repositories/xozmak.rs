use async_trait::async_trait;

use super::PgStore;
use crate::database::models::{Xozmak, XozmakUpdate};
use crate::database::{STATE_ACTIVE, STATE_INACTIVE, StoreError, ensure_rows_affected};

const XOZMAK: &str = "xozmak";

#[async_trait]
pub trait XozmakStore: Send + Sync {
    async fn create_xozmak(&self, xozmak: &Xozmak) -> Result<(), StoreError>;

    /// Active listings only.
    async fn list_xozmaks(&self) -> Result<Vec<Xozmak>, StoreError>;

    async fn update_xozmak(&self, id: &str, update: &XozmakUpdate) -> Result<Xozmak, StoreError>;

    /// Flags the listing inactive; the row stays.
    async fn delete_xozmak(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl XozmakStore for PgStore {
    async fn create_xozmak(&self, xozmak: &Xozmak) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO xozmaks (
                id, name, description, phone_number, address,
                latitude, longitude, category_id, created_by, state
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(&xozmak.id)
        .bind(&xozmak.name)
        .bind(&xozmak.description)
        .bind(&xozmak.phone_number)
        .bind(&xozmak.address)
        .bind(xozmak.latitude)
        .bind(xozmak.longitude)
        .bind(&xozmak.category_id)
        .bind(&xozmak.created_by)
        .bind(xozmak.state)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(XOZMAK, e))?;

        ensure_rows_affected(XOZMAK, result)
    }

    async fn list_xozmaks(&self) -> Result<Vec<Xozmak>, StoreError> {
        sqlx::query_as::<_, Xozmak>(
            r#"
            SELECT id, name, description, phone_number, address,
                   latitude, longitude, category_id, created_by, state
            FROM xozmaks
            WHERE state = $1
            "#,
        )
        .bind(STATE_ACTIVE)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(XOZMAK, e))
    }

    async fn update_xozmak(&self, id: &str, update: &XozmakUpdate) -> Result<Xozmak, StoreError> {
        sqlx::query_as::<_, Xozmak>(
            r#"
            UPDATE xozmaks
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                phone_number = COALESCE($4, phone_number),
                address = COALESCE($5, address),
                latitude = COALESCE($6, latitude),
                longitude = COALESCE($7, longitude),
                category_id = COALESCE($8, category_id)
            WHERE id = $1 AND state = $9
            RETURNING id, name, description, phone_number, address,
                      latitude, longitude, category_id, created_by, state
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.phone_number)
        .bind(&update.address)
        .bind(update.latitude)
        .bind(update.longitude)
        .bind(&update.category_id)
        .bind(STATE_ACTIVE)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(XOZMAK, e))?
        .ok_or(StoreError::RowsAffectedZero(XOZMAK))
    }

    async fn delete_xozmak(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE xozmaks SET state = $2 WHERE id = $1 AND state = $3")
            .bind(id)
            .bind(STATE_INACTIVE)
            .bind(STATE_ACTIVE)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(XOZMAK, e))?;

        ensure_rows_affected(XOZMAK, result)
    }
}
