use async_trait::async_trait;

use super::PgStore;
use crate::database::models::UserLocation;
use crate::database::{StoreError, ensure_rows_affected};

const LOCATION: &str = "user location";

#[async_trait]
pub trait LocationStore: Send + Sync {
    async fn insert_location(&self, location: &UserLocation) -> Result<(), StoreError>;

    async fn list_locations(&self, user_id: &str) -> Result<Vec<UserLocation>, StoreError>;
}

#[async_trait]
impl LocationStore for PgStore {
    async fn insert_location(&self, location: &UserLocation) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users_locations (id, user_id, name, address, latitude, longitude)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&location.id)
        .bind(&location.user_id)
        .bind(&location.name)
        .bind(&location.address)
        .bind(location.latitude)
        .bind(location.longitude)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(LOCATION, e))?;

        ensure_rows_affected(LOCATION, result)
    }

    async fn list_locations(&self, user_id: &str) -> Result<Vec<UserLocation>, StoreError> {
        sqlx::query_as::<_, UserLocation>(
            r#"
            SELECT id, user_id, name, address, latitude, longitude
            FROM users_locations
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(LOCATION, e))
    }
}
