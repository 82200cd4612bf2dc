use async_trait::async_trait;

use super::PgStore;
use crate::database::models::{ProfileUpdate, UserAccount, UserProfile};
use crate::database::{StoreError, ensure_rows_affected};

const ACCOUNT: &str = "account";
const PROFILE: &str = "user profile";

/// The only persistence capability registration depends on.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `StoreError::AlreadyExists` when the phone number is taken.
    async fn create_account(&self, account: &UserAccount) -> Result<(), StoreError>;

    /// Compensation for a registration that could not issue credentials.
    async fn remove_account(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: &str) -> Result<UserProfile, StoreError>;

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError>;
}

#[async_trait]
impl AccountStore for PgStore {
    async fn create_account(&self, account: &UserAccount) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (id, phone_number, fcm_token)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&account.id)
        .bind(&account.phone_number)
        .bind(&account.fcm_token)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(ACCOUNT, e))?;

        ensure_rows_affected(ACCOUNT, result)
    }

    async fn remove_account(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(ACCOUNT, e))?;

        ensure_rows_affected(ACCOUNT, result)
    }
}

#[async_trait]
impl ProfileStore for PgStore {
    async fn get_profile(&self, id: &str) -> Result<UserProfile, StoreError> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT id, phone_number, first_name, last_name, fcm_token, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(PROFILE, e))?
        .ok_or(StoreError::NotFound(PROFILE))
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        sqlx::query_as::<_, UserProfile>(
            r#"
            UPDATE users
            SET first_name = COALESCE($2, first_name),
                last_name = COALESCE($3, last_name),
                fcm_token = COALESCE($4, fcm_token)
            WHERE id = $1
            RETURNING id, phone_number, first_name, last_name, fcm_token, created_at
            "#,
        )
        .bind(id)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(&update.fcm_token)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(PROFILE, e))?
        .ok_or(StoreError::RowsAffectedZero(PROFILE))
    }
}
