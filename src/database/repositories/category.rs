use async_trait::async_trait;

use super::PgStore;
use crate::database::models::{Category, CategoryUpdate, SubCategory, SubCategoryUpdate};
use crate::database::{STATE_ACTIVE, STATE_INACTIVE, StoreError, ensure_rows_affected};

const CATEGORY: &str = "category";
const SUB_CATEGORY: &str = "sub category";

#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn create_category(&self, category: &Category) -> Result<(), StoreError>;

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError>;

    async fn update_category(&self, id: &str, update: &CategoryUpdate) -> Result<Category, StoreError>;

    async fn delete_category(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
pub trait SubCategoryStore: Send + Sync {
    /// Fails with `StoreError::ReferenceNotFound` for an unknown parent category.
    async fn create_sub_category(&self, sub_category: &SubCategory) -> Result<(), StoreError>;

    /// Active sub-categories, optionally narrowed to one parent.
    async fn list_sub_categories(&self, category_id: Option<&str>) -> Result<Vec<SubCategory>, StoreError>;

    async fn update_sub_category(
        &self,
        id: &str,
        update: &SubCategoryUpdate,
    ) -> Result<SubCategory, StoreError>;

    async fn delete_sub_category(&self, id: &str) -> Result<(), StoreError>;
}

#[async_trait]
impl CategoryStore for PgStore {
    async fn create_category(&self, category: &Category) -> Result<(), StoreError> {
        let result = sqlx::query("INSERT INTO category (id, name, state) VALUES ($1, $2, $3)")
            .bind(&category.id)
            .bind(&category.name)
            .bind(category.state)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(CATEGORY, e))?;

        ensure_rows_affected(CATEGORY, result)
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        sqlx::query_as::<_, Category>("SELECT id, name, state FROM category WHERE state = $1")
            .bind(STATE_ACTIVE)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(CATEGORY, e))
    }

    async fn update_category(&self, id: &str, update: &CategoryUpdate) -> Result<Category, StoreError> {
        sqlx::query_as::<_, Category>(
            r#"
            UPDATE category
            SET name = COALESCE($2, name)
            WHERE id = $1 AND state = $3
            RETURNING id, name, state
            "#,
        )
        .bind(id)
        .bind(&update.name)
        .bind(STATE_ACTIVE)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(CATEGORY, e))?
        .ok_or(StoreError::RowsAffectedZero(CATEGORY))
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE category SET state = $2 WHERE id = $1 AND state = $3")
            .bind(id)
            .bind(STATE_INACTIVE)
            .bind(STATE_ACTIVE)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(CATEGORY, e))?;

        ensure_rows_affected(CATEGORY, result)
    }
}

#[async_trait]
impl SubCategoryStore for PgStore {
    async fn create_sub_category(&self, sub_category: &SubCategory) -> Result<(), StoreError> {
        let result = sqlx::query(
            "INSERT INTO sub_category (id, category_id, name, state) VALUES ($1, $2, $3, $4)",
        )
        .bind(&sub_category.id)
        .bind(&sub_category.category_id)
        .bind(&sub_category.name)
        .bind(sub_category.state)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(SUB_CATEGORY, e))?;

        ensure_rows_affected(SUB_CATEGORY, result)
    }

    async fn list_sub_categories(&self, category_id: Option<&str>) -> Result<Vec<SubCategory>, StoreError> {
        sqlx::query_as::<_, SubCategory>(
            r#"
            SELECT id, category_id, name, state
            FROM sub_category
            WHERE state = $1 AND ($2::TEXT IS NULL OR category_id = $2)
            "#,
        )
        .bind(STATE_ACTIVE)
        .bind(category_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(SUB_CATEGORY, e))
    }

    async fn update_sub_category(
        &self,
        id: &str,
        update: &SubCategoryUpdate,
    ) -> Result<SubCategory, StoreError> {
        sqlx::query_as::<_, SubCategory>(
            r#"
            UPDATE sub_category
            SET category_id = COALESCE($2, category_id),
                name = COALESCE($3, name)
            WHERE id = $1 AND state = $4
            RETURNING id, category_id, name, state
            "#,
        )
        .bind(id)
        .bind(&update.category_id)
        .bind(&update.name)
        .bind(STATE_ACTIVE)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::from_sqlx(SUB_CATEGORY, e))?
        .ok_or(StoreError::RowsAffectedZero(SUB_CATEGORY))
    }

    async fn delete_sub_category(&self, id: &str) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE sub_category SET state = $2 WHERE id = $1 AND state = $3")
            .bind(id)
            .bind(STATE_INACTIVE)
            .bind(STATE_ACTIVE)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from_sqlx(SUB_CATEGORY, e))?;

        ensure_rows_affected(SUB_CATEGORY, result)
    }
}
