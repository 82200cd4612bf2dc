use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub state: i16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SubCategory {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub state: i16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubCategoryUpdate {
    pub category_id: Option<String>,
    pub name: Option<String>,
}

impl SubCategoryUpdate {
    pub fn is_empty(&self) -> bool {
        self.category_id.is_none() && self.name.is_none()
    }
}
