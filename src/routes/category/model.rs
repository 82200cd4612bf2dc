use serde::Deserialize;

use crate::database::{Category, STATE_ACTIVE, SubCategory};
use crate::error::AppError;
use crate::utils::{new_id, required_field};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

impl CreateCategoryRequest {
    pub fn into_category(self) -> Result<Category, AppError> {
        Ok(Category {
            id: new_id(),
            name: required_field("name", &self.name)?,
            state: STATE_ACTIVE,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateSubCategoryRequest {
    pub category_id: String,
    pub name: String,
}

impl CreateSubCategoryRequest {
    pub fn into_sub_category(self) -> Result<SubCategory, AppError> {
        Ok(SubCategory {
            id: new_id(),
            category_id: required_field("category_id", &self.category_id)?,
            name: required_field("name", &self.name)?,
            state: STATE_ACTIVE,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SubCategoryQuery {
    pub category_id: Option<String>,
}
