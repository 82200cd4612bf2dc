use serde::Deserialize;

use crate::database::{STATE_ACTIVE, Xozmak, XozmakUpdate};
use crate::error::AppError;
use crate::routes::user::validate_coordinates;
use crate::utils::{new_id, required_field};

#[derive(Debug, Deserialize)]
pub struct CreateXozmakRequest {
    pub name: String,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category_id: Option<String>,
}

impl CreateXozmakRequest {
    pub fn into_xozmak(self, created_by: String) -> Result<Xozmak, AppError> {
        let name = required_field("name", &self.name)?;
        check_position(self.latitude, self.longitude)?;

        Ok(Xozmak {
            id: new_id(),
            name,
            description: self.description,
            phone_number: self.phone_number,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
            category_id: self.category_id,
            created_by,
            state: STATE_ACTIVE,
        })
    }
}

pub fn validate_update(update: &XozmakUpdate) -> Result<(), AppError> {
    if update.is_empty() {
        return Err(AppError::Validation("nothing to update".into()));
    }
    if let Some(name) = &update.name {
        required_field("name", name)?;
    }
    check_position(update.latitude, update.longitude)
}

fn check_position(latitude: Option<f64>, longitude: Option<f64>) -> Result<(), AppError> {
    validate_coordinates(latitude.unwrap_or_default(), longitude.unwrap_or_default())
}
