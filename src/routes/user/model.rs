use serde::Deserialize;

use crate::database::UserLocation;
use crate::error::AppError;
use crate::utils::{new_id, required_field};

#[derive(Debug, Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
}

impl CreateLocationRequest {
    pub fn into_location(self, user_id: String) -> Result<UserLocation, AppError> {
        let name = required_field("name", &self.name)?;
        validate_coordinates(self.latitude, self.longitude)?;

        Ok(UserLocation {
            id: new_id(),
            user_id,
            name,
            address: self.address,
            latitude: self.latitude,
            longitude: self.longitude,
        })
    }
}

pub fn validate_coordinates(latitude: f64, longitude: f64) -> Result<(), AppError> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(AppError::Validation(
            "latitude must be within [-90, 90] and longitude within [-180, 180]".into(),
        ));
    }
    Ok(())
}
