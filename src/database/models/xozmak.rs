use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Business listing shown to customers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Xozmak {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category_id: Option<String>,
    pub created_by: String,
    pub state: i16,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct XozmakUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub phone_number: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub category_id: Option<String>,
}

impl XozmakUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.phone_number.is_none()
            && self.address.is_none()
            && self.latitude.is_none()
            && self.longitude.is_none()
            && self.category_id.is_none()
    }
}
