//! In-memory store used by the registration and router tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::models::{
    Category, CategoryUpdate, ProfileUpdate, SubCategory, SubCategoryUpdate, UserAccount,
    UserLocation, UserProfile, Xozmak, XozmakUpdate,
};
use super::repositories::{
    AccountStore, CategoryStore, LocationStore, ProfileStore, SubCategoryStore, XozmakStore,
};
use super::{STATE_ACTIVE, STATE_INACTIVE, StoreError};

#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserProfile>>,
    locations: RwLock<Vec<UserLocation>>,
    xozmaks: RwLock<HashMap<String, Xozmak>>,
    categories: RwLock<HashMap<String, Category>>,
    sub_categories: RwLock<HashMap<String, SubCategory>>,
    broken: AtomicBool,
}

impl MemoryStore {
    /// Every following call fails like a lost connection.
    pub fn break_connection(&self) {
        self.broken.store(true, Ordering::SeqCst);
    }

    pub async fn account_count(&self) -> usize {
        self.users.read().await.len()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.broken.load(Ordering::SeqCst) {
            return Err(StoreError::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

fn patch(target: &mut Option<String>, value: &Option<String>) {
    if value.is_some() {
        target.clone_from(value);
    }
}

#[async_trait]
impl AccountStore for MemoryStore {
    async fn create_account(&self, account: &UserAccount) -> Result<(), StoreError> {
        self.check()?;
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.id == account.id || u.phone_number == account.phone_number)
        {
            return Err(StoreError::AlreadyExists("account"));
        }
        users.insert(
            account.id.clone(),
            UserProfile {
                id: account.id.clone(),
                phone_number: account.phone_number.clone(),
                first_name: None,
                last_name: None,
                fcm_token: Some(account.fcm_token.clone()),
                created_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn remove_account(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        self.users
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or(StoreError::RowsAffectedZero("account"))
    }
}

#[async_trait]
impl ProfileStore for MemoryStore {
    async fn get_profile(&self, id: &str) -> Result<UserProfile, StoreError> {
        self.check()?;
        self.users
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound("user profile"))
    }

    async fn update_profile(&self, id: &str, update: &ProfileUpdate) -> Result<UserProfile, StoreError> {
        self.check()?;
        let mut users = self.users.write().await;
        let user = users
            .get_mut(id)
            .ok_or(StoreError::RowsAffectedZero("user profile"))?;
        patch(&mut user.first_name, &update.first_name);
        patch(&mut user.last_name, &update.last_name);
        patch(&mut user.fcm_token, &update.fcm_token);
        Ok(user.clone())
    }
}

#[async_trait]
impl LocationStore for MemoryStore {
    async fn insert_location(&self, location: &UserLocation) -> Result<(), StoreError> {
        self.check()?;
        if !self.users.read().await.contains_key(&location.user_id) {
            return Err(StoreError::ReferenceNotFound("user location"));
        }
        self.locations.write().await.push(location.clone());
        Ok(())
    }

    async fn list_locations(&self, user_id: &str) -> Result<Vec<UserLocation>, StoreError> {
        self.check()?;
        Ok(self
            .locations
            .read()
            .await
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl XozmakStore for MemoryStore {
    async fn create_xozmak(&self, xozmak: &Xozmak) -> Result<(), StoreError> {
        self.check()?;
        let mut xozmaks = self.xozmaks.write().await;
        if xozmaks.values().any(|x| x.id == xozmak.id || x.name == xozmak.name) {
            return Err(StoreError::AlreadyExists("xozmak"));
        }
        xozmaks.insert(xozmak.id.clone(), xozmak.clone());
        Ok(())
    }

    async fn list_xozmaks(&self) -> Result<Vec<Xozmak>, StoreError> {
        self.check()?;
        Ok(self
            .xozmaks
            .read()
            .await
            .values()
            .filter(|x| x.state == STATE_ACTIVE)
            .cloned()
            .collect())
    }

    async fn update_xozmak(&self, id: &str, update: &XozmakUpdate) -> Result<Xozmak, StoreError> {
        self.check()?;
        let mut xozmaks = self.xozmaks.write().await;
        let xozmak = xozmaks
            .get_mut(id)
            .filter(|x| x.state == STATE_ACTIVE)
            .ok_or(StoreError::RowsAffectedZero("xozmak"))?;
        if let Some(name) = &update.name {
            xozmak.name.clone_from(name);
        }
        patch(&mut xozmak.description, &update.description);
        patch(&mut xozmak.phone_number, &update.phone_number);
        patch(&mut xozmak.address, &update.address);
        patch(&mut xozmak.category_id, &update.category_id);
        if update.latitude.is_some() {
            xozmak.latitude = update.latitude;
        }
        if update.longitude.is_some() {
            xozmak.longitude = update.longitude;
        }
        Ok(xozmak.clone())
    }

    async fn delete_xozmak(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut xozmaks = self.xozmaks.write().await;
        let xozmak = xozmaks
            .get_mut(id)
            .filter(|x| x.state == STATE_ACTIVE)
            .ok_or(StoreError::RowsAffectedZero("xozmak"))?;
        xozmak.state = STATE_INACTIVE;
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    async fn create_category(&self, category: &Category) -> Result<(), StoreError> {
        self.check()?;
        let mut categories = self.categories.write().await;
        if categories.values().any(|c| c.name == category.name) {
            return Err(StoreError::AlreadyExists("category"));
        }
        categories.insert(category.id.clone(), category.clone());
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, StoreError> {
        self.check()?;
        Ok(self
            .categories
            .read()
            .await
            .values()
            .filter(|c| c.state == STATE_ACTIVE)
            .cloned()
            .collect())
    }

    async fn update_category(&self, id: &str, update: &CategoryUpdate) -> Result<Category, StoreError> {
        self.check()?;
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(id)
            .filter(|c| c.state == STATE_ACTIVE)
            .ok_or(StoreError::RowsAffectedZero("category"))?;
        if let Some(name) = &update.name {
            category.name.clone_from(name);
        }
        Ok(category.clone())
    }

    async fn delete_category(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut categories = self.categories.write().await;
        let category = categories
            .get_mut(id)
            .filter(|c| c.state == STATE_ACTIVE)
            .ok_or(StoreError::RowsAffectedZero("category"))?;
        category.state = STATE_INACTIVE;
        Ok(())
    }
}

#[async_trait]
impl SubCategoryStore for MemoryStore {
    async fn create_sub_category(&self, sub_category: &SubCategory) -> Result<(), StoreError> {
        self.check()?;
        if !self
            .categories
            .read()
            .await
            .contains_key(&sub_category.category_id)
        {
            return Err(StoreError::ReferenceNotFound("sub category"));
        }
        self.sub_categories
            .write()
            .await
            .insert(sub_category.id.clone(), sub_category.clone());
        Ok(())
    }

    async fn list_sub_categories(&self, category_id: Option<&str>) -> Result<Vec<SubCategory>, StoreError> {
        self.check()?;
        Ok(self
            .sub_categories
            .read()
            .await
            .values()
            .filter(|s| s.state == STATE_ACTIVE)
            .filter(|s| category_id.is_none_or(|id| s.category_id == id))
            .cloned()
            .collect())
    }

    async fn update_sub_category(
        &self,
        id: &str,
        update: &SubCategoryUpdate,
    ) -> Result<SubCategory, StoreError> {
        self.check()?;
        if let Some(category_id) = &update.category_id {
            if !self.categories.read().await.contains_key(category_id) {
                return Err(StoreError::ReferenceNotFound("sub category"));
            }
        }
        let mut sub_categories = self.sub_categories.write().await;
        let sub_category = sub_categories
            .get_mut(id)
            .filter(|s| s.state == STATE_ACTIVE)
            .ok_or(StoreError::RowsAffectedZero("sub category"))?;
        if let Some(category_id) = &update.category_id {
            sub_category.category_id.clone_from(category_id);
        }
        if let Some(name) = &update.name {
            sub_category.name.clone_from(name);
        }
        Ok(sub_category.clone())
    }

    async fn delete_sub_category(&self, id: &str) -> Result<(), StoreError> {
        self.check()?;
        let mut sub_categories = self.sub_categories.write().await;
        let sub_category = sub_categories
            .get_mut(id)
            .filter(|s| s.state == STATE_ACTIVE)
            .ok_or(StoreError::RowsAffectedZero("sub category"))?;
        sub_category.state = STATE_INACTIVE;
        Ok(())
    }
}
