use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::cache::VerificationCache;
use crate::config::Config;
use crate::database::{
    AccountStore, CategoryStore, LocationStore, ProfileStore, SubCategoryStore, XozmakStore,
};
use crate::registration::Registration;
use crate::utils::TokenIssuer;

pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod middleware;
pub mod registration;
pub mod result;
pub mod routes;
pub mod utils;

/// Everything a handler may touch, built once at start-up.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub tokens: Arc<TokenIssuer>,
    pub registration: Arc<Registration>,
    pub profiles: Arc<dyn ProfileStore>,
    pub locations: Arc<dyn LocationStore>,
    pub xozmaks: Arc<dyn XozmakStore>,
    pub categories: Arc<dyn CategoryStore>,
    pub sub_categories: Arc<dyn SubCategoryStore>,
    /// Cancelled on shutdown; in-flight registrations stop before their next step.
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new<S>(config: Config, cache: Arc<dyn VerificationCache>, store: Arc<S>) -> Self
    where
        S: AccountStore
            + ProfileStore
            + LocationStore
            + XozmakStore
            + CategoryStore
            + SubCategoryStore
            + 'static,
    {
        let tokens = Arc::new(TokenIssuer::from_config(&config));
        let registration = Registration::new(cache, store.clone(), tokens.clone())
            .with_bypass_code(config.registration_bypass_code.clone());

        Self {
            config: Arc::new(config),
            tokens,
            registration: Arc::new(registration),
            profiles: store.clone(),
            locations: store.clone(),
            xozmaks: store.clone(),
            categories: store.clone(),
            sub_categories: store,
            shutdown: CancellationToken::new(),
        }
    }
}
