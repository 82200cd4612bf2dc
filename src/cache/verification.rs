use std::sync::Arc;

use async_trait::async_trait;
use redis::{AsyncCommands, Client as RedisClient};
use thiserror::Error;

use super::keys::verification_code_key;

#[derive(Debug, Error)]
#[error("verification cache unavailable: {0}")]
pub struct CacheError(#[from] pub redis::RedisError);

/// Read side of the pending verification codes written by the send-code flow.
#[async_trait]
pub trait VerificationCache: Send + Sync {
    /// `Ok(None)` when no code is pending for the phone number or it has expired.
    async fn pending_code(&self, phone_number: &str) -> Result<Option<String>, CacheError>;
}

pub struct RedisVerificationCache {
    redis: Arc<RedisClient>,
}

impl RedisVerificationCache {
    pub fn new(redis: Arc<RedisClient>) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl VerificationCache for RedisVerificationCache {
    async fn pending_code(&self, phone_number: &str) -> Result<Option<String>, CacheError> {
        let mut conn = self.redis.get_multiplexed_async_connection().await?;

        let code: Option<String> = conn.get(verification_code_key(phone_number)).await?;
        tracing::debug!(phone_number, found = code.is_some(), "Verification code lookup");

        Ok(code)
    }
}
