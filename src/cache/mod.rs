// Redis-backed verification code cache

pub mod keys;
pub mod verification;

pub use verification::{CacheError, RedisVerificationCache, VerificationCache};
