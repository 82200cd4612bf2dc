//! Phone-number registration.
//!
//! A registration consumes the one-time code that the send-code flow left in the
//! verification cache, creates the account row and hands back a fresh token pair.
//! Every step runs once, in order; nothing is retried.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::cache::VerificationCache;
use crate::database::{AccountStore, StoreError, UserAccount};
use crate::error::AppError;
use crate::utils::token::{TokenClaims, TokenIssuer, TokenPair};
use crate::utils::{new_id, required_field};

#[derive(Debug, Clone, Deserialize)]
pub struct RegistrationRequest {
    /// Client supplied ids are ignored, the server always generates one.
    #[serde(default)]
    pub id: Option<String>,
    pub phone_number: String,
    pub code: String,
    #[serde(default)]
    pub fcm_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationResult {
    pub id: String,
    #[serde(flatten)]
    pub tokens: TokenPair,
}

pub struct Registration {
    cache: Arc<dyn VerificationCache>,
    accounts: Arc<dyn AccountStore>,
    tokens: Arc<TokenIssuer>,
    bypass_code: Option<String>,
}

impl Registration {
    pub fn new(
        cache: Arc<dyn VerificationCache>,
        accounts: Arc<dyn AccountStore>,
        tokens: Arc<TokenIssuer>,
    ) -> Self {
        Self {
            cache,
            accounts,
            tokens,
            bypass_code: None,
        }
    }

    /// Accept `code` for any phone number in addition to the cached one.
    pub fn with_bypass_code(mut self, code: Option<String>) -> Self {
        self.bypass_code = code;
        self
    }

    pub async fn register(
        &self,
        req: RegistrationRequest,
        cancel: &CancellationToken,
    ) -> Result<RegistrationResult, AppError> {
        let phone_number = required_field("phone_number", &req.phone_number)?;
        tracing::info!(%phone_number, "Registration started");

        ensure_active(cancel)?;
        let stored_code = match self.cache.pending_code(&phone_number).await {
            Ok(Some(code)) => code,
            Ok(None) => return Err(AppError::InvalidOrExpiredCode),
            Err(e) => {
                tracing::error!(%phone_number, error = %e, "Failed to read verification code");
                return Err(AppError::VerificationUnavailable(e));
            }
        };

        let submitted = req.code.trim();
        if submitted != stored_code && !self.is_bypass(submitted) {
            tracing::info!(%phone_number, "Registration rejected: code mismatch");
            return Err(AppError::InvalidCode);
        }

        ensure_active(cancel)?;
        let account = UserAccount {
            id: new_id(),
            phone_number,
            fcm_token: req.fcm_token,
        };
        match self.accounts.create_account(&account).await {
            Ok(()) => {}
            Err(StoreError::AlreadyExists(_)) => return Err(AppError::AccountAlreadyExists),
            Err(e) => {
                tracing::error!(phone_number = %account.phone_number, error = %e, "Failed to store account");
                return Err(AppError::Persistence(e));
            }
        }

        let tokens = match self.issue_tokens(&account.id, cancel) {
            Ok(tokens) => tokens,
            Err(e) => {
                self.discard_account(&account.id).await;
                return Err(e);
            }
        };

        tracing::info!(id = %account.id, "Registration finished");
        Ok(RegistrationResult {
            id: account.id,
            tokens,
        })
    }

    fn is_bypass(&self, submitted: &str) -> bool {
        self.bypass_code
            .as_deref()
            .is_some_and(|bypass| !bypass.is_empty() && bypass == submitted)
    }

    fn issue_tokens(&self, id: &str, cancel: &CancellationToken) -> Result<TokenPair, AppError> {
        ensure_active(cancel)?;
        self.tokens
            .issue_pair(&TokenClaims::for_user(id))
            .map_err(|e| {
                tracing::error!(%id, error = %e, "Failed to issue tokens");
                AppError::TokenIssuance(e)
            })
    }

    // Without credentials the account would be unusable and block the phone number.
    async fn discard_account(&self, id: &str) {
        if let Err(e) = self.accounts.remove_account(id).await {
            tracing::error!(%id, error = %e, "Failed to remove account after token failure");
        }
    }
}

fn ensure_active(cancel: &CancellationToken) -> Result<(), AppError> {
    if cancel.is_cancelled() {
        return Err(AppError::Cancelled);
    }
    Ok(())
}
