use std::collections::{BTreeMap, HashSet};
use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;

pub const ROLE_USER: &str = "user";
pub const ROLE_UNAUTHORIZED: &str = "unauthorized";

const CLAIM_ID: &str = "id";
const CLAIM_ROLE: &str = "role";
const RESERVED_CLAIMS: [&str; 2] = ["issued_at", "expires_at"];

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("signing key is empty")]
    EmptyKey,
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),
    #[error("token has expired")]
    Expired,
    #[error("token signature is invalid")]
    InvalidSignature,
    #[error("malformed token: {0}")]
    Malformed(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed(e.to_string()),
        }
    }
}

/// Claims carried by every token: free-form string metadata plus the validity window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    #[serde(flatten)]
    pub metadata: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issued_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}

impl TokenClaims {
    /// Claim set handed to requests without credentials.
    pub fn anonymous() -> Self {
        let mut metadata = BTreeMap::new();
        metadata.insert(CLAIM_ROLE.to_string(), ROLE_UNAUTHORIZED.to_string());
        Self {
            metadata,
            issued_at: None,
            expires_at: None,
        }
    }

    pub fn for_user(user_id: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            (CLAIM_ID.to_string(), user_id.to_string()),
            (CLAIM_ROLE.to_string(), ROLE_USER.to_string()),
        ])
    }

    pub fn role(&self) -> &str {
        self.metadata
            .get(CLAIM_ROLE)
            .map(String::as_str)
            .unwrap_or(ROLE_UNAUTHORIZED)
    }

    pub fn is_anonymous(&self) -> bool {
        self.role() == ROLE_UNAUTHORIZED
    }

    /// The account id, absent for anonymous callers.
    pub fn user_id(&self) -> Option<&str> {
        if self.is_anonymous() {
            return None;
        }
        self.metadata
            .get(CLAIM_ID)
            .map(String::as_str)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

struct SigningKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// HS256 token minting and verification with a key injected at construction.
pub struct TokenIssuer {
    keys: Option<SigningKeys>,
    validation: Validation,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    pub fn new(secret: &[u8], access_ttl: Duration, refresh_ttl: Duration) -> Self {
        let keys = (!secret.is_empty()).then(|| SigningKeys {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        });

        // expires_at is checked by hand, the registered exp claim is never written
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims = HashSet::new();
        validation.validate_exp = false;
        validation.validate_aud = false;

        Self {
            keys,
            validation,
            access_ttl,
            refresh_ttl,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.access_token_ttl(),
            config.refresh_token_ttl(),
        )
    }

    pub fn mint(&self, metadata: &BTreeMap<String, String>, ttl: Duration) -> Result<String, TokenError> {
        self.mint_at(metadata, ttl, Utc::now())
    }

    pub fn mint_at(
        &self,
        metadata: &BTreeMap<String, String>,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::EmptyKey)?;

        let issued_at = now.timestamp();
        let ttl_secs = i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX);
        let claims = TokenClaims {
            metadata: metadata
                .iter()
                .filter(|(key, _)| !RESERVED_CLAIMS.contains(&key.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            issued_at: Some(issued_at),
            expires_at: Some(issued_at.saturating_add(ttl_secs)),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding).map_err(TokenError::Signing)
    }

    /// Mints the access and refresh tokens independently; either failure aborts.
    pub fn issue_pair(&self, metadata: &BTreeMap<String, String>) -> Result<TokenPair, TokenError> {
        let access_token = self.mint(metadata, self.access_ttl)?;
        let refresh_token = self.mint(metadata, self.refresh_ttl)?;
        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    pub fn verify(&self, token: &str) -> Result<TokenClaims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<TokenClaims, TokenError> {
        let keys = self.keys.as_ref().ok_or(TokenError::EmptyKey)?;
        let claims = decode::<TokenClaims>(token, &keys.decoding, &self.validation)?.claims;

        let expires_at = claims
            .expires_at
            .ok_or_else(|| TokenError::Malformed("missing expires_at".into()))?;
        if now.timestamp() > expires_at {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Resolves an `Authorization` header value. Missing credentials and `Basic` schemes
    /// yield the anonymous claim set instead of an error.
    pub fn claims_from_header(&self, header: &str) -> Result<TokenClaims, TokenError> {
        let header = header.trim();
        if header.is_empty() || header.contains("Basic") {
            return Ok(TokenClaims::anonymous());
        }

        let token = match header.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            _ if header.eq_ignore_ascii_case("bearer") => "",
            _ => header,
        };
        if token.is_empty() {
            return Ok(TokenClaims::anonymous());
        }

        self.verify(token)
    }
}
