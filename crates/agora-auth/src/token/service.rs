//! Token issuing and verification.
//!
//! Tokens are compact HS256 JWS values. Each [`TokenClass`] is signed with
//! its own secret, so a token of one class never verifies as another.

use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use agora_core::config::AuthConfig;
use agora_core::error::AppError;
use agora_core::result::AppResult;

use super::claims::Claims;
use super::class::TokenClass;

/// Why a token failed verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    /// Wrong secret, wrong class, or a substituted algorithm.
    #[error("invalid token signature")]
    InvalidSignature,
    /// Not a well-formed token.
    #[error("malformed token")]
    Malformed,
    /// Signature is valid but the token is past its expiry.
    #[error("token expired")]
    Expired,
}

impl TokenError {
    /// Machine-readable reason.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "invalid_token",
            Self::Malformed => "malformed_token",
            Self::Expired => "token_expired",
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::unauthorized(err.to_string()).with_reason(err.reason())
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            JwtErrorKind::ExpiredSignature => Self::Expired,
            JwtErrorKind::InvalidSignature | JwtErrorKind::InvalidAlgorithm => {
                Self::InvalidSignature
            }
            _ => Self::Malformed,
        }
    }
}

/// A freshly minted access + refresh pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived access token.
    pub access_token: String,
    /// Long-lived refresh token.
    pub refresh_token: String,
    /// Access token expiration timestamp.
    pub access_expires_at: DateTime<Utc>,
    /// Refresh token expiration timestamp.
    pub refresh_expires_at: DateTime<Utc>,
}

struct ClassKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

/// Issues and verifies tokens for all four classes.
pub struct TokenService {
    /// Keys indexed by [`TokenClass::index`].
    keys: [ClassKeys; 4],
    /// HS256-only validation with zero leeway.
    validation: Validation,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("validation", &self.validation)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    /// Creates a token service from auth configuration.
    ///
    /// Fails when a secret is empty or two classes share a secret.
    pub fn new(config: &AuthConfig) -> AppResult<Self> {
        config.validate()?;

        let keys = TokenClass::ALL.map(|class| {
            let secret = match class {
                TokenClass::Access => &config.access_secret,
                TokenClass::Refresh => &config.refresh_secret,
                TokenClass::PasswordReset => &config.reset_secret,
                TokenClass::Activation => &config.activation_secret,
            };
            ClassKeys {
                encoding: EncodingKey::from_secret(secret.as_bytes()),
                decoding: DecodingKey::from_secret(secret.as_bytes()),
            }
        });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Ok(Self { keys, validation })
    }

    /// Issue a token of `class` for `subject`, valid from now.
    pub fn issue(&self, class: TokenClass, subject: Uuid) -> AppResult<String> {
        self.issue_at(class, subject, Utc::now())
    }

    /// Issue a token of `class` for `subject` as if minted at `now`.
    pub fn issue_at(&self, class: TokenClass, subject: Uuid, now: DateTime<Utc>) -> AppResult<String> {
        let claims = Claims::new(class, subject, now);
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.keys[class.index()].encoding,
        )
        .map_err(|e| AppError::internal(format!("Failed to encode {class} token: {e}")))
    }

    /// Verify a token of `class` and return its subject.
    pub fn verify(&self, class: TokenClass, token: &str) -> Result<Uuid, TokenError> {
        self.decode(class, token).map(|claims| claims.sub)
    }

    /// Verify a token of `class` and return its full claim set.
    pub fn decode(&self, class: TokenClass, token: &str) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.keys[class.index()].decoding, &self.validation)?;
        Ok(data.claims)
    }

    /// Mint an access + refresh pair for `subject`.
    pub fn issue_pair(&self, subject: Uuid) -> AppResult<TokenPair> {
        let now = Utc::now();
        Ok(TokenPair {
            access_token: self.issue_at(TokenClass::Access, subject, now)?,
            refresh_token: self.issue_at(TokenClass::Refresh, subject, now)?,
            access_expires_at: now + TokenClass::Access.ttl(),
            refresh_expires_at: now + TokenClass::Refresh.ttl(),
        })
    }
}
