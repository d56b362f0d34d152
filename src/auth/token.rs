use std::fmt;

use chrono::{DateTime, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::JwtConfig;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Represents the claims encoded within an issued token.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// The authenticated user's id.
    #[serde(rename = "userId")]
    pub user_id: Uuid,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// The signature checked out but the token is past its expiry.
    Expired,
    /// Bad signature, wrong algorithm, or malformed payload.
    Invalid(String),
    /// The token could not be produced.
    Signing(String),
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenError::Expired => write!(f, "token expired"),
            TokenError::Invalid(reason) => write!(f, "invalid token: {}", reason),
            TokenError::Signing(reason) => write!(f, "failed to sign token: {}", reason),
        }
    }
}

impl std::error::Error for TokenError {}

/// Issues and verifies HS256 tokens binding a user id.
///
/// New tokens are always signed with the active secret. Verification also
/// accepts the retired secrets from `JwtConfig::previous_secrets`, so the
/// signing secret can be rotated without logging everybody out.
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_keys: Vec<DecodingKey>,
    validation: Validation,
    ttl_seconds: i64,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let decoding_keys = std::iter::once(&config.secret)
            .chain(config.previous_secrets.iter())
            .map(|secret| DecodingKey::from_secret(secret.as_bytes()))
            .collect();

        let mut validation = Validation::new(ALGORITHM);
        validation.leeway = 0;
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_keys,
            validation,
            ttl_seconds: config.ttl_seconds,
        }
    }

    /// Issues a token for `user_id`, valid from now for the configured TTL.
    pub fn issue(&self, user_id: Uuid) -> Result<String, TokenError> {
        self.issue_at(user_id, Utc::now())
    }

    /// Issues a token as if the current time were `now`.
    pub fn issue_at(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
        let iat = now.timestamp();
        let exp = iat
            .checked_add(self.ttl_seconds)
            .ok_or_else(|| TokenError::Signing("token expiry out of range".into()))?;
        let claims = Claims { user_id, iat, exp };
        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verifies `token` and returns the user id it was issued for.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.decode(token).map(|claims| claims.user_id)
    }

    pub fn decode(&self, token: &str) -> Result<Claims, TokenError> {
        let mut last_error = TokenError::Invalid("no verification key configured".into());
        for key in &self.decoding_keys {
            match decode::<Claims>(token, key, &self.validation) {
                Ok(data) => return Ok(data.claims),
                Err(e) => match e.kind() {
                    ErrorKind::InvalidSignature => {
                        last_error = TokenError::Invalid(e.to_string());
                    }
                    ErrorKind::ExpiredSignature => return Err(TokenError::Expired),
                    _ => return Err(TokenError::Invalid(e.to_string())),
                },
            }
        }
        Err(last_error)
    }
}
