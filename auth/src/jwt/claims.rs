use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Identity claims carried by an access token.
///
/// The subject identifies the owning user; `iat` and `exp` bound the
/// token's lifetime. No other validity state exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for a subject issued at `issued_at` and valid for `ttl`.
    ///
    /// # Arguments
    /// * `subject` - Unique user identifier
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Lifetime of the token
    ///
    /// # Returns
    /// Claims with sub, iat and exp set
    ///
    /// # Errors
    /// * `EncodingFailed` - `issued_at + ttl` is outside the representable range
    pub fn for_subject(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, JwtError> {
        let expiration = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            JwtError::EncodingFailed(format!("Token lifetime out of range: {}", ttl))
        })?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Parse the subject back into the caller's identifier type.
    ///
    /// # Errors
    /// * `Malformed` - Subject does not parse as `T`
    pub fn subject<T: FromStr>(&self) -> Result<T, JwtError> {
        self.sub
            .parse()
            .map_err(|_| JwtError::Malformed(format!("Invalid subject: {}", self.sub)))
    }
}
