use std::sync::OnceLock;

use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::HashingParams;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Built once at startup from immutable configuration and shared read-only
/// across requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    unknown_account_hash: OnceLock<Option<String>>,
}

const UNKNOWN_ACCOUNT_PASSWORD: &str = "no-such-account";

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with default hashing cost.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    /// * `token_ttl` - Lifetime of issued tokens
    ///
    /// # Returns
    /// Configured Authenticator instance
    pub fn new(jwt_secret: &[u8], token_ttl: Duration) -> Self {
        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret, token_ttl),
            unknown_account_hash: OnceLock::new(),
        }
    }

    /// Create a new authenticator with explicit hashing cost.
    ///
    /// # Errors
    /// * `InvalidParams` - Hashing parameters are rejected by argon2
    pub fn with_hashing_params(
        jwt_secret: &[u8],
        token_ttl: Duration,
        params: HashingParams,
    ) -> Result<Self, PasswordError> {
        Ok(Self {
            password_hasher: PasswordHasher::with_params(params)?,
            jwt_handler: JwtHandler::new(jwt_secret, token_ttl),
            unknown_account_hash: OnceLock::new(),
        })
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate a JWT token for `subject`.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier embedded in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: impl ToString,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.jwt_handler.issue(subject)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Reject a login for an account that does not exist.
    ///
    /// Runs one verification against a placeholder digest built with the
    /// configured params, so the rejection costs as much as a wrong password.
    pub fn reject_unknown_account(&self, password: &str) -> AuthenticationError {
        let digest = self
            .unknown_account_hash
            .get_or_init(|| self.password_hasher.hash(UNKNOWN_ACCOUNT_PASSWORD).ok());

        if let Some(digest) = digest {
            let _ = self.password_hasher.verify(password, digest);
        }

        AuthenticationError::InvalidCredentials
    }

    /// Generate JWT token without password verification.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, subject: impl ToString) -> Result<String, JwtError> {
        self.jwt_handler.issue(subject)
    }

    /// Validate a JWT token and return its claims.
    ///
    /// # Errors
    /// * `JwtError` - Token is malformed, forged or expired
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }
}
