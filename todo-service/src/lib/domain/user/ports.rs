use async_trait::async_trait;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for registration, login and identity lookups.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user with validated credentials.
    ///
    /// # Arguments
    /// * `command` - Validated command containing name, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `Credential` - Password hashing failed
    /// * `DatabaseError` - Database operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Verify credentials and issue an access token.
    ///
    /// An unknown email and a wrong password produce the same error.
    ///
    /// # Arguments
    /// * `command` - Raw email and password
    ///
    /// # Returns
    /// Signed access token whose subject is the user's id
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such user, or the password does not match
    /// * `Credential` - Stored hash is malformed or token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError>;

    /// End a session.
    ///
    /// Tokens are stateless and nothing is stored server-side, so this
    /// always succeeds without effect; the client discards its token.
    async fn logout(&self);

    /// Retrieve the user behind an authenticated identity.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, id: UserId) -> Result<User, UserError>;
}

/// Persistence operations for user aggregate.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// Storage enforces email uniqueness; this is the authoritative guard
    /// against concurrent registrations of the same email.
    ///
    /// # Arguments
    /// * `user` - User data to insert
    ///
    /// # Returns
    /// Created user entity with its assigned id and timestamps
    ///
    /// # Errors
    /// * `EmailAlreadyExists` - Email is already registered
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by exact (case-sensitive) email address.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
}
