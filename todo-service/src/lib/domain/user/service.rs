use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;

use crate::domain::user::models::AccessToken;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Password;
use crate::domain::user::models::RegisterCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::AuthServicePort;
use crate::user::ports::UserRepository;

/// Domain service implementation for registration and login.
///
/// Argon2 work runs on the blocking pool so request workers stay responsive.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - User persistence implementation
    /// * `authenticator` - Shared password hasher and token codec
    ///
    /// # Returns
    /// Configured auth service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    async fn hash_password(&self, password: Password) -> Result<String, UserError> {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || authenticator.hash_password(password.as_str()))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| UserError::Credential(e.to_string()))
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        // Fast path only; the unique index decides under concurrent registrations
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(UserError::EmailAlreadyExists(
                command.email.as_str().to_string(),
            ));
        }

        let password_hash = self.hash_password(command.password).await?;

        let user = self
            .repository
            .create(NewUser {
                name: command.name,
                email: command.email,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError> {
        let Some(user) = self.repository.find_by_email(&command.email).await? else {
            let authenticator = Arc::clone(&self.authenticator);
            let rejection = tokio::task::spawn_blocking(move || {
                authenticator.reject_unknown_account(&command.password)
            })
            .await
            .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?;

            tracing::debug!(reason = %rejection, "Login rejected: unknown email");
            return Err(UserError::InvalidCredentials);
        };

        let authenticator = Arc::clone(&self.authenticator);
        let user_id = user.id;
        let result = tokio::task::spawn_blocking(move || {
            authenticator.authenticate(&command.password, &user.password_hash, user.id)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))?;

        match result {
            Ok(authentication) => {
                tracing::info!(user_id = %user_id, "User logged in");
                Ok(AccessToken::new(authentication.access_token))
            }
            Err(AuthenticationError::InvalidCredentials) => {
                tracing::debug!(user_id = %user_id, "Login rejected: wrong password");
                Err(UserError::InvalidCredentials)
            }
            Err(e) => Err(UserError::Credential(e.to_string())),
        }
    }

    async fn logout(&self) {}

    async fn get_user(&self, id: UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use auth::HashingParams;
    use std::time::Instant;

    use chrono::Duration;
    use chrono::Utc;
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::UserName;

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: NewUser) -> Result<User, UserError>;
            async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError>;
        }
    }

    fn test_authenticator() -> Arc<Authenticator> {
        Arc::new(
            Authenticator::with_hashing_params(
                b"test_secret_key_at_least_32_bytes!",
                Duration::hours(24),
                HashingParams {
                    memory_cost_kib: 1024,
                    time_cost: 1,
                    parallelism: 1,
                },
            )
            .unwrap(),
        )
    }

    fn stored_user(authenticator: &Authenticator, id: i64, password: &str) -> User {
        User {
            id: UserId(id),
            name: UserName::new("Alice".to_string()).unwrap(),
            email: EmailAddress::new("alice@example.com".to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn register_command() -> RegisterCommand {
        RegisterCommand::new(
            UserName::new("Alice".to_string()).unwrap(),
            EmailAddress::new("alice@example.com".to_string()).unwrap(),
            Password::new("secret123".to_string()).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = test_authenticator();

        repository
            .expect_find_by_email()
            .withf(|email| email == "alice@example.com")
            .times(1)
            .returning(|_| Ok(None));

        // Set up mock expectations
        let verifier = Arc::clone(&authenticator);
        repository
            .expect_create()
            .withf(move |user| {
                user.name.as_str() == "Alice"
                    && user.email.as_str() == "alice@example.com"
                    && user.password_hash.starts_with("$argon2id")
                    && verifier.authenticate("secret123", &user.password_hash, 1).is_ok()
            })
            .times(1)
            .returning(|user| {
                Ok(User {
                    id: UserId(1),
                    name: user.name,
                    email: user.email,
                    password_hash: user.password_hash,
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                })
            });

        let service = AuthService::new(Arc::new(repository), authenticator);

        let user = service.register(register_command()).await.unwrap();
        assert_eq!(user.id, UserId(1));
        assert_eq!(user.email.as_str(), "alice@example.com");
        assert_ne!(user.password_hash, "secret123");
    }

    #[tokio::test]
    async fn test_register_duplicate_email_short_circuits() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = test_authenticator();
        let existing = stored_user(&authenticator, 1, "other");

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(existing.clone())));
        repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_caught_by_storage() {
        let mut repository = MockTestUserRepository::new();

        // A concurrent registration slipped in between the check and the insert
        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(None));
        repository.expect_create().times(1).returning(|user| {
            Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ))
        });

        let service = AuthService::new(Arc::new(repository), test_authenticator());

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(UserError::EmailAlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_register_database_failure() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Err(UserError::DatabaseError("connection refused".to_string())));
        repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(repository), test_authenticator());

        let result = service.register(register_command()).await;
        assert!(matches!(result, Err(UserError::DatabaseError(_))));
    }

    #[tokio::test]
    async fn test_login_success_issues_token_for_user() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = test_authenticator();
        let user = stored_user(&authenticator, 5, "secret123");

        repository
            .expect_find_by_email()
            .withf(|email| email == "alice@example.com")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repository), Arc::clone(&authenticator));

        let token = service
            .login(LoginCommand {
                email: "alice@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap();

        let claims = authenticator.validate_token(token.as_str()).unwrap();
        assert_eq!(claims.subject::<UserId>().unwrap(), UserId(5));
    }

    #[tokio::test]
    async fn test_login_unknown_email_and_wrong_password_are_indistinguishable() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = test_authenticator();
        let user = stored_user(&authenticator, 5, "secret123");

        repository
            .expect_find_by_email()
            .times(2)
            .returning(move |email| {
                if email == "alice@example.com" {
                    Ok(Some(user.clone()))
                } else {
                    Ok(None)
                }
            });

        let service = AuthService::new(Arc::new(repository), authenticator);

        let unknown = service
            .login(LoginCommand {
                email: "nobody@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await
            .unwrap_err();
        let wrong_password = service
            .login(LoginCommand {
                email: "alice@example.com".to_string(),
                password: "wrong".to_string(),
            })
            .await
            .unwrap_err();

        assert!(matches!(unknown, UserError::InvalidCredentials));
        assert!(matches!(wrong_password, UserError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong_password.to_string());
    }

    async fn fastest_rejection(
        service: &AuthService<MockTestUserRepository>,
        email: &str,
    ) -> std::time::Duration {
        let mut fastest = std::time::Duration::MAX;
        for _ in 0..5 {
            let started = Instant::now();
            let result = service
                .login(LoginCommand {
                    email: email.to_string(),
                    password: "wrong".to_string(),
                })
                .await;
            fastest = fastest.min(started.elapsed());
            assert!(matches!(result, Err(UserError::InvalidCredentials)));
        }
        fastest
    }

    #[tokio::test]
    async fn test_login_unknown_email_costs_a_password_verification() {
        let mut repository = MockTestUserRepository::new();
        // Costly enough that one verification dominates scheduling noise
        let authenticator = Arc::new(
            Authenticator::with_hashing_params(
                b"test_secret_key_at_least_32_bytes!",
                Duration::hours(24),
                HashingParams {
                    memory_cost_kib: 8 * 1024,
                    time_cost: 2,
                    parallelism: 1,
                },
            )
            .unwrap(),
        );
        let user = stored_user(&authenticator, 5, "secret123");

        repository.expect_find_by_email().returning(move |email| {
            if email == "alice@example.com" {
                Ok(Some(user.clone()))
            } else {
                Ok(None)
            }
        });

        let service = AuthService::new(Arc::new(repository), authenticator);

        // First unknown-email login also builds the placeholder digest
        fastest_rejection(&service, "nobody@example.com").await;

        let unknown_email = fastest_rejection(&service, "nobody@example.com").await;
        let wrong_password = fastest_rejection(&service, "alice@example.com").await;

        assert!(
            unknown_email * 3 >= wrong_password,
            "unknown email took {:?}, wrong password took {:?}",
            unknown_email,
            wrong_password
        );
    }

    #[tokio::test]
    async fn test_login_with_malformed_stored_hash_is_internal() {
        let mut repository = MockTestUserRepository::new();
        let authenticator = test_authenticator();
        let mut user = stored_user(&authenticator, 5, "secret123");
        user.password_hash = "not-a-phc-string".to_string();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = AuthService::new(Arc::new(repository), authenticator);

        let result = service
            .login(LoginCommand {
                email: "alice@example.com".to_string(),
                password: "secret123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::Credential(_))));
    }

    #[tokio::test]
    async fn test_logout_touches_nothing() {
        let repository = MockTestUserRepository::new();
        let service = AuthService::new(Arc::new(repository), test_authenticator());

        // Any repository call would panic on the unconfigured mock
        service.logout().await;
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .withf(|id| *id == UserId(9))
            .times(1)
            .returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repository), test_authenticator());

        let result = service.get_user(UserId(9)).await;
        assert!(matches!(result, Err(UserError::NotFound(UserId(9)))));
    }
}
