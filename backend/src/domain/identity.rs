//! Identity service: account registration and credential verification.
//!
//! Session establishment and teardown live at the HTTP boundary; this
//! service only answers "may this user log in" and "create this account".

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::auth::{LoginCredentials, RegistrationRequest};
use super::error::Error;
use super::password;
use super::ports::{UserPersistenceError, UserRepository};
use super::user::{User, UserId};
use crate::domain::storage_failure;

/// Message shared by every credential failure so the response never reveals
/// whether the username or the password was wrong.
pub const INVALID_CREDENTIALS: &str = "invalid username or password";

const DUPLICATE_USERNAME: &str = "username already exists";

/// Registration and login use-cases over a [`UserRepository`].
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
}

impl IdentityService {
    /// Create a service backed by the given repository.
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Create a new account.
    ///
    /// Fails with a conflict when the username is already taken
    /// case-insensitively, whether the pre-check or the storage layer's
    /// unique index catches it.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<User, Error> {
        let existing = self
            .users
            .find_by_username_ci(request.username())
            .await
            .map_err(storage_failure)?;
        if existing.is_some() {
            return Err(Error::conflict(DUPLICATE_USERNAME));
        }

        let password_hash = password::hash(request.password()).map_err(storage_failure)?;
        let user = User::new(
            UserId::random(),
            request.username().clone(),
            password_hash,
            Utc::now(),
        );

        match self.users.insert(&user).await {
            Ok(()) => {
                info!(username = %user.username(), "registered new account");
                Ok(user)
            }
            // Racing registration landed first between pre-check and insert.
            Err(UserPersistenceError::DuplicateUsername) => Err(Error::conflict(DUPLICATE_USERNAME)),
            Err(error) => Err(storage_failure(error)),
        }
    }

    /// Verify credentials and return the account on success.
    ///
    /// Missing users and wrong passwords produce the identical
    /// [`INVALID_CREDENTIALS`] failure.
    pub async fn login(&self, credentials: &LoginCredentials) -> Result<User, Error> {
        let user = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(storage_failure)?;

        let Some(user) = user else {
            // Keep timing comparable to the wrong-password path.
            password::dummy_verify(credentials.password());
            warn!(username = %credentials.username(), "login attempt for unknown username");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        };

        if !password::verify(user.password_hash(), credentials.password()) {
            warn!(username = %credentials.username(), "login attempt with wrong password");
            return Err(Error::unauthorized(INVALID_CREDENTIALS));
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for registration and login flows.
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::user::Username;

    #[derive(Default)]
    struct StubUserRepository {
        users: Mutex<Vec<User>>,
        insert_failure: Mutex<Option<UserPersistenceError>>,
    }

    impl StubUserRepository {
        fn with_user(user: User) -> Self {
            Self {
                users: Mutex::new(vec![user]),
                insert_failure: Mutex::new(None),
            }
        }

        fn fail_next_insert(&self, failure: UserPersistenceError) {
            *self.insert_failure.lock().expect("lock") = Some(failure);
        }

        fn stored(&self) -> Vec<User> {
            self.users.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl UserRepository for StubUserRepository {
        async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
            if let Some(failure) = self.insert_failure.lock().expect("lock").take() {
                return Err(failure);
            }
            self.users.lock().expect("lock").push(user.clone());
            Ok(())
        }

        async fn find_by_username(
            &self,
            username: &Username,
        ) -> Result<Option<User>, UserPersistenceError> {
            Ok(self
                .users
                .lock()
                .expect("lock")
                .iter()
                .find(|u| u.username() == username)
                .cloned())
        }

        async fn find_by_username_ci(
            &self,
            username: &Username,
        ) -> Result<Option<User>, UserPersistenceError> {
            let needle = username.as_str().to_lowercase();
            Ok(self
                .users
                .lock()
                .expect("lock")
                .iter()
                .find(|u| u.username().as_str().to_lowercase() == needle)
                .cloned())
        }
    }

    fn registration(username: &str, password: &str) -> RegistrationRequest {
        RegistrationRequest::try_from_parts(username, password).expect("valid registration")
    }

    fn credentials(username: &str, password: &str) -> LoginCredentials {
        LoginCredentials::try_from_parts(username, password).expect("valid credentials")
    }

    async fn registered_service(username: &str, password: &str) -> (IdentityService, User) {
        let service = IdentityService::new(Arc::new(StubUserRepository::default()));
        let user = service
            .register(&registration(username, password))
            .await
            .expect("registration succeeds");
        (service, user)
    }

    #[tokio::test]
    async fn register_stores_a_hash_not_the_password() {
        let repository = Arc::new(StubUserRepository::default());
        let service = IdentityService::new(repository.clone());

        let user = service
            .register(&registration("reader", "a fine password"))
            .await
            .expect("registration succeeds");

        assert_eq!(user.username().as_str(), "reader");
        let stored = repository.stored();
        assert_eq!(stored.len(), 1);
        assert!(stored[0].password_hash().starts_with("$argon2id$"));
        assert!(!stored[0].password_hash().contains("a fine password"));
    }

    #[tokio::test]
    async fn register_rejects_case_insensitive_duplicates() {
        let (service, _user) = registered_service("Reader", "a fine password").await;

        let err = service
            .register(&registration("reader", "another password"))
            .await
            .expect_err("duplicate must fail");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "username already exists");
    }

    #[tokio::test]
    async fn register_maps_racing_unique_violation_to_conflict() {
        let repository = Arc::new(StubUserRepository::default());
        let service = IdentityService::new(repository.clone());
        repository.fail_next_insert(UserPersistenceError::DuplicateUsername);

        let err = service
            .register(&registration("reader", "a fine password"))
            .await
            .expect_err("conflict expected");

        assert_eq!(err.code(), ErrorCode::Conflict);
    }

    #[tokio::test]
    async fn register_redacts_storage_failures() {
        let repository = Arc::new(StubUserRepository::default());
        let service = IdentityService::new(repository.clone());
        repository.fail_next_insert(UserPersistenceError::connection("db went away"));

        let err = service
            .register(&registration("reader", "a fine password"))
            .await
            .expect_err("failure expected");

        assert_eq!(err.code(), ErrorCode::InternalError);
        assert!(!err.message().contains("db went away"));
    }

    #[tokio::test]
    async fn login_succeeds_with_correct_credentials() {
        let (service, registered) = registered_service("reader", "a fine password").await;

        let user = service
            .login(&credentials("reader", "a fine password"))
            .await
            .expect("login succeeds");

        assert_eq!(user.id(), registered.id());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_fail_identically() {
        let (service, _user) = registered_service("reader", "a fine password").await;

        let wrong_password = service
            .login(&credentials("reader", "not the password"))
            .await
            .expect_err("wrong password must fail");
        let unknown_user = service
            .login(&credentials("nobody", "a fine password"))
            .await
            .expect_err("unknown user must fail");

        assert_eq!(wrong_password, unknown_user);
        assert_eq!(wrong_password.code(), ErrorCode::Unauthorized);
        assert_eq!(wrong_password.message(), INVALID_CREDENTIALS);
    }

    #[tokio::test]
    async fn login_is_case_sensitive_on_username() {
        let (service, _user) = registered_service("Reader", "a fine password").await;

        let err = service
            .login(&credentials("reader", "a fine password"))
            .await
            .expect_err("exact lookup must miss");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }
}
