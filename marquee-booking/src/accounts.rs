use std::sync::{Arc, LazyLock};

use marquee_core::CredentialHasher;
use marquee_shared::{mask_email, Masked};
use regex::Regex;

use crate::error::BookingError;
use crate::models::{NewUser, User};
use crate::repository::UserRepository;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

const MIN_USERNAME_CHARS: usize = 3;
const MAX_USERNAME_CHARS: usize = 50;
const MIN_PASSWORD_CHARS: usize = 8;

/// Trim and drop angle brackets from free-text identity fields.
pub fn sanitize_input(input: &str) -> String {
    input.trim().chars().filter(|c| !matches!(c, '<' | '>')).collect()
}

/// Signup and login against the credential store.
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountService {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { users, hasher }
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<User, BookingError> {
        let username = sanitize_input(username);
        let email = sanitize_input(email);

        if username.is_empty() || email.is_empty() || password.is_empty() {
            return Err(BookingError::validation("All fields are required"));
        }

        let username_len = username.chars().count();
        if !(MIN_USERNAME_CHARS..=MAX_USERNAME_CHARS).contains(&username_len) {
            return Err(BookingError::validation(
                "Username must be between 3 and 50 characters",
            ));
        }

        if !EMAIL_RE.is_match(&email) {
            return Err(BookingError::validation("Invalid email format"));
        }

        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(BookingError::validation(
                "Password must be at least 8 characters long",
            ));
        }

        let email = email.to_lowercase();
        if self.users.identity_taken(&email, &username).await? {
            tracing::debug!(email = %mask_email(&email), "Rejected duplicate signup before hashing");
            return Err(BookingError::Conflict(
                "User with this email or username already exists".to_string(),
            ));
        }

        let password_hash = self.hasher.hash(password).await?;

        let user = self
            .users
            .insert_user(NewUser {
                username,
                email,
                password_hash: Masked::new(password_hash),
            })
            .await?;

        tracing::info!(user_id = user.user_id, email = %mask_email(&user.email), "User registered");
        Ok(user)
    }

    /// Unknown email and wrong password fail the same way.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, BookingError> {
        let email = sanitize_input(email);

        if email.is_empty() || password.is_empty() {
            return Err(BookingError::validation("Email and password are required"));
        }

        let Some(user) = self.users.find_by_email(&email.to_lowercase()).await? else {
            tracing::warn!(email = %mask_email(&email), "Login for unknown email");
            return Err(BookingError::InvalidCredentials);
        };

        if !self.hasher.verify(password, user.password_hash.expose()).await? {
            tracing::warn!(user_id = user.user_id, "Login with wrong password");
            return Err(BookingError::InvalidCredentials);
        }

        tracing::info!(user_id = user.user_id, "User logged in");
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Booking;
    use crate::repository::UserMutation;
    use async_trait::async_trait;
    use chrono::Utc;
    use marquee_core::{CoreResult, UserId};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct PlainHasher {
        hashed: AtomicUsize,
    }

    #[async_trait]
    impl CredentialHasher for PlainHasher {
        async fn hash(&self, secret: &str) -> CoreResult<String> {
            self.hashed.fetch_add(1, Ordering::SeqCst);
            Ok(format!("plain:{}", secret))
        }

        async fn verify(&self, secret: &str, hashed: &str) -> CoreResult<bool> {
            Ok(hashed == format!("plain:{}", secret))
        }
    }

    #[derive(Default)]
    struct TestUsers {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepository for TestUsers {
        async fn insert_user(&self, new_user: NewUser) -> Result<User, BookingError> {
            let mut users = self.users.lock().unwrap();
            let clash = users.iter().any(|u| {
                u.email == new_user.email || u.username.to_lowercase() == new_user.username.to_lowercase()
            });
            if clash {
                return Err(BookingError::Conflict(
                    "User with this email or username already exists".to_string(),
                ));
            }
            let user = User {
                user_id: users.len() as UserId + 1,
                username: new_user.username,
                email: new_user.email,
                password_hash: new_user.password_hash,
                bookings: Vec::new(),
                created_at: Utc::now(),
            };
            users.push(user.clone());
            Ok(user)
        }

        async fn identity_taken(&self, email: &str, username: &str) -> Result<bool, BookingError> {
            Ok(self.users.lock().unwrap().iter().any(|u| {
                u.email == email.to_lowercase() || u.username.to_lowercase() == username.to_lowercase()
            }))
        }

        async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, BookingError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.user_id == user_id).cloned())
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>, BookingError> {
            Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
        }

        async fn contains_user(&self, user_id: UserId) -> Result<bool, BookingError> {
            Ok(self.users.lock().unwrap().iter().any(|u| u.user_id == user_id))
        }

        async fn update_user(&self, _user_id: UserId, _mutation: UserMutation<'_>) -> Result<Booking, BookingError> {
            unimplemented!("not used by account tests")
        }
    }

    fn accounts() -> AccountService {
        AccountService::new(Arc::new(TestUsers::default()), Arc::new(PlainHasher::default()))
    }

    fn validation_message(result: Result<User, BookingError>) -> String {
        match result {
            Err(BookingError::Validation(message)) => message,
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_sanitize_input() {
        assert_eq!(sanitize_input("  <b>alice</b> "), "balice/b");
        assert_eq!(sanitize_input("bob"), "bob");
    }

    #[tokio::test]
    async fn test_register_normalizes_email() {
        let accounts = accounts();
        let user = accounts.register(" alice ", "Alice@Example.COM", "password123").await.unwrap();

        assert_eq!(user.user_id, 1);
        assert_eq!(user.username, "alice");
        assert_eq!(user.email, "alice@example.com");
        assert_ne!(user.password_hash.expose(), "password123");
    }

    #[tokio::test]
    async fn test_register_validation() {
        let accounts = accounts();

        assert_eq!(
            validation_message(accounts.register("", "a@b.co", "password123").await),
            "All fields are required"
        );
        assert_eq!(
            validation_message(accounts.register("<>", "a@b.co", "password123").await),
            "All fields are required"
        );
        assert_eq!(
            validation_message(accounts.register("al", "a@b.co", "password123").await),
            "Username must be between 3 and 50 characters"
        );
        assert_eq!(
            validation_message(accounts.register(&"x".repeat(51), "a@b.co", "password123").await),
            "Username must be between 3 and 50 characters"
        );
        assert_eq!(
            validation_message(accounts.register("alice", "not-an-email", "password123").await),
            "Invalid email format"
        );
        assert_eq!(
            validation_message(accounts.register("alice", "a@b.co", "short").await),
            "Password must be at least 8 characters long"
        );
    }

    #[tokio::test]
    async fn test_register_duplicate_is_case_insensitive() {
        let accounts = accounts();
        accounts.register("alice", "alice@example.com", "password123").await.unwrap();

        let by_email = accounts.register("alice2", "ALICE@example.com", "password123").await;
        assert!(matches!(by_email, Err(BookingError::Conflict(_))));

        let by_username = accounts.register("ALICE", "other@example.com", "password123").await;
        assert!(matches!(by_username, Err(BookingError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_duplicate_signup_skips_hashing() {
        let hasher = Arc::new(PlainHasher::default());
        let accounts = AccountService::new(Arc::new(TestUsers::default()), hasher.clone());
        accounts.register("alice", "alice@example.com", "password123").await.unwrap();

        let result = accounts.register("Alice", "alice@example.com", "password123").await;
        assert!(matches!(result, Err(BookingError::Conflict(_))));
        assert_eq!(hasher.hashed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_login() {
        let accounts = accounts();
        let registered = accounts.register("alice", "alice@example.com", "password123").await.unwrap();

        let user = accounts.login(" Alice@Example.com ", "password123").await.unwrap();
        assert_eq!(user.user_id, registered.user_id);
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let accounts = accounts();
        accounts.register("alice", "alice@example.com", "password123").await.unwrap();

        let wrong_password = accounts.login("alice@example.com", "password124").await.unwrap_err();
        let unknown_email = accounts.login("bob@example.com", "password123").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, BookingError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_login_requires_fields() {
        let accounts = accounts();
        assert_eq!(
            validation_message(accounts.login("  ", "password123").await),
            "Email and password are required"
        );
        assert_eq!(
            validation_message(accounts.login("alice@example.com", "").await),
            "Email and password are required"
        );
    }
}
