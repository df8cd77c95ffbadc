use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use marquee_booking::{Booking, BookingError, NewUser, Resource, User, UserMutation, UserRepository};
use marquee_core::{IdSequence, UserId};
use marquee_shared::mask_email;
use tokio::sync::RwLock;

#[derive(Default)]
struct UserTable {
    users: HashMap<UserId, User>,
    by_email: HashMap<String, UserId>,
    by_username: HashMap<String, UserId>,
}

/// Process-local credential store. All booking mutations for a user run under its write
/// lock, which is taken before any show pool.
pub struct InMemoryUserRepository {
    table: RwLock<UserTable>,
    user_ids: IdSequence,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(UserTable::default()),
            user_ids: IdSequence::for_users(),
        }
    }

    pub async fn user_count(&self) -> usize {
        self.table.read().await.users.len()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert_user(&self, new_user: NewUser) -> Result<User, BookingError> {
        let email_key = new_user.email.to_lowercase();
        let username_key = new_user.username.to_lowercase();

        let mut table = self.table.write().await;
        if table.by_email.contains_key(&email_key) || table.by_username.contains_key(&username_key) {
            tracing::debug!(email = %mask_email(&email_key), "Rejected duplicate signup");
            return Err(BookingError::Conflict(
                "User with this email or username already exists".to_string(),
            ));
        }

        let user = User {
            user_id: self.user_ids.next_id(),
            username: new_user.username,
            email: email_key.clone(),
            password_hash: new_user.password_hash,
            bookings: Vec::new(),
            created_at: Utc::now(),
        };

        table.by_email.insert(email_key, user.user_id);
        table.by_username.insert(username_key, user.user_id);
        table.users.insert(user.user_id, user.clone());
        Ok(user)
    }

    async fn identity_taken(&self, email: &str, username: &str) -> Result<bool, BookingError> {
        let table = self.table.read().await;
        Ok(table.by_email.contains_key(&email.to_lowercase())
            || table.by_username.contains_key(&username.to_lowercase()))
    }

    async fn find_by_id(&self, user_id: UserId) -> Result<Option<User>, BookingError> {
        Ok(self.table.read().await.users.get(&user_id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BookingError> {
        let table = self.table.read().await;
        Ok(table
            .by_email
            .get(&email.to_lowercase())
            .and_then(|user_id| table.users.get(user_id))
            .cloned())
    }

    async fn contains_user(&self, user_id: UserId) -> Result<bool, BookingError> {
        Ok(self.table.read().await.users.contains_key(&user_id))
    }

    async fn update_user(
        &self,
        user_id: UserId,
        mutation: UserMutation<'_>,
    ) -> Result<Booking, BookingError> {
        let mut table = self.table.write().await;
        let user = table
            .users
            .get_mut(&user_id)
            .ok_or(BookingError::NotFound(Resource::User))?;
        mutation(user)
    }
}
