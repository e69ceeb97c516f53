//! InMemory User Repository 実装

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{RepositoryError, UserAccount, UserRepository, Username};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<HashMap<Username, UserAccount>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, account: UserAccount) -> Result<(), RepositoryError> {
        let mut users = self.users.lock().await;
        if users.contains_key(&account.username) {
            return Err(RepositoryError::DuplicateUsername(
                account.username.into_string(),
            ));
        }
        users.insert(account.username.clone(), account);
        Ok(())
    }

    async fn find_user(&self, username: &Username) -> Result<Option<UserAccount>, RepositoryError> {
        let users = self.users.lock().await;
        Ok(users.get(username).cloned())
    }
}
