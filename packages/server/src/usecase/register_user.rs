//! UseCase: アカウント登録

use std::sync::Arc;

use parlor_shared::time::Clock;

use crate::domain::{
    PasswordHasher, RepositoryError, Timestamp, UserAccount, UserRepository, Username,
};

use super::error::RegisterUserError;

pub struct RegisterUserUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    clock: Arc<dyn Clock>,
}

impl RegisterUserUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            clock,
        }
    }

    /// ユーザー名とパスワードでアカウントを作成する
    ///
    /// どちらかが欠損または空なら `MissingFields`。パスワードはハッシュ化してから保存する。
    pub async fn execute(
        &self,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<Username, RegisterUserError> {
        let (Some(username), Some(password)) = (
            username.filter(|u| !u.is_empty()),
            password.filter(|p| !p.is_empty()),
        ) else {
            return Err(RegisterUserError::MissingFields);
        };
        let username = Username::new(username)?;

        let account = UserAccount::new(
            username.clone(),
            self.password_hasher.hash(&password),
            Timestamp::new(self.clock.now()),
        );
        match self.user_repository.create_user(account).await {
            Ok(()) => {
                tracing::info!("Account '{}' created", username);
                Ok(username)
            }
            Err(RepositoryError::DuplicateUsername(_)) => Err(RegisterUserError::DuplicateUsername),
            Err(e) => Err(RegisterUserError::Repository(e)),
        }
    }
}
