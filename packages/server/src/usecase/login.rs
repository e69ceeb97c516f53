//! UseCase: ログイン（トークン発行）

use std::sync::Arc;

use crate::domain::{PasswordHasher, TokenIssuer, UserRepository, Username};

use super::error::LoginError;

/// ログイン成功時の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub access_token: String,
    pub username: Username,
}

pub struct LoginUseCase {
    user_repository: Arc<dyn UserRepository>,
    password_hasher: Arc<dyn PasswordHasher>,
    token_issuer: Arc<dyn TokenIssuer>,
}

impl LoginUseCase {
    pub fn new(
        user_repository: Arc<dyn UserRepository>,
        password_hasher: Arc<dyn PasswordHasher>,
        token_issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            user_repository,
            password_hasher,
            token_issuer,
        }
    }

    /// 認証情報を照合してトークンを発行する
    ///
    /// 未登録ユーザーとパスワード不一致は区別せず `InvalidCredentials` を返す。
    pub async fn execute(
        &self,
        username: Option<String>,
        password: Option<String>,
    ) -> Result<LoginOutcome, LoginError> {
        let (Some(username), Some(password)) = (username, password) else {
            return Err(LoginError::InvalidCredentials);
        };
        let Ok(username) = Username::new(username) else {
            return Err(LoginError::InvalidCredentials);
        };

        let account = self
            .user_repository
            .find_user(&username)
            .await?
            .ok_or(LoginError::InvalidCredentials)?;
        if !self
            .password_hasher
            .verify(&password, &account.password_hash)
        {
            tracing::info!("Failed login attempt for '{}'", username);
            return Err(LoginError::InvalidCredentials);
        }

        let access_token = self.token_issuer.issue(&account.username)?;
        tracing::info!("'{}' logged in", account.username);
        Ok(LoginOutcome {
            access_token,
            username: account.username,
        })
    }
}
