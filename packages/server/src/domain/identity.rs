//! 認証まわりの trait 定義
//!
//! コアは `IdentityVerifier` だけを呼び出す。トークン発行とパスワードハッシュは
//! アカウント管理（登録・ログイン）が使う外部協調者。

use super::{
    error::{Rejection, TokenIssueError},
    value_object::Username,
};

/// トークンからユーザー名を解決する
///
/// トークンのみの純粋関数であり、接続の状態を変更してはならない。
/// 空文字列のトークンは `Rejection::Missing` になる。
#[cfg_attr(test, mockall::automock)]
pub trait IdentityVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Username, Rejection>;
}

/// ログイン成功時にトークンを発行する
#[cfg_attr(test, mockall::automock)]
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, username: &Username) -> Result<String, TokenIssueError>;
}

/// パスワードのハッシュ化と照合
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> String;

    fn verify(&self, password: &str, password_hash: &str) -> bool;
}
