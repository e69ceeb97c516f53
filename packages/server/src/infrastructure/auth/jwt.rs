//! HS256 JWT identity service.
//!
//! Tokens carry `{username, exp}`. Verification is a pure function of the token and the
//! server secret; expiry is checked against the system clock with no leeway.

use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use parlor_shared::time::Clock;
use serde::{Deserialize, Serialize};

use crate::domain::{IdentityVerifier, Rejection, TokenIssueError, TokenIssuer, Username};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Claims {
    username: String,
    /// Expiration (Unix timestamp, seconds)
    exp: i64,
}

pub struct JwtIdentityService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl JwtIdentityService {
    pub fn new(secret: &[u8], ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            ttl,
            clock,
        }
    }
}

impl IdentityVerifier for JwtIdentityService {
    fn verify(&self, token: &str) -> Result<Username, Rejection> {
        if token.is_empty() {
            return Err(Rejection::Missing);
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => Rejection::Expired,
                _ => Rejection::Invalid,
            }
        })?;

        Username::new(data.claims.username).map_err(|_| Rejection::Invalid)
    }
}

impl TokenIssuer for JwtIdentityService {
    fn issue(&self, username: &Username) -> Result<String, TokenIssueError> {
        let claims = Claims {
            username: username.as_str().to_string(),
            exp: (self.clock.now() + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| TokenIssueError::Encoding(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use parlor_shared::time::{FixedClock, SystemClock};

    const SECRET: &[u8] = b"test-secret";

    fn service_with_clock(clock: Arc<dyn Clock>) -> JwtIdentityService {
        JwtIdentityService::new(SECRET, Duration::hours(12), clock)
    }

    fn alice() -> Username {
        Username::new("alice".to_string()).unwrap()
    }

    #[test]
    fn test_issue_then_verify() {
        // テスト項目: 発行したトークンからユーザー名が復元される
        // given (前提条件):
        let service = service_with_clock(Arc::new(SystemClock));
        let token = service.issue(&alice()).unwrap();

        // when (操作):
        let result = service.verify(&token);

        // then (期待する結果):
        assert_eq!(result, Ok(alice()));
    }

    #[test]
    fn test_verify_empty_token_is_missing() {
        // テスト項目: 空のトークンは Missing
        let service = service_with_clock(Arc::new(SystemClock));

        assert_eq!(service.verify(""), Err(Rejection::Missing));
    }

    #[test]
    fn test_verify_expired_token() {
        // テスト項目: 期限切れのトークンは Expired
        // given (前提条件): 2020 年に発行された 12 時間有効のトークン
        let issued_at = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let issuer = service_with_clock(Arc::new(FixedClock::new(issued_at)));
        let token = issuer.issue(&alice()).unwrap();

        // when (操作):
        let result = issuer.verify(&token);

        // then (期待する結果):
        assert_eq!(result, Err(Rejection::Expired));
    }

    #[test]
    fn test_verify_garbage_token_is_invalid() {
        // テスト項目: JWT として解釈できない文字列は Invalid
        let service = service_with_clock(Arc::new(SystemClock));

        assert_eq!(service.verify("not-a-jwt"), Err(Rejection::Invalid));
    }

    #[test]
    fn test_verify_token_signed_with_other_secret_is_invalid() {
        // テスト項目: 別の鍵で署名されたトークンは Invalid
        // given (前提条件):
        let other = JwtIdentityService::new(
            b"another-secret",
            Duration::hours(12),
            Arc::new(SystemClock),
        );
        let token = other.issue(&alice()).unwrap();
        let service = service_with_clock(Arc::new(SystemClock));

        // when (操作):
        let result = service.verify(&token);

        // then (期待する結果):
        assert_eq!(result, Err(Rejection::Invalid));
    }
}
