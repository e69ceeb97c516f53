//! Salted SHA-256 password hashing.
//!
//! Stored format: `<salt hex>$<digest hex>` where digest = SHA-256(salt || password).

use rand::Rng;
use sha2::{Digest, Sha256};

use crate::domain::PasswordHasher;

const SALT_LEN: usize = 16;

#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256PasswordHasher;

impl Sha256PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    fn digest(salt: &[u8], password: &str) -> Vec<u8> {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().to_vec()
    }
}

impl PasswordHasher for Sha256PasswordHasher {
    fn hash(&self, password: &str) -> String {
        let salt: [u8; SALT_LEN] = rand::rng().random();
        let digest = Self::digest(&salt, password);
        format!("{}${}", hex::encode(salt), hex::encode(digest))
    }

    fn verify(&self, password: &str, password_hash: &str) -> bool {
        let Some((salt_hex, digest_hex)) = password_hash.split_once('$') else {
            return false;
        };
        let (Ok(salt), Ok(expected)) = (hex::decode(salt_hex), hex::decode(digest_hex)) else {
            return false;
        };
        constant_time_eq(&Self::digest(&salt, password), &expected)
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        // テスト項目: ハッシュ化したパスワードが照合できる
        // given (前提条件):
        let hasher = Sha256PasswordHasher::new();

        // when (操作):
        let hash = hasher.hash("s3cret");

        // then (期待する結果):
        assert!(hasher.verify("s3cret", &hash));
        assert!(!hasher.verify("wrong", &hash));
        assert!(!hash.contains("s3cret"));
    }

    #[test]
    fn test_hash_is_salted() {
        // テスト項目: 同じパスワードでもハッシュは毎回異なる
        let hasher = Sha256PasswordHasher::new();

        assert_ne!(hasher.hash("same"), hasher.hash("same"));
    }

    #[test]
    fn test_stored_format_is_lowercase_hex() {
        // テスト項目: 保存形式は `<16 byte salt>$<32 byte digest>` の 16 進文字列
        // given (前提条件):
        let hasher = Sha256PasswordHasher::new();

        // when (操作):
        let hash = hasher.hash("s3cret");
        let (salt_hex, digest_hex) = hash.split_once('$').unwrap();

        // then (期待する結果):
        assert_eq!(hex::decode(salt_hex).unwrap().len(), SALT_LEN);
        assert_eq!(hex::decode(digest_hex).unwrap().len(), 32);
        assert_eq!(hash, hash.to_lowercase());
        // 大文字の 16 進でも照合できる
        assert!(hasher.verify("s3cret", &hash.to_uppercase()));
    }

    #[test]
    fn test_verify_rejects_malformed_hash() {
        // テスト項目: 形式が壊れたハッシュとは一致しない
        let hasher = Sha256PasswordHasher::new();

        assert!(!hasher.verify("x", "no-separator"));
        assert!(!hasher.verify("x", "zz$zz"));
        assert!(!hasher.verify("x", "abc$def"));
    }
}
