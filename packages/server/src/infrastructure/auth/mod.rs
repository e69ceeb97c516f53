//! Credential handling: JWT issuance/verification and password hashing.

pub mod jwt;
pub mod password;

pub use jwt::JwtIdentityService;
pub use password::Sha256PasswordHasher;
