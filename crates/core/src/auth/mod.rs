//! Credentials and bearer tokens.
//!
//! - [`password`]: salted Argon2id hashing in PHC string format
//! - [`token`]: HS256 access/refresh token pairs carrying the patient's identity

pub mod password;
pub mod token;

pub use password::{hash_password, spawn_hash, spawn_verify, verify_password};
pub use token::{Claims, TokenKind, TokenPair, TokenService, TokenSubject};
