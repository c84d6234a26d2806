//! Shared-password credential check
//!
//! Every account authenticates with the same password. It is kept only as an
//! argon2 hash and checked with argon2 verification.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;

use crate::error::{Error, Result};

/// The password accepted for every account
pub const SHARED_PASSWORD: &str = "password123";

// Light parameters: this guards a fixed demo secret, and the hash is
// recomputed at every startup.
const MEMORY_COST_KIB: u32 = 4096;
const TIME_COST: u32 = 1;
const PARALLELISM: u32 = 1;

pub struct SharedPassword {
    hash: String,
}

impl SharedPassword {
    /// Hash `password` with a fresh salt
    pub fn new(password: &str) -> Result<Self> {
        let params = Params::new(MEMORY_COST_KIB, TIME_COST, PARALLELISM, None)
            .map_err(|e| Error::PasswordHash(e.to_string()))?;
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let salt = SaltString::generate(&mut OsRng);
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash(e.to_string()))?
            .to_string();

        Ok(Self { hash })
    }

    /// True when `candidate` matches the shared password
    pub fn verify(&self, candidate: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(candidate.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}
