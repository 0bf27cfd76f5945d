//! Salted one-way hashing for user passwords. Only the PHC-format hash string
//! is ever stored; the raw password never leaves the request that carried it.

use anyhow::anyhow;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::warn;

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow!("could not hash password for new user: {e}"))
}

/// `Ok(false)` for a wrong password. An error means the stored hash itself
/// is unusable, which login reports as an internal failure.
pub fn verify_password(password: &str, stored_hash: &str) -> anyhow::Result<bool> {
    let stored = PasswordHash::new(stored_hash).map_err(|e| {
        warn!(error = %e, "stored password hash is unreadable");
        anyhow!("stored password hash is unreadable: {e}")
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &stored)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify() {
        let hash = hash_password("salasana").expect("hashing should succeed");
        assert_ne!(hash, "salasana");
        assert!(verify_password("salasana", &hash).expect("verify should succeed"));
    }

    #[test]
    fn hash_is_a_salted_argon2_string() {
        let hash = hash_password("salasana").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("salasana"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("qwertyuiop").unwrap();
        let b = hash_password("qwertyuiop").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("salasana").expect("hashing should succeed");
        assert!(!verify_password("salasana123", &hash).expect("verify should not error"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(err.to_string().contains("unreadable"));
    }
}
