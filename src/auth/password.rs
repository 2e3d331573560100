//! Password hashing.
//!
//! Hashes are Argon2id PHC strings (`$argon2id$v=19$...`), which carry their
//! own salt and parameters.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Hash `password` with a fresh random salt.
pub fn hash(password: &str) -> Result<String, password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Check `password` against a stored PHC string. A malformed hash never
/// verifies.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2id_phc_string() {
        let stored = hash("secret").unwrap();
        assert!(stored.starts_with("$argon2id$"));
        assert!(!stored.contains("secret"));
    }

    #[test]
    fn test_verify() {
        let stored = hash("secret").unwrap();
        assert!(verify("secret", &stored));
        assert!(!verify("Secret", &stored));
        assert!(!verify("secret", "not-a-hash"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        assert_ne!(hash("secret").unwrap(), hash("secret").unwrap());
    }
}
