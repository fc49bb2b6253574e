use argon2::{
    password_hash::{PasswordHash, PasswordVerifier},
    Argon2,
};
use tracing::error;

/// Checks a login attempt against a stored PHC string.
///
/// A stored hash that cannot be parsed (a legacy scheme, a truncated column)
/// is logged and treated as a mismatch, so the caller sees the same failure
/// as for a wrong password.
pub fn verify_password(plain: &str, stored: &str) -> bool {
    match PasswordHash::new(stored) {
        Ok(parsed) => Argon2::default()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!(error = %e, "stored password hash is unreadable");
            false
        }
    }
}

/// Hashes seed passwords for the in-memory user repository; accounts are not
/// created through this service.
#[cfg(test)]
pub(crate) fn hash_password(plain: &str) -> String {
    use argon2::password_hash::{PasswordHasher, SaltString};
    use rand::rngs::OsRng;

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .expect("argon2 hashing")
        .to_string()
}
