//! Password hashing and verification.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::errors::Error;

/// Hash a group secret using Argon2id with a random salt.
///
/// Parameters are the argon2 crate defaults, which follow the RFC 9106
/// recommendations for interactive logins.
pub fn hash_string(input: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default().hash_password(input.as_bytes(), &salt).map_err(|e| Error::Internal {
        operation: format!("hash string: {e}"),
    })?;

    Ok(hash.to_string())
}

/// Verify a secret against a stored digest.
///
/// A malformed digest verifies as false rather than erroring: a row with a
/// corrupt hash must behave exactly like a wrong password.
pub fn verify_string(input: &str, hash: &str) -> bool {
    let Ok(parsed_hash) = PasswordHash::new(hash) else {
        return false;
    };

    // Verification always uses params embedded in the hash
    Argon2::default().verify_password(input.as_bytes(), &parsed_hash).is_ok()
}
