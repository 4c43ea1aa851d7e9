use bcrypt::{hash, verify, DEFAULT_COST};

/// Hash a plaintext password for storage.
pub fn hash_password(plain: &str) -> Result<String, bcrypt::BcryptError> {
    hash(plain, DEFAULT_COST)
}

/// Check a plaintext password against a stored hash. A malformed stored
/// hash counts as a mismatch rather than an error; the login path treats
/// both identically anyway.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    verify(plain, hashed).unwrap_or(false)
}
