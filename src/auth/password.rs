use crate::error::AppError;

/// bcrypt hashing with a fixed work factor.
///
/// Both operations are CPU-bound; callers on the async runtime should
/// run them through `actix_web::web::block`.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn hash(&self, password: &str) -> Result<String, AppError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| AppError::InternalServerError(format!("Failed to hash password: {}", e)))
    }

    /// Compares `password` against a stored digest.
    pub fn verify(&self, password: &str, hashed_password: &str) -> Result<bool, AppError> {
        bcrypt::verify(password, hashed_password)
            .map_err(|e| AppError::InternalServerError(format!("Failed to verify password: {}", e)))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hashing_and_verification() {
        let hasher = PasswordHasher::new(4);
        let hashed = hasher.hash("test_password123").unwrap();

        assert_ne!(hashed, "test_password123");
        assert!(hasher.verify("test_password123", &hashed).unwrap());
        assert!(!hasher.verify("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_hash_records_cost_factor() {
        let hashed = PasswordHasher::default().hash("pw").unwrap();
        assert!(hashed.starts_with("$2b$10$"), "unexpected digest: {}", hashed);
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let hasher = PasswordHasher::new(4);
        assert_ne!(hasher.hash("pw").unwrap(), hasher.hash("pw").unwrap());
    }

    #[test]
    fn test_verify_with_invalid_hash() {
        match PasswordHasher::new(4).verify("test_password123", "invalidhashformat") {
            Err(AppError::InternalServerError(msg)) => {
                assert!(msg.contains("Failed to verify password"));
            }
            Ok(false) => {}
            Ok(true) => panic!("Password verification should fail for invalid hash format"),
            Err(e) => panic!("Unexpected error: {:?}", e),
        }
    }
}
