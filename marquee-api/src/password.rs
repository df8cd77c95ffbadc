use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use async_trait::async_trait;
use marquee_core::{CoreError, CoreResult, CredentialHasher};

/// Argon2id hashing on the blocking pool. Hashes are PHC strings, so verification reads
/// the parameters back out of the stored hash.
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(memory_kib: u32, iterations: u32) -> CoreResult<Self> {
        let params = Params::new(memory_kib, iterations, 1, None)
            .map_err(|e| CoreError::ValidationError(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self { params })
    }
}

fn hash_password(params: Params, password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    Ok(argon2.hash_password(password.as_bytes(), &salt)?.to_string())
}

fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

#[async_trait]
impl CredentialHasher for Argon2Hasher {
    async fn hash(&self, secret: &str) -> CoreResult<String> {
        let params = self.params.clone();
        let secret = secret.to_owned();
        tokio::task::spawn_blocking(move || hash_password(params, &secret))
            .await
            .map_err(|e| CoreError::InternalError(format!("Hashing task failed: {}", e)))?
            .map_err(|e| CoreError::InternalError(format!("Password hashing failed: {}", e)))
    }

    async fn verify(&self, secret: &str, hashed: &str) -> CoreResult<bool> {
        let secret = secret.to_owned();
        let hashed = hashed.to_owned();
        tokio::task::spawn_blocking(move || verify_password(&secret, &hashed))
            .await
            .map_err(|e| CoreError::InternalError(format!("Verification task failed: {}", e)))?
            .map_err(|e| CoreError::IdentityError(format!("Stored hash unreadable: {}", e)))
    }
}
