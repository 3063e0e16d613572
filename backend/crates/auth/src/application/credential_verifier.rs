//! Credential Verifier
//!
//! Argon2id is deliberately slow, so hashing and verification run on tokio's
//! blocking pool. A semaphore bounds how many run at once; excess requests
//! wait for a permit instead of piling onto the blocking pool.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::application::config::AuthConfig;
use crate::domain::value_object::user_password::{RawPassword, UserPassword};
use crate::error::{AuthError, AuthResult};

#[derive(Clone)]
pub struct CredentialVerifier {
    permits: Arc<Semaphore>,
    pepper: Option<Arc<[u8]>>,
}

impl CredentialVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(config.max_concurrent_hashes.max(1))),
            pepper: config.pepper().map(Arc::from),
        }
    }

    /// `true` iff `password` produced `stored`. A mismatch is not an error.
    pub async fn verify(&self, password: RawPassword, stored: &UserPassword) -> AuthResult<bool> {
        let stored = stored.clone();
        let pepper = self.pepper.clone();
        self.run_blocking(move || stored.verify(&password, pepper.as_deref()))
            .await
    }

    /// Spend the same effort as a real verification, for identifiers that
    /// match no account.
    pub async fn verify_unknown_account(&self, password: RawPassword) -> AuthResult<()> {
        let pepper = self.pepper.clone();
        self.run_blocking(move || {
            platform::password::dummy_verify(password.inner(), pepper.as_deref());
            Ok(())
        })
        .await
    }

    /// Hash a new password for storage
    pub async fn hash(&self, password: RawPassword) -> AuthResult<UserPassword> {
        let pepper = self.pepper.clone();
        self.run_blocking(move || UserPassword::from_raw(&password, pepper.as_deref()))
            .await
    }

    async fn run_blocking<T, F>(&self, work: F) -> AuthResult<T>
    where
        F: FnOnce() -> AuthResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| AuthError::Internal("password hashing pool closed".to_string()))?;

        tokio::task::spawn_blocking(work)
            .await
            .map_err(|e| AuthError::Internal(format!("password hashing task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn presented(s: &str) -> RawPassword {
        RawPassword::presented(s.to_string())
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let verifier = CredentialVerifier::new(&AuthConfig::with_random_secrets());
        let stored = verifier.hash(presented("Secr3t!")).await.unwrap();

        assert!(verifier.verify(presented("Secr3t!"), &stored).await.unwrap());
        assert!(!verifier.verify(presented("wrong"), &stored).await.unwrap());
        assert!(!verifier.verify(presented(""), &stored).await.unwrap());
    }

    #[tokio::test]
    async fn test_pepper_is_applied() {
        let peppered = CredentialVerifier::new(&AuthConfig {
            password_pepper: Some(b"pepper".to_vec()),
            ..AuthConfig::with_random_secrets()
        });
        let plain = CredentialVerifier::new(&AuthConfig::with_random_secrets());

        let stored = peppered.hash(presented("Secr3t!")).await.unwrap();
        assert!(peppered.verify(presented("Secr3t!"), &stored).await.unwrap());
        assert!(!plain.verify(presented("Secr3t!"), &stored).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_verifications_share_permits() {
        let verifier = CredentialVerifier::new(&AuthConfig {
            max_concurrent_hashes: 1,
            ..AuthConfig::with_random_secrets()
        });
        let stored = verifier.hash(presented("Secr3t!")).await.unwrap();

        let (a, b) = tokio::join!(
            verifier.verify(presented("Secr3t!"), &stored),
            verifier.verify(presented("nope"), &stored),
        );
        assert!(a.unwrap());
        assert!(!b.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_account_path_succeeds() {
        let verifier = CredentialVerifier::new(&AuthConfig::with_random_secrets());
        verifier.verify_unknown_account(presented("x")).await.unwrap();
    }
}
