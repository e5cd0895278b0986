//! Authentication service for API token validation.

use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::repositories::TokenRepository;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a raw token with HMAC-SHA256 keyed by `signing_secret`.
///
/// Returns a 64-character lowercase hex string. The admin CLI uses the same
/// function when storing new tokens, so both sides must share the secret.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the MAC cannot be keyed.
pub fn hash_token(signing_secret: &str, token: &str) -> Result<String, AppError> {
    let mut mac = HmacSha256::new_from_slice(signing_secret.as_bytes())
        .map_err(|_| AppError::internal("Invalid token signing secret", json!({})))?;
    mac.update(token.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Authenticates API requests via Bearer tokens.
///
/// A database dump alone is not enough to forge or verify tokens: lookups go
/// through the HMAC, whose key only the server holds.
pub struct AuthService {
    repository: Arc<dyn TokenRepository>,
    signing_secret: String,
}

impl AuthService {
    pub fn new(repository: Arc<dyn TokenRepository>, signing_secret: String) -> Self {
        Self {
            repository,
            signing_secret,
        }
    }

    /// Checks a raw token and records its use.
    ///
    /// A failure to record usage is logged and does not fail the request.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is unknown or revoked.
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn authenticate(&self, token: &str) -> Result<(), AppError> {
        let token_hash = hash_token(&self.signing_secret, token)?;

        if !self.repository.is_active(&token_hash).await? {
            return Err(AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Invalid or revoked token"}),
            ));
        }

        if let Err(e) = self.repository.touch(&token_hash).await {
            tracing::warn!(error = %e, "Failed to record token usage");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockTokenRepository;

    const SECRET: &str = "test-signing-secret";

    #[tokio::test]
    async fn test_authenticate_success() {
        let mut mock_repo = MockTokenRepository::new();
        let expected_hash = hash_token(SECRET, "valid-token").unwrap();
        let touched_hash = expected_hash.clone();

        mock_repo
            .expect_is_active()
            .withf(move |hash| hash == expected_hash)
            .times(1)
            .returning(|_| Ok(true));
        mock_repo
            .expect_touch()
            .withf(move |hash| hash == touched_hash)
            .times(1)
            .returning(|_| Ok(()));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        assert!(service.authenticate("valid-token").await.is_ok());
    }

    #[tokio::test]
    async fn test_authenticate_revoked_token() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo
            .expect_is_active()
            .times(1)
            .returning(|_| Ok(false));
        mock_repo.expect_touch().never();

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        let result = service.authenticate("revoked").await;

        assert!(matches!(result.unwrap_err(), AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_touch_failure_does_not_reject() {
        let mut mock_repo = MockTokenRepository::new();
        mock_repo.expect_is_active().returning(|_| Ok(true));
        mock_repo
            .expect_touch()
            .returning(|_| Err(AppError::internal("Database error", json!({}))));

        let service = AuthService::new(Arc::new(mock_repo), SECRET.to_string());

        assert!(service.authenticate("valid-token").await.is_ok());
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let a = hash_token(SECRET, "token").unwrap();
        let b = hash_token(SECRET, "token").unwrap();

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_token_depends_on_secret() {
        assert_ne!(
            hash_token("secret-a", "token").unwrap(),
            hash_token("secret-b", "token").unwrap()
        );
    }
}
