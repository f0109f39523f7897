//! Password hashing (argon2) and signed bearer tokens (HS256 JWT).

use crate::error::AppError;
use argon2::password_hash::rand_core::OsRng;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use uuid::Uuid;

/// Runs on the blocking pool.
pub async fn hash_password(password: String) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || hash_blocking(&password))
        .await
        .map_err(|e| AppError::Internal(format!("password hash task failed: {}", e)))?
}

/// `Ok(false)` on mismatch; `Err` only when the stored hash is unreadable.
pub async fn verify_password(password: String, hash: String) -> Result<bool, AppError> {
    tokio::task::spawn_blocking(move || verify_blocking(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(format!("password verification task failed: {}", e)))?
}

/// Verify against `stored`, or against a throwaway hash when there is no
/// stored credential, so a miss costs as much as a wrong password.
pub async fn verify_password_or_dummy(
    password: String,
    stored: Option<String>,
) -> Result<bool, AppError> {
    match stored {
        Some(hash) => verify_password(password, hash).await,
        None => tokio::task::spawn_blocking(move || -> Result<bool, AppError> {
            verify_blocking(&password, dummy_hash()?)?;
            Ok(false)
        })
        .await
        .map_err(|e| AppError::Internal(format!("password verification task failed: {}", e)))?,
    }
}

fn dummy_hash() -> Result<&'static str, AppError> {
    static DUMMY: OnceLock<String> = OnceLock::new();
    if let Some(hash) = DUMMY.get() {
        return Ok(hash.as_str());
    }
    let hash = hash_blocking("devportal-unused-credential")?;
    Ok(DUMMY.get_or_init(|| hash).as_str())
}

fn hash_blocking(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("password hash: {}", e)))
}

fn verify_blocking(password: &str, hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(format!("stored password hash: {}", e)))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Contributor,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    pub fn issue(&self, subject: Uuid, role: Role, email: Option<&str>) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            role,
            email: email.map(str::to_string),
            iat: now,
            exp: now + self.ttl_secs,
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::Internal(format!("token signing: {}", e)))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(error = %e, "rejected bearer token");
                AppError::Unauthorized("Invalid or expired token".into())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn hash_and_verify_password() {
        let hash = hash_password("correct horse".into()).await.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse".into(), hash.clone()).await.unwrap());
        assert!(!verify_password("wrong horse".into(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn same_password_gets_different_salts() {
        let a = hash_password("admin123".into()).await.unwrap();
        let b = hash_password("admin123".into()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn plaintext_stored_value_is_an_error_not_a_match() {
        assert!(verify_password("admin123".into(), "admin123".into()).await.is_err());
    }

    // On a single-threaded runtime an inline hash would finish before the
    // sibling future gets polled again.
    #[tokio::test(flavor = "current_thread")]
    async fn hashing_yields_to_other_tasks() {
        let (hashed_at, ticked_at) = tokio::join!(
            async {
                hash_password("admin123".into()).await.unwrap();
                Instant::now()
            },
            async {
                tokio::task::yield_now().await;
                Instant::now()
            }
        );
        assert!(ticked_at < hashed_at);
    }

    #[tokio::test]
    async fn missing_credential_never_matches() {
        assert!(!verify_password_or_dummy("anything".into(), None).await.unwrap());
        assert!(dummy_hash().unwrap().starts_with("$argon2"));
        assert_eq!(dummy_hash().unwrap(), dummy_hash().unwrap());

        let hash = hash_password("secret1".into()).await.unwrap();
        assert!(verify_password_or_dummy("secret1".into(), Some(hash)).await.unwrap());
    }

    #[test]
    fn token_round_trip_carries_role() {
        let issuer = TokenIssuer::new("secret", 60);
        let id = Uuid::new_v4();
        let token = issuer.issue(id, Role::Admin, Some("a@b.io")).unwrap();
        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.sub, id.to_string());
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.email.as_deref(), Some("a@b.io"));
        assert_eq!(claims.exp - claims.iat, 60);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = TokenIssuer::new("one", 60)
            .issue(Uuid::new_v4(), Role::Contributor, None)
            .unwrap();
        let err = TokenIssuer::new("two", 60).verify(&token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized(_)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let issuer = TokenIssuer::new("secret", -120);
        let token = issuer.issue(Uuid::new_v4(), Role::Admin, None).unwrap();
        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn garbage_token_is_rejected() {
        let issuer = TokenIssuer::new("secret", 60);
        assert!(issuer.verify("not.a.token").is_err());
    }
}
