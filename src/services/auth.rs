//! Authentication and user account service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use rand::RngCore;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{RegisterUser, User, UserClaims},
    repository::Repository,
    services::email::EmailService,
};

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
    email: EmailService,
    base_url: String,
}

impl AuthService {
    pub fn new(
        repository: Repository,
        config: AuthConfig,
        email: EmailService,
        base_url: String,
    ) -> Self {
        Self {
            repository,
            config,
            email,
            base_url,
        }
    }

    /// Register a new user and send the verification email
    pub async fn register(&self, user: RegisterUser) -> AppResult<User> {
        user.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        if self.repository.users.email_exists(&user.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = self.hash_password(&user.password)?;
        let verification_token = Self::generate_verification_token();

        let created = self
            .repository
            .users
            .create(&user, &password_hash, &verification_token)
            .await?;

        let verification_url = format!(
            "{}/api/v1/auth/verify-email?token={}",
            self.base_url, verification_token
        );

        // Registration stands even when the mail relay is down
        if let Err(e) = self
            .email
            .send_verification(&created.email, &verification_url)
            .await
        {
            tracing::warn!("Failed to send verification email to {}: {}", created.email, e);
        }

        Ok(created)
    }

    /// Authenticate by email and password, returning a JWT token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        let user = self
            .repository
            .users
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if user.is_disabled() {
            return Err(AppError::Authentication("Account is disabled".to_string()));
        }

        if !self.verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        self.create_token(&user)
    }

    /// Consume a verification token and mark the account verified
    pub async fn verify_email(&self, token: &str) -> AppResult<()> {
        let user = self
            .repository
            .users
            .get_by_verification_token(token)
            .await?
            .ok_or_else(|| AppError::BadRequest("Invalid or expired token".to_string()))?;

        self.repository.users.mark_verified(user.id).await
    }

    /// Get user by ID
    pub async fn get_user(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Disable or re-enable a user account (admin operation)
    pub async fn set_account_status(&self, id: i32, disabled: bool) -> AppResult<User> {
        self.repository.users.set_disabled(id, disabled).await
    }

    /// Create JWT token for a user
    fn create_token(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let exp = now + (self.config.jwt_expiration_hours as i64 * 3600);

        let claims = UserClaims {
            sub: user.email.clone(),
            user_id: user.id,
            role: user.role,
            exp,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Verify user password against the stored argon2 hash
    fn verify_password(&self, user: &User, password: &str) -> AppResult<bool> {
        if let Some(ref hash) = user.password {
            let parsed_hash = PasswordHash::new(hash)
                .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
            return Ok(Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok());
        }

        Ok(false)
    }

    /// Hash a password using Argon2
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        let hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
        Ok(hash.to_string())
    }

    /// Random 32-byte hex token for email verification links
    fn generate_verification_token() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::AuthService;

    #[test]
    fn verification_tokens_are_unique_hex() {
        let first = AuthService::generate_verification_token();
        let second = AuthService::generate_verification_token();
        assert_eq!(first.len(), 64);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first, second);
    }
}
