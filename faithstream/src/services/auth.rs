//! Staff login and session persistence
//!
//! The check is an email lookup plus a password-length rule. Nothing is
//! verified against a secret: this gates the dashboard UI, it does not
//! protect the data.

use crate::config;
use crate::database::{Admin, Repository};
use crate::error::{AppError, Result};
use crate::storage::KeyValueStore;
use thiserror::Error;

/// Why a login attempt was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Access Denied. This email is not authorized.")]
    UnknownEmail,

    #[error("Invalid password. Minimum 6 characters required.")]
    PasswordTooShort,
}

impl From<LoginError> for AppError {
    fn from(e: LoginError) -> Self {
        AppError::Login(e.to_string())
    }
}

pub struct AuthService<S> {
    repo: Repository<S>,
}

impl<S> Clone for AuthService<S> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
        }
    }
}

impl<S: KeyValueStore> AuthService<S> {
    pub fn new(repo: Repository<S>) -> Self {
        Self { repo }
    }

    /// Decide a login attempt without touching the session
    pub async fn check_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<std::result::Result<Admin, LoginError>> {
        let Some(admin) = self.repo.find_admin_by_email(email).await? else {
            return Ok(Err(LoginError::UnknownEmail));
        };

        // Length in UTF-16 code units, as the browser form counted it
        if password.encode_utf16().count() < config::MIN_PASSWORD_LENGTH {
            return Ok(Err(LoginError::PasswordTooShort));
        }

        Ok(Ok(admin))
    }

    /// Log in and persist the session
    pub async fn login(&self, email: &str, password: &str) -> Result<Admin> {
        let admin = match self.check_credentials(email, password).await? {
            Ok(admin) => admin,
            Err(e) => {
                tracing::info!("Login rejected for {}: {}", email, e);
                return Err(e.into());
            }
        };

        let raw = serde_json::to_string(&admin)?;
        self.repo.store().set(config::SESSION_KEY, &raw).await?;

        tracing::info!("Admin logged in: {} ({})", admin.email, admin.role);
        Ok(admin)
    }

    /// The admin saved by the last login, if any.
    ///
    /// A session that cannot be parsed is dropped and reads as logged out.
    pub async fn restore_session(&self) -> Result<Option<Admin>> {
        let Some(raw) = self.repo.store().get(config::SESSION_KEY).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(admin) => Ok(Some(admin)),
            Err(e) => {
                tracing::warn!("Dropping unreadable session: {}", e);
                self.repo.store().remove(config::SESSION_KEY).await?;
                Ok(None)
            }
        }
    }

    pub async fn logout(&self) -> Result<()> {
        self.repo.store().remove(config::SESSION_KEY).await?;
        tracing::info!("Admin logged out");
        Ok(())
    }
}
