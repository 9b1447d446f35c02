//! Error types for FaithStream
//!
//! All errors use thiserror for structured error handling.
//! These errors serialize to their display string so callers can show them as-is.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Media not found: {0}")]
    MediaNotFound(String),

    #[error("Admin not found: {0}")]
    AdminNotFound(String),

    #[error("Notice not found: {0}")]
    NoticeNotFound(String),

    #[error("An admin with email {0} already exists")]
    DuplicateAdmin(String),

    #[error("Cannot remove the last remaining admin")]
    LastAdmin,

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("{0}")]
    Login(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Credential store error: {0}")]
    Credentials(String),

    #[error("{0}")]
    Generic(String),
}

impl serde::Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
