//! Application configuration constants
//!
//! Central location for storage keys, resource limits,
//! and validation boundaries used throughout the application.

// ===== Storage Keys =====

/// Key holding the JSON array of media items
pub const MEDIA_KEY: &str = "faithstream_media";
/// Key holding the JSON array of admin accounts
pub const ADMIN_KEY: &str = "faithstream_admins";
/// Key holding the JSON array of notices
pub const NOTICE_KEY: &str = "faithstream_notices";
/// Key holding the recent library search terms
pub const SEARCH_HISTORY_KEY: &str = "faithstream_recent_searches";
/// Key holding the admin record of the current session
pub const SESSION_KEY: &str = "faithstream_user";

// ===== Library Limits =====

/// Maximum number of recent search terms kept
pub const MAX_SEARCH_HISTORY: usize = 6;

/// Minimum trimmed length for a search term to be remembered
pub const MIN_HISTORY_TERM_LENGTH: usize = 3;

/// Number of media items shown on the home page
pub const HOME_RECENT_MEDIA: usize = 3;

// ===== Login =====

/// Minimum password length accepted at login
pub const MIN_PASSWORD_LENGTH: usize = 6;

// ===== Attachment Limits =====

/// Maximum audio attachment size in bytes (100 MiB)
pub const MAX_AUDIO_SIZE: u64 = 100 * 1024 * 1024;

/// Maximum thumbnail size in bytes (5 MiB)
pub const MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

/// Tick interval of the simulated upload progress
pub const UPLOAD_TICK_MS: u64 = 150;

/// Largest random progress step per tick, in percent
pub const UPLOAD_MAX_STEP: f64 = 20.0;

// ===== Media Form Defaults =====

/// Duration prefilled on a new media form
pub const DEFAULT_DURATION: &str = "40:00";

// ===== Title Suggestions =====

/// Generative model used for title suggestions
pub const DEFAULT_SUGGESTION_MODEL: &str = "gemini-3-flash-preview";

/// Base URL of the generative language API
pub const DEFAULT_SUGGESTION_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Environment variables checked for an API key, in order
pub const API_KEY_ENV_VARS: &[&str] = &["GEMINI_API_KEY", "API_KEY"];

// ===== Player =====

/// Volume a fresh player starts at
pub const DEFAULT_VOLUME: u8 = 80;

// ===== Database =====

/// Connections in the shared SQLite pool
pub const DB_MAX_CONNECTIONS: u32 = 5;

/// Seconds a connection waits on a locked database before failing
pub const DB_BUSY_TIMEOUT_SECS: u64 = 5;
