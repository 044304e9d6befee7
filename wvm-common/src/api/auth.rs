//! Admin password login and bearer-token sessions
//!
//! # Architecture
//!
//! - The admin password is configured as a hex SHA-256 hash, never in clear
//! - A successful login issues a random 64-hex-char bearer token
//! - Tokens expire after the configured TTL (24 hours by default)
//! - With no hash configured, no login can succeed and the admin API stays
//!   closed; only an explicitly disabled [`AdminAuth`] lets every request pass
//!
//! No HTTP framework dependencies here; the middleware lives in wvm-admin.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::ids;

// ========================================
// Error Types
// ========================================

/// Authentication error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminAuthError {
    /// Password does not match the configured hash
    InvalidPassword,

    /// No token presented
    MissingToken,

    /// Token unknown or revoked
    UnknownToken,

    /// Token was valid but has expired
    Expired,
}

impl std::fmt::Display for AdminAuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdminAuthError::InvalidPassword => write!(f, "Invalid password"),
            AdminAuthError::MissingToken => write!(f, "Unauthorized"),
            AdminAuthError::UnknownToken => write!(f, "Unauthorized"),
            AdminAuthError::Expired => write!(f, "Session expired"),
        }
    }
}

impl std::error::Error for AdminAuthError {}

// ========================================
// Password Hashing
// ========================================

/// Hex SHA-256 of a password
///
/// # Examples
///
/// ```
/// use wvm_common::api::auth::hash_password;
///
/// let hash = hash_password("secret");
/// assert_eq!(hash.len(), 64);
/// ```
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compare a password against a configured hex hash (case-insensitive hex)
pub fn verify_password(password: &str, expected_hash: &str) -> bool {
    hash_password(password).eq_ignore_ascii_case(expected_hash.trim())
}

/// Token from an `Authorization: Bearer <token>` header value
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

// ========================================
// Sessions
// ========================================

#[derive(Debug, Clone)]
struct Session {
    expires: DateTime<Utc>,
}

/// Password check plus the in-memory session table
pub struct AdminAuth {
    password_hash: Option<String>,
    /// Set only by [`AdminAuth::disabled`]
    open: bool,
    ttl: Duration,
    sessions: RwLock<HashMap<String, Session>>,
}

impl AdminAuth {
    /// Password-protected auth; a missing or blank hash rejects every login
    pub fn new(password_hash: Option<String>, ttl_hours: i64) -> Self {
        Self {
            password_hash: password_hash.filter(|h| !h.trim().is_empty()),
            open: false,
            ttl: Duration::hours(ttl_hours.max(1)),
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Auth that lets every request through (development only)
    pub fn disabled() -> Self {
        Self {
            open: true,
            ..Self::new(None, 24)
        }
    }

    pub fn is_enabled(&self) -> bool {
        !self.open
    }

    /// Whether a password hash is configured
    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Check the password and issue a session token
    pub async fn login(&self, password: &str) -> Result<String, AdminAuthError> {
        if !self.open {
            let Some(expected) = &self.password_hash else {
                warn!("Admin login attempted but no password hash is configured");
                return Err(AdminAuthError::InvalidPassword);
            };
            if !verify_password(password, expected) {
                info!("Admin login rejected");
                return Err(AdminAuthError::InvalidPassword);
            }
        }

        let token = ids::random_hex(32);
        let expires = Utc::now() + self.ttl;
        self.sessions
            .write()
            .await
            .insert(token.clone(), Session { expires });

        info!("Admin session issued, expires {}", expires.to_rfc3339());
        Ok(token)
    }

    pub async fn logout(&self, token: &str) {
        if self.sessions.write().await.remove(token).is_some() {
            info!("Admin session revoked");
        }
    }

    /// Validate a presented token; expired sessions are purged on use
    pub async fn authorize(&self, token: Option<&str>) -> Result<(), AdminAuthError> {
        if !self.is_enabled() {
            return Ok(());
        }
        let token = token.ok_or(AdminAuthError::MissingToken)?;

        let expires = self
            .sessions
            .read()
            .await
            .get(token)
            .map(|s| s.expires)
            .ok_or(AdminAuthError::UnknownToken)?;

        if expires < Utc::now() {
            self.sessions.write().await.remove(token);
            debug!("Purged expired admin session");
            return Err(AdminAuthError::Expired);
        }
        Ok(())
    }

    /// Whether a token belongs to a live session (ignores the disabled shortcut)
    pub async fn is_valid_session(&self, token: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(token)
            .map(|s| s.expires > Utc::now())
            .unwrap_or(false)
    }

    #[cfg(test)]
    async fn force_expire(&self, token: &str) {
        if let Some(session) = self.sessions.write().await.get_mut(token) {
            session.expires = Utc::now() - Duration::seconds(1);
        }
    }
}

// ========================================
// Tests
// ========================================
