//! Session store
//!
//! A placeholder gate in front of the protected views. Credentials are
//! checked by a pluggable [`CredentialVerifier`]; nothing is persisted and
//! sessions never expire.

use serde::{Deserialize, Serialize};

/// Message shown for any rejected login
pub const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// Checks a username/password pair
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> bool;
}

/// Accepts exactly one fixed credential pair
#[derive(Debug, Clone)]
pub struct StaticCredentials {
    username: String,
    password: String,
}

impl StaticCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for StaticCredentials {
    fn default() -> Self {
        Self::new("admin", "1234")
    }
}

impl CredentialVerifier for StaticCredentials {
    fn verify(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub error: Option<String>,
}

pub struct SessionStore {
    state: SessionState,
    verifier: Box<dyn CredentialVerifier>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore").field("state", &self.state).finish()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Box::new(StaticCredentials::default()))
    }
}

impl SessionStore {
    pub fn new(verifier: Box<dyn CredentialVerifier>) -> Self {
        Self {
            state: SessionState::default(),
            verifier,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated
    }

    pub fn user(&self) -> Option<&User> {
        self.state.user.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.state.error.as_deref()
    }

    /// Submit credentials; returns whether the session is now authenticated
    pub fn login(&mut self, username: &str, password: &str) -> bool {
        if self.verifier.verify(username, password) {
            tracing::info!(username, "Login accepted");
            self.state = SessionState {
                is_authenticated: true,
                user: Some(User {
                    username: username.to_string(),
                }),
                error: None,
            };
            true
        } else {
            tracing::info!(username, "Login rejected");
            self.state = SessionState {
                is_authenticated: false,
                user: None,
                error: Some(INVALID_CREDENTIALS.to_string()),
            };
            false
        }
    }

    pub fn logout(&mut self) {
        if let Some(user) = &self.state.user {
            tracing::info!(username = %user.username, "Logged out");
        }
        self.state = SessionState::default();
    }

    pub fn clear_error(&mut self) {
        self.state.error = None;
    }
}
