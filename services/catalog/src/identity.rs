//! Identity Provider
//!
//! The upload workflow needs the caller's employee identifier (MTRC) before
//! any mutating request leaves the client. The provider is an injected
//! collaborator; the persisted profile it reads is written by the login
//! flow, never by this engine.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Resolves the persisted employee identifier, if any.
pub trait IdentityProvider: Send + Sync {
    fn employee_id(&self) -> Option<String>;
}

/// The serialized user profile the login flow leaves behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub mtrc: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Reads the profile file on every lookup, mirroring how the browser build
/// reads persisted storage: the login flow may rewrite it at any time.
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn profile(&self) -> Option<UserProfile> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "unreadable profile, treating as signed out");
                None
            }
        }
    }
}

impl IdentityProvider for ProfileStore {
    fn employee_id(&self) -> Option<String> {
        self.profile()
            .map(|p| p.mtrc)
            .filter(|id| !id.trim().is_empty())
    }
}

/// Fixed identity for tests and the demo binary.
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(Some(id.into()))
    }

    /// A signed-out caller.
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn employee_id(&self) -> Option<String> {
        self.0.clone().filter(|id| !id.trim().is_empty())
    }
}
