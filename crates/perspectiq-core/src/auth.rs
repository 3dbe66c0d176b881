//! Stored credentials.
//!
//! The token and profile from the last successful login live in
//! `${PERSPECTIQ_HOME}/auth.toml`. A client is authenticated exactly when a
//! token is stored.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::api::{CurrentUser, LoginResponse};
use crate::config::paths;

/// Token and profile of the logged-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Credentials {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Credentials {
    /// Credentials from a successful login.
    pub fn from_login(res: &LoginResponse) -> Self {
        Self {
            token: Some(res.token.clone()),
            user_id: Some(res.user_id),
            username: Some(res.username.clone()),
            role: Some(res.role.clone()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// True when a token is stored but the profile fields are incomplete.
    pub fn needs_profile(&self) -> bool {
        self.is_authenticated() && (self.username.is_none() || self.role.is_none())
    }

    /// Fills username and role from `/auth/me`.
    pub fn apply_profile(&mut self, user: &CurrentUser) {
        self.user_id = Some(user.id);
        self.username = Some(user.username.clone());
        self.role = Some(user.role.clone());
    }

    /// `username (role)` for display.
    pub fn display_name(&self) -> Option<String> {
        let username = self.username.as_deref()?;
        Some(match self.role.as_deref() {
            Some(role) if !role.is_empty() => format!("{username} ({role})"),
            _ => username.to_string(),
        })
    }
}

/// File-backed credential store.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::new(paths::auth_path())
    }
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads stored credentials; a missing file means logged out.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(&self) -> Result<Credentials> {
        if !self.path.exists() {
            return Ok(Credentials::default());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read credentials from {}", self.path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse credentials from {}", self.path.display()))
    }

    /// Persists all credential fields.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written.
    pub fn save(&self, credentials: &Credentials) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }
        let contents =
            toml::to_string(credentials).context("Failed to serialize credentials")?;
        let tmp_path = self.path.with_extension("toml.tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("Failed to write credentials to {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;
        tracing::debug!(path = %self.path.display(), "credentials saved");
        Ok(())
    }

    /// Removes all stored credential fields.
    ///
    /// # Errors
    /// Returns an error if the file exists and cannot be removed.
    pub fn clear(&self) -> Result<()> {
        if self.path.exists() {
            fs::remove_file(&self.path).with_context(|| {
                format!("Failed to remove credentials at {}", self.path.display())
            })?;
        }
        tracing::debug!(path = %self.path.display(), "credentials cleared");
        Ok(())
    }
}

/// Maps a failed login to the message shown to the user.
pub fn login_failure_message(err: &anyhow::Error) -> &'static str {
    let detail = format!("{err:#}");
    if detail.contains("Username already taken") {
        "Username already taken. Please choose another."
    } else if detail.contains("Username exists but role/age mismatch") {
        "Username exists but details mismatch. Check role/age or pick a new username."
    } else {
        "Connection failed. Verify backend status."
    }
}
