//! Session context: a small key/value store holding the auth token, user data,
//! theme and language under fixed keys.
//!
//! Passed explicitly to whoever needs it. Either purely in memory or backed by
//! a JSON file that is rewritten on every change.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

use thiserror::Error;
use tracing::{debug, info};

pub const AUTH_TOKEN_KEY: &str = "auth_token";
pub const USER_DATA_KEY: &str = "user_data";
pub const THEME_KEY: &str = "app_theme";
pub const LANGUAGE_KEY: &str = "app_language";

pub const DEFAULT_LANGUAGE: &str = "en";

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("session storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session storage is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown theme: {0} (expected light or dark)")]
    InvalidTheme(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        })
    }
}

impl FromStr for Theme {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(SessionError::InvalidTheme(other.to_string())),
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    values: BTreeMap<String, String>,
    path: Option<PathBuf>,
}

impl Inner {
    /// Write `staged` to the backing file, then adopt it. On failure the
    /// current values stay as they were.
    fn commit(&mut self, staged: BTreeMap<String, String>) -> Result<(), SessionError> {
        if let Some(path) = &self.path {
            let json = serde_json::to_string_pretty(&staged)?;
            std::fs::write(path, json)?;
            debug!(path = %path.display(), "session storage written");
        }
        self.values = staged;
        Ok(())
    }
}

/// Shared handle to the session key/value store. Cloning shares state.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<Inner>>,
}

impl SessionStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store. A missing file starts empty and is created on
    /// the first write.
    pub fn open(path: &Path) -> Result<Self, SessionError> {
        let values = if path.exists() {
            let text = std::fs::read_to_string(path)?;
            if text.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&text)?
            }
        } else {
            BTreeMap::new()
        };
        info!(path = %path.display(), keys = values.len(), "opened session storage");
        Ok(Self {
            inner: Arc::new(Mutex::new(Inner {
                values,
                path: Some(path.to_path_buf()),
            })),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().values.get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<(), SessionError> {
        let mut inner = self.lock();
        let mut staged = inner.values.clone();
        staged.insert(key.to_string(), value.into());
        inner.commit(staged)
    }

    pub fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut inner = self.lock();
        if !inner.values.contains_key(key) {
            return Ok(());
        }
        let mut staged = inner.values.clone();
        staged.remove(key);
        inner.commit(staged)
    }

    pub fn token(&self) -> Option<String> {
        self.get(AUTH_TOKEN_KEY).filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some() && self.get(USER_DATA_KEY).is_some()
    }

    /// Store a token and, optionally, the user record that came with it.
    pub fn login(&self, token: &str, user: Option<&serde_json::Value>) -> Result<(), SessionError> {
        let mut inner = self.lock();
        let mut staged = inner.values.clone();
        staged.insert(AUTH_TOKEN_KEY.to_string(), token.to_string());
        match user {
            Some(user) => {
                staged.insert(USER_DATA_KEY.to_string(), serde_json::to_string(user)?);
            }
            None => {
                staged.remove(USER_DATA_KEY);
            }
        }
        inner.commit(staged)
    }

    /// Drop the token and user data.
    pub fn logout(&self) -> Result<(), SessionError> {
        let mut inner = self.lock();
        let mut staged = inner.values.clone();
        let had_token = staged.remove(AUTH_TOKEN_KEY).is_some();
        let had_user = staged.remove(USER_DATA_KEY).is_some();
        if had_token || had_user {
            inner.commit(staged)?;
        }
        Ok(())
    }

    pub fn user(&self) -> Option<serde_json::Value> {
        self.get(USER_DATA_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn theme(&self) -> Theme {
        self.get(THEME_KEY)
            .and_then(|t| t.parse().ok())
            .unwrap_or_default()
    }

    pub fn set_theme(&self, theme: Theme) -> Result<(), SessionError> {
        self.set(THEME_KEY, theme.to_string())
    }

    pub fn language(&self) -> String {
        self.get(LANGUAGE_KEY)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
    }

    pub fn set_language(&self, language: &str) -> Result<(), SessionError> {
        self.set(LANGUAGE_KEY, language)
    }
}
