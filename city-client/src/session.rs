//! Session context
//!
//! Holds the bearer token and the post-login redirect path. The gateway asks
//! the session for the token on every request instead of caching it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

/// Persisted session state
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    pub token: Option<String>,
    /// Page to return to after logging in
    pub redirect_path: Option<String>,
}

/// Durable home of [`SessionData`]
pub trait SessionStore: Send + Sync + fmt::Debug {
    fn load(&self) -> SessionData;
    fn save(&self, data: &SessionData) -> std::io::Result<()>;
}

/// Process-local store
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    data: RwLock<SessionData>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(data: SessionData) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> SessionData {
        self.data.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn save(&self, data: &SessionData) -> std::io::Result<()> {
        *self.data.write().unwrap_or_else(|e| e.into_inner()) = data.clone();
        Ok(())
    }
}

/// JSON file store, survives restarts of the console
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> SessionData {
        if !self.path.exists() {
            return SessionData::default();
        }
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "session file unreadable, starting logged out");
                return SessionData::default();
            }
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "session file corrupt, starting logged out");
            SessionData::default()
        })
    }

    fn save(&self, data: &SessionData) -> std::io::Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, json)
    }
}

/// Session handle, cheap to clone and shared with the gateway
#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// In-memory session, optionally pre-authenticated
    pub fn in_memory(token: Option<String>) -> Self {
        Self::new(MemorySessionStore::with_data(SessionData {
            token,
            redirect_path: None,
        }))
    }

    /// Current bearer token, read from the store
    pub fn token(&self) -> Option<String> {
        self.store.load().token.filter(|t| !t.is_empty())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) -> std::io::Result<()> {
        let mut data = self.store.load();
        data.token = Some(token.into());
        self.store.save(&data)
    }

    /// Drop the token, keeping the redirect path
    pub fn clear_token(&self) -> std::io::Result<()> {
        let mut data = self.store.load();
        data.token = None;
        self.store.save(&data)
    }

    pub fn remember_redirect(&self, path: impl Into<String>) -> std::io::Result<()> {
        let mut data = self.store.load();
        data.redirect_path = Some(path.into());
        self.store.save(&data)
    }

    /// Consume the stored redirect path
    pub fn take_redirect(&self) -> std::io::Result<Option<String>> {
        let mut data = self.store.load();
        let path = data.redirect_path.take();
        if path.is_some() {
            self.store.save(&data)?;
        }
        Ok(path)
    }
}
