//! Bearer token session, mirrored to durable storage so it survives restarts.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{ConsoleError, Result};

/// Durable home for the session token.
pub trait TokenStore {
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Stores the token as the sole content of a file in the config directory.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_location() -> Result<Self> {
        Ok(Self::new(Config::config_dir()?.join("session")))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let token = contents.trim();
        (!token.is_empty()).then(|| token.to_string())
    }

    fn save(&self, token: &str) -> Result<()> {
        let write_err = |e| ConsoleError::SessionWrite {
            path: self.path.clone(),
            source: e,
        };

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(write_err)?;
        }
        std::fs::write(&self.path, token).map_err(write_err)
    }

    fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ConsoleError::SessionWrite {
                path: self.path.clone(),
                source: e,
            }),
        }
    }
}

/// In-process store, nothing survives the process.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryTokenStore {
    token: std::sync::Mutex<Option<String>>,
}

#[cfg(test)]
impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.lock().ok()?.clone()
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = Some(token.to_string());
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if let Ok(mut slot) = self.token.lock() {
            *slot = None;
        }
        Ok(())
    }
}

/// Authentication context owned by the application root and passed to whatever needs the token.
pub struct Session {
    token: Option<String>,
    store: Box<dyn TokenStore>,
}

impl Session {
    /// Restore from storage; a missing or blank token means unauthenticated.
    pub fn open(store: Box<dyn TokenStore>) -> Self {
        let token = store.load();
        Self { token, store }
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Store a new token. A blank token leaves the session logged out.
    pub fn login(&mut self, token: String) -> Result<()> {
        let token = token.trim();
        if token.is_empty() {
            return self.logout();
        }

        self.store.save(token)?;
        self.token = Some(token.to_string());
        Ok(())
    }

    pub fn logout(&mut self) -> Result<()> {
        self.token = None;
        self.store.clear()
    }
}
