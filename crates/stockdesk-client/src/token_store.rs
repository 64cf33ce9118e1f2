//! # Token Storage
//!
//! Durable home of the bearer token. The token is one opaque string kept
//! under a single key (`token`); the session never holds a second copy.
//!
//! ```text
//!   login ok ──► save()      initialize ──► load()
//!   logout   ──► clear()     401 anywhere ──► clear()
//! ```
//!
//! `FileTokenStore` is what the console uses. `MemoryTokenStore` backs tests
//! and short-lived embeddings that should not touch disk.

use secrecy::{ExposeSecret, SecretString};
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::error::ClientResult;

/// Persistence for the bearer token.
pub trait TokenStore: Send + Sync {
    /// Returns the stored token, if any.
    fn load(&self) -> ClientResult<Option<SecretString>>;

    /// Replaces the stored token.
    fn save(&self, token: &SecretString) -> ClientResult<()>;

    /// Removes the stored token. Clearing an empty store succeeds.
    fn clear(&self) -> ClientResult<()>;
}

// =============================================================================
// File Store
// =============================================================================

/// Token kept as a single file, normally `<data dir>/token`.
///
/// On unix the file is created readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> ClientResult<Option<SecretString>> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    Ok(None)
                } else {
                    Ok(Some(SecretString::from(token.to_string())))
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, token: &SecretString) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let mut options = OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;
        #[cfg(unix)]
        {
            // mode() only applies when the file is created
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(token.expose_secret().as_bytes())?;
        debug!(path = ?self.path, "Token saved");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = ?self.path, "Token cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// Token held in process memory only.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<SecretString>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that starts out holding `token`.
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(SecretString::from(token.into()))),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> ClientResult<Option<SecretString>> {
        let token = self.token.lock().expect("Token mutex poisoned");
        Ok(token
            .as_ref()
            .map(|t| SecretString::from(t.expose_secret().to_string())))
    }

    fn save(&self, token: &SecretString) -> ClientResult<()> {
        *self.token.lock().expect("Token mutex poisoned") =
            Some(SecretString::from(token.expose_secret().to_string()));
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.token.lock().expect("Token mutex poisoned") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileTokenStore::new(dir.path().join("nested").join("token"));

        assert!(store.load().unwrap().is_none());

        store.save(&SecretString::from("abc|123".to_string())).unwrap();
        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.expose_secret(), "abc|123");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
        // Clearing twice is fine
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_token_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        let store = FileTokenStore::new(&path);

        store.save(&SecretString::from("first".to_string())).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // an existing world-readable file is tightened on save
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();
        store.save(&SecretString::from("second".to_string())).unwrap();
        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "second");
    }

    #[test]
    fn test_blank_file_is_no_token() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("token");
        std::fs::write(&path, "  \n").unwrap();

        assert!(FileTokenStore::new(path).load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryTokenStore::with_token("t0k3n");
        assert_eq!(store.load().unwrap().unwrap().expose_secret(), "t0k3n");

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }
}
