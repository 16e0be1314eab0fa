//! Durable storage for the credential pair.
//!
//! The vault persists exactly two strings — the access and refresh tokens —
//! under fixed keys, scoped to the OS user profile. Nothing else about the
//! session is persisted: the principal is always re-fetched on startup.
//!
//! Vault operations are infallible by contract. Storage failures (missing
//! directory, unreadable file) are logged and degrade to an empty vault;
//! they never propagate into session logic.

use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// The access/refresh bearer tokens issued at login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Storage for the credential pair.
///
/// Only the session store and the gateway's 401 handler write to the vault.
pub trait TokenVault: Send + Sync {
    /// Write both tokens, overwriting any prior pair. Takes effect
    /// immediately: a subsequent [`read`](Self::read) reflects the new values.
    fn store(&self, access_token: &str, refresh_token: &str);

    /// Whatever is currently stored. No validation, no decoding.
    fn read(&self) -> Option<CredentialPair>;

    /// Remove both tokens. Idempotent: clearing an empty vault is a no-op.
    fn clear(&self);
}

/// In-process vault, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryVault {
    pair: Mutex<Option<CredentialPair>>,
}

impl MemoryVault {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TokenVault for MemoryVault {
    fn store(&self, access_token: &str, refresh_token: &str) {
        *lock(&self.pair) = Some(CredentialPair {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        });
    }

    fn read(&self) -> Option<CredentialPair> {
        lock(&self.pair).clone()
    }

    fn clear(&self) {
        *lock(&self.pair) = None;
    }
}

/// File-backed vault under the per-user data directory.
///
/// The file contains the two tokens as a small JSON object
/// (`{"accessToken": …, "refreshToken": …}`) and nothing else.
#[derive(Debug)]
pub struct FileVault {
    path: PathBuf,
}

const CREDENTIALS_FILE: &str = "credentials.json";

impl FileVault {
    /// Vault at the platform data directory for `app_name`
    /// (e.g. `~/.local/share/hrdesk/credentials.json` on Linux).
    ///
    /// Falls back to the current directory when no data directory can be
    /// determined.
    pub fn new(app_name: &str) -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| {
            tracing::warn!("no user data directory; storing credentials in cwd");
            PathBuf::from(".")
        });
        Self {
            path: base.join(app_name).join(CREDENTIALS_FILE),
        }
    }

    /// Vault at an explicit file path (tests, portable installs).
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl TokenVault for FileVault {
    fn store(&self, access_token: &str, refresh_token: &str) {
        let pair = CredentialPair {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.to_string(),
        };

        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                tracing::error!(path = %parent.display(), error = %e, "failed to create vault directory");
                return;
            }
        }

        let json = serde_json::to_vec_pretty(&pair).unwrap_or_default();
        if let Err(e) = fs::write(&self.path, json) {
            tracing::error!(path = %self.path.display(), error = %e, "failed to write vault file");
        }
    }

    fn read(&self) -> Option<CredentialPair> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to read vault file");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(pair) => Some(pair),
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "vault file is corrupt; treating as empty");
                None
            }
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to clear vault file");
            }
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_vault_store_read_clear() {
        let vault = MemoryVault::new();
        assert_eq!(vault.read(), None);

        vault.store("t1", "r1");
        let pair = vault.read().unwrap();
        assert_eq!(pair.access_token, "t1");
        assert_eq!(pair.refresh_token, "r1");

        // Overwrite, not merge.
        vault.store("t2", "r2");
        assert_eq!(vault.read().unwrap().access_token, "t2");

        vault.clear();
        assert_eq!(vault.read(), None);
        // Idempotent.
        vault.clear();
        assert_eq!(vault.read(), None);
    }

    #[test]
    fn file_vault_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        FileVault::at_path(&path).store("t1", "r1");

        // A fresh handle over the same path sees the stored pair.
        let reopened = FileVault::at_path(&path);
        assert_eq!(
            reopened.read(),
            Some(CredentialPair {
                access_token: "t1".to_string(),
                refresh_token: "r1".to_string(),
            })
        );

        reopened.clear();
        assert_eq!(reopened.read(), None);
    }

    #[test]
    fn file_vault_clear_on_empty_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let vault = FileVault::at_path(dir.path().join("credentials.json"));
        vault.clear();
        assert_eq!(vault.read(), None);
    }

    #[test]
    fn file_vault_uses_fixed_wire_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        FileVault::at_path(&path).store("t1", "r1");

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
        assert_eq!(raw["accessToken"], "t1");
        assert_eq!(raw["refreshToken"], "r1");
    }
}
