//! Session token storage.
//!
//! The Auth Panel never touches storage directly; it is handed a
//! [`TokenStore`] and goes through `get_token` / `set_token` /
//! `clear_token`. [`FileTokenStore`] persists the token across invocations
//! (`~/.facewatch/session.json` by default); [`MemoryTokenStore`] keeps it
//! for the life of the process.
//!
//! On Unix the session file is created 0600 and a directory the store
//! creates is 0700. Writes go through a temp file and a rename.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::config::schema::SessionConfig;

/// Read/write/clear capability over the single stored auth token.
pub trait TokenStore {
    fn get_token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> Result<()>;
    fn clear_token(&self) -> Result<()>;
}

impl<T: TokenStore + ?Sized> TokenStore for &T {
    fn get_token(&self) -> Option<String> {
        (**self).get_token()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        (**self).set_token(token)
    }

    fn clear_token(&self) -> Result<()> {
        (**self).clear_token()
    }
}

// ---------------------------------------------------------------------------
// File store
// ---------------------------------------------------------------------------

/// Session file permissions (Unix only): owner read/write.
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Session directory permissions (Unix only): owner read/write/execute.
#[cfg(unix)]
const DIR_MODE: u32 = 0o700;

/// On-disk layout of the session file.
#[derive(Debug, Serialize, Deserialize)]
struct SessionFile {
    #[serde(rename = "authToken")]
    auth_token: String,
}

/// Token persisted as a small JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &SessionConfig) -> Result<Self> {
        let path = config
            .token_path()
            .context("could not determine home directory for the session file")?;
        Ok(Self::new(path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_dir(&self) -> Result<()> {
        let Some(parent) = self.path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() || parent.exists() {
            return Ok(());
        }
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create session directory {}", parent.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(DIR_MODE)).with_context(
                || format!("failed to set permissions on {}", parent.display()),
            )?;
        }
        Ok(())
    }

    /// Write `content` to a sibling temp file, then rename it over the
    /// session file. On Unix the temp file is created 0600.
    fn write_atomic(&self, content: &str) -> Result<()> {
        let temp_path = self.path.with_extension("tmp");
        // A leftover temp file would keep its old mode.
        let _ = fs::remove_file(&temp_path);

        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::OpenOptionsExt;
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .mode(FILE_MODE)
                .open(&temp_path)
                .with_context(|| format!("failed to create {}", temp_path.display()))?;
            file.write_all(content.as_bytes())
                .with_context(|| format!("failed to write {}", temp_path.display()))?;
            file.sync_all()
                .with_context(|| format!("failed to sync {}", temp_path.display()))?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&temp_path, content)
                .with_context(|| format!("failed to write {}", temp_path.display()))?;
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e).with_context(|| {
                format!(
                    "failed to rename {} to {}",
                    temp_path.display(),
                    self.path.display()
                )
            });
        }
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    /// Missing, unreadable, or malformed files read as "no token".
    fn get_token(&self) -> Option<String> {
        let content = fs::read_to_string(&self.path).ok()?;
        let file: SessionFile = serde_json::from_str(&content).ok()?;
        Some(file.auth_token).filter(|t| !t.is_empty())
    }

    fn set_token(&self, token: &str) -> Result<()> {
        self.ensure_dir()?;
        let json = serde_json::to_string(&SessionFile {
            auth_token: token.to_string(),
        })
        .context("failed to serialize session")?;
        self.write_atomic(&json)
    }

    fn clear_token(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => {
                Err(e).with_context(|| format!("failed to remove {}", self.path.display()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Memory store
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get_token(&self) -> Option<String> {
        self.token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_token(&self, token: &str) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn clear_token(&self) -> Result<()> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}
