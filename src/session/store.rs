use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::api::models::{Tokens, User};

const SESSION_FILE: &str = "session.json";

/// Tokens and profile of the logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub tokens: Tokens,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionEntry {
    saved_at: chrono::DateTime<chrono::Utc>,
    session: Session,
}

/// Keeps the session on disk between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    dir: PathBuf,
    max_age_secs: u64,
}

impl SessionStore {
    pub fn new(dir: PathBuf, max_age_secs: u64) -> Self {
        Self { dir, max_age_secs }
    }

    /// Store for this run, or `None` when sessions are not kept. With
    /// `forget`, the stored session is removed either way.
    pub fn open(dir: PathBuf, max_age_secs: u64, keep: bool, forget: bool) -> Result<Option<Self>> {
        let store = Self::new(dir, max_age_secs);
        if forget {
            store.clear()?;
        }
        Ok(keep.then_some(store))
    }

    pub fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }

    /// Stored session, unless missing, unreadable or older than the max age.
    pub fn load(&self) -> Option<Session> {
        let path = self.path();
        let content = std::fs::read_to_string(&path).ok()?;

        let entry: SessionEntry = match serde_json::from_str(&content) {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Failed to parse stored session");
                return None;
            }
        };

        let age = chrono::Utc::now()
            .signed_duration_since(entry.saved_at)
            .num_seconds();

        if age < 0 || age as u64 > self.max_age_secs {
            debug!(age = age, "Stored session expired");
            return None;
        }

        debug!(user = %entry.session.user.username, age = age, "Loaded stored session");
        Some(entry.session)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        create_private_dir(&self.dir)
            .with_context(|| format!("Failed to create session directory: {}", self.dir.display()))?;

        let entry = SessionEntry {
            saved_at: chrono::Utc::now(),
            session: session.clone(),
        };

        let content = serde_json::to_string(&entry).context("Failed to serialize session")?;
        let path = self.path();
        write_private(&path, &content)
            .with_context(|| format!("Failed to write session file: {}", path.display()))?;

        debug!(user = %session.user.username, "Session saved");
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
            debug!("Session cleared");
        }
        Ok(())
    }
}

// The file holds bearer tokens: owner-only on unix.

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;
    std::fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)
}

fn write_private(path: &Path, content: &str) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // `mode` only applies on create; tighten a file left by an older run.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content.as_bytes())
}
