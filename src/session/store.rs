use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::Result;

/// Fixed name the admin key is remembered under.
pub const ADMIN_KEY_NAME: &str = "adminKey";

/// Session-scoped storage for the admin key.
pub trait SessionStore {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, value: &str) -> Result<()>;
    /// Forget the stored value. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Keeps the admin key in a file named [`ADMIN_KEY_NAME`] inside the session directory.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(session_dir: impl AsRef<Path>) -> Self {
        Self {
            path: session_dir.as_ref().join(ADMIN_KEY_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(unix)]
    fn create(&self) -> std::io::Result<fs::File> {
        use std::os::unix::fs::OpenOptionsExt;

        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&self.path)
    }

    #[cfg(not(unix))]
    fn create(&self) -> std::io::Result<fs::File> {
        fs::File::create(&self.path)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(value) if value.is_empty() => Ok(None),
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, value: &str) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        let mut file = self.create()?;
        file.write_all(value.as_bytes())?;
        debug!("Stored admin key at {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!("Removed stored admin key at {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Keeps the admin key in memory only; it lives exactly as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    value: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: Mutex::new(Some(value.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.value.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, value: &str) -> Result<()> {
        *self.slot() = Some(value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}

impl<S: SessionStore + ?Sized> SessionStore for &S {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn save(&self, value: &str) -> Result<()> {
        (**self).save(value)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}
