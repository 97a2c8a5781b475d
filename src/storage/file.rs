//! Filesystem backing store.
//!
//! Each key becomes one file directly under the base directory. Keys are
//! sanitized so that no key can address a path outside of it.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;
use tracing::debug;

use crate::storage::{BlobReader, Context, Result, Storage, StorageError};

/// Name of the file written and removed to verify write access.
const PROBE_FILE: &str = ".write_probe";

// == File Storage ==
/// Stores each entry as a file under `base_dir`.
///
/// The lock guards the live entry count and serializes writers; readers
/// share it.
#[derive(Debug)]
pub struct FileStorage {
    base_dir: PathBuf,
    live: RwLock<usize>,
}

impl FileStorage {
    // == Constructor ==
    /// Opens (creating if needed) a store rooted at `base_dir`.
    ///
    /// Fails if the parent directory is missing, or if either the parent or
    /// the base directory is not writable. The live count starts at the
    /// number of entries already present.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        if base_dir.as_os_str().is_empty() {
            return Err(StorageError::InvalidPath(
                "base directory cannot be empty".to_string(),
            ));
        }

        let parent = match base_dir.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.is_dir() {
            return Err(StorageError::io(
                "parent directory does not exist",
                io::Error::new(io::ErrorKind::NotFound, parent.display().to_string()),
            ));
        }
        probe_write_access(parent).map_err(|e| {
            StorageError::io("no write access to parent directory", e)
        })?;

        fs::create_dir_all(base_dir)
            .map_err(|e| StorageError::io("failed to create base directory", e))?;
        probe_write_access(base_dir)
            .map_err(|e| StorageError::io("no write access to base directory", e))?;

        let existing = fs::read_dir(base_dir)
            .map_err(|e| StorageError::io("failed to read base directory", e))?
            .count();

        debug!(
            base_dir = %base_dir.display(),
            existing,
            "File storage initialized"
        );

        Ok(Self {
            base_dir: base_dir.to_path_buf(),
            live: RwLock::new(existing),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // == Sanitize Key ==
    /// Maps a cache key to a single safe file name.
    ///
    /// `:`, `/` and `\` become `_`, `..` becomes `__`, runs of three or more
    /// underscores collapse to `__`, and leading underscores are dropped.
    /// An empty result (or a bare `.`) maps to `empty`.
    ///
    /// The mapping is lossy. Besides the replaced characters, keys that
    /// differ only in the length of an underscore run collide: `a___b` and
    /// `a__b` share one file.
    pub fn sanitize_key(key: &str) -> String {
        let replaced = key.replace([':', '/', '\\'], "_").replace("..", "__");

        let mut collapsed = String::with_capacity(replaced.len());
        let mut run = 0;
        for ch in replaced.chars() {
            if ch == '_' {
                run += 1;
                if run > 2 {
                    continue;
                }
            } else {
                run = 0;
            }
            collapsed.push(ch);
        }

        let trimmed = collapsed.trim_start_matches('_');
        if trimmed.is_empty() || trimmed == "." {
            "empty".to_string()
        } else {
            trimmed.to_string()
        }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.base_dir.join(Self::sanitize_key(key))
    }
}

/// Writes and immediately removes a probe file in `dir`.
fn probe_write_access(dir: &Path) -> io::Result<()> {
    let probe = dir.join(PROBE_FILE);
    fs::write(&probe, b"probe")?;
    fs::remove_file(&probe)
}

impl Storage for FileStorage {
    fn get(&self, ctx: &Context, key: &str) -> Result<BlobReader> {
        ctx.check()?;

        let _guard = self.live.read();
        let path = self.path_for(key);

        match File::open(&path) {
            Ok(file) => Ok(Box::new(file)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(key.to_string()))
            }
            Err(e) => Err(StorageError::io("failed to open file", e)),
        }
    }

    fn set(&self, ctx: &Context, key: &str, data: &[u8]) -> Result<()> {
        ctx.check()?;

        let mut live = self.live.write();
        let path = self.path_for(key);
        let existed = path.exists();

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .map_err(|e| StorageError::io("failed to create directories", e))?;
        }
        fs::write(&path, data).map_err(|e| StorageError::io("failed to write file", e))?;

        if !existed {
            *live += 1;
        }
        Ok(())
    }

    fn delete(&self, ctx: &Context, key: &str) -> Result<()> {
        ctx.check()?;

        let mut live = self.live.write();
        let path = self.path_for(key);

        match fs::remove_file(&path) {
            Ok(()) => {
                *live = live.saturating_sub(1);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::io("failed to delete file", e)),
        }
    }

    fn size(&self) -> usize {
        *self.live.read()
    }
}
