//! In-memory file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, RwLock};
use std::time::SystemTime;

/// A single in-memory file: contents plus modification time.
#[derive(Debug, Clone)]
struct FileEntry {
    data: Vec<u8>,
    modified: SystemTime,
}

/// An in-memory file system implementation.
///
/// All files are stored in memory using a `BTreeMap`, making it suitable
/// for testing and scenarios where disk access is not desired. Cloning
/// shares the underlying store, so a clone handed to a loader observes
/// writes made through the original handle.
///
/// # Example
/// ```
/// use lumo_vfs::{MemoryFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new();
/// fs.write_file(Path::new("/test.lumo"), b"answer = 42").unwrap();
/// let content = fs.read_file(Path::new("/test.lumo")).unwrap();
/// assert_eq!(content, b"answer = 42");
/// ```
#[derive(Debug, Clone)]
pub struct MemoryFileSystem {
    files: Arc<RwLock<BTreeMap<String, FileEntry>>>,
}

impl MemoryFileSystem {
    /// Create a new empty memory file system.
    pub fn new() -> Self {
        Self {
            files: Arc::new(RwLock::new(BTreeMap::new())),
        }
    }

    /// Create a new memory file system pre-populated with files.
    ///
    /// # Arguments
    /// * `files` - Iterator of (path, content) tuples
    pub fn with_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<u8>)>,
        S: AsRef<str>,
    {
        let fs = Self::new();
        {
            let mut map = fs.files.write().unwrap();
            let now = SystemTime::now();
            for (path, content) in files {
                map.insert(
                    path.as_ref().to_string(),
                    FileEntry {
                        data: content,
                        modified: now,
                    },
                );
            }
        }
        fs
    }

    /// Set the modification time of an existing file.
    ///
    /// Lets tests control staleness decisions deterministically instead of
    /// racing the wall clock.
    ///
    /// # Returns
    /// `VfsError::NotFound` if the file does not exist
    pub fn touch(&self, path: &Path, modified: SystemTime) -> VfsResult<()> {
        let normalized = self.normalize_path(path);
        let mut files = self.files.write().map_err(|_| VfsError::Custom {
            message: String::from("Lock poisoned"),
        })?;
        match files.get_mut(&normalized) {
            Some(entry) => {
                entry.modified = modified;
                Ok(())
            }
            None => Err(VfsError::NotFound { path: normalized }),
        }
    }

    /// Normalize a path string for internal storage.
    /// Uses forward slashes consistently for cross-platform compatibility.
    fn normalize_path(&self, path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }
}

impl Default for MemoryFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFileSystem for MemoryFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        let normalized = self.normalize_path(path);
        let files = self.files.read().map_err(|_| VfsError::Custom {
            message: String::from("Lock poisoned"),
        })?;

        files
            .get(&normalized)
            .map(|entry| entry.data.clone())
            .ok_or_else(|| VfsError::NotFound {
                path: normalized.clone(),
            })
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        let normalized = self.normalize_path(path);
        let mut files = self.files.write().map_err(|_| VfsError::Custom {
            message: String::from("Lock poisoned"),
        })?;
        files.insert(
            normalized,
            FileEntry {
                data: content.to_vec(),
                modified: SystemTime::now(),
            },
        );
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let normalized = self.normalize_path(path);
        let files = match self.files.read() {
            Ok(guard) => guard,
            Err(_) => return false,
        };
        files.contains_key(&normalized)
    }

    fn is_file(&self, path: &Path) -> bool {
        // In memory FS, if it exists, it's a file
        self.exists(path)
    }

    fn modified(&self, path: &Path) -> VfsResult<SystemTime> {
        let normalized = self.normalize_path(path);
        let files = self.files.read().map_err(|_| VfsError::Custom {
            message: String::from("Lock poisoned"),
        })?;
        files
            .get(&normalized)
            .map(|entry| entry.modified)
            .ok_or_else(|| VfsError::NotFound { path: normalized })
    }

    fn remove_file(&self, path: &Path) -> VfsResult<()> {
        let normalized = self.normalize_path(path);
        let mut files = self.files.write().map_err(|_| VfsError::Custom {
            message: String::from("Lock poisoned"),
        })?;
        match files.remove(&normalized) {
            Some(_) => Ok(()),
            None => Err(VfsError::NotFound { path: normalized }),
        }
    }
}
