//! Native file system implementation

use crate::error::{VfsError, VfsResult};
use crate::VirtualFileSystem;
use std::path::Path;
use std::time::SystemTime;

/// A native OS file system implementation.
///
/// This wraps `std::fs` operations and provides the `VirtualFileSystem`
/// interface for local file access.
///
/// # Example
/// ```
/// use lumo_vfs::{NativeFileSystem, VirtualFileSystem};
/// use std::path::Path;
///
/// let fs = NativeFileSystem::new();
/// assert!(!fs.exists(Path::new("/nonexistent.lumo")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct NativeFileSystem;

impl NativeFileSystem {
    /// Create a new native file system.
    pub fn new() -> Self {
        Self
    }
}

fn map_io_error(err: std::io::Error, path: &Path) -> VfsError {
    match err.kind() {
        std::io::ErrorKind::NotFound => VfsError::NotFound {
            path: path.to_string_lossy().to_string(),
        },
        std::io::ErrorKind::PermissionDenied => VfsError::PermissionDenied {
            path: path.to_string_lossy().to_string(),
        },
        _ => err.into(),
    }
}

impl VirtualFileSystem for NativeFileSystem {
    fn read_file(&self, path: &Path) -> VfsResult<Vec<u8>> {
        std::fs::read(path).map_err(|e| map_io_error(e, path))
    }

    fn write_file(&self, path: &Path, content: &[u8]) -> VfsResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(e, path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn modified(&self, path: &Path) -> VfsResult<SystemTime> {
        let meta = std::fs::metadata(path).map_err(|e| map_io_error(e, path))?;
        meta.modified().map_err(|e| map_io_error(e, path))
    }

    fn remove_file(&self, path: &Path) -> VfsResult<()> {
        std::fs::remove_file(path).map_err(|e| map_io_error(e, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("lumo_vfs_{}_{}", name, std::process::id()))
    }

    #[test]
    fn test_native_exists() {
        let fs = NativeFileSystem::new();
        let temp_file = temp_file("exists");

        // Clean up if exists
        let _ = std::fs::remove_file(&temp_file);

        assert!(!fs.exists(&temp_file));

        {
            let mut file = std::fs::File::create(&temp_file).unwrap();
            file.write_all(b"test").unwrap();
        }

        assert!(fs.exists(&temp_file));

        std::fs::remove_file(&temp_file).unwrap();
    }

    #[test]
    fn test_native_read_write() {
        let fs = NativeFileSystem::new();
        let temp_file = temp_file("rw");

        let _ = std::fs::remove_file(&temp_file);

        fs.write_file(&temp_file, b"hello native").unwrap();
        let content = fs.read_file(&temp_file).unwrap();
        assert_eq!(content, b"hello native");

        std::fs::remove_file(&temp_file).unwrap();
    }

    #[test]
    fn test_native_read_nonexistent() {
        let fs = NativeFileSystem::new();
        let temp_file = temp_file("nonexistent");

        let _ = std::fs::remove_file(&temp_file);

        let result = fs.read_file(&temp_file);
        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
    }

    #[test]
    fn test_native_modified() {
        let fs = NativeFileSystem::new();
        let temp_file = temp_file("modified");

        let _ = std::fs::remove_file(&temp_file);

        fs.write_file(&temp_file, b"x = 1").unwrap();
        let mtime = fs.modified(&temp_file).unwrap();
        assert!(mtime <= SystemTime::now());

        std::fs::remove_file(&temp_file).unwrap();

        let result = fs.modified(&temp_file);
        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
    }

    #[test]
    fn test_native_remove_file() {
        let fs = NativeFileSystem::new();
        let temp_file = temp_file("remove");

        fs.write_file(&temp_file, b"gone soon").unwrap();
        fs.remove_file(&temp_file).unwrap();
        assert!(!fs.exists(&temp_file));

        let result = fs.remove_file(&temp_file);
        assert!(matches!(result.unwrap_err(), VfsError::NotFound { .. }));
    }
}
