//! Lumo Virtual File System
//!
//! A virtual file system abstraction with multiple backend implementations.
//! The surface covers exactly what the module loader needs: read source,
//! write and delete compiled artifacts, and observe modification times.
//!
//! # Usage
//! ```rust,ignore
//! use lumo_vfs::{VirtualFileSystem, MemoryFileSystem};
//! use std::path::Path;
//!
//! let fs = MemoryFileSystem::new();
//! fs.write_file(Path::new("/test.lumo"), b"answer = 42").unwrap();
//! let content = fs.read_file(Path::new("/test.lumo")).unwrap();
//! ```

mod error;
mod memory;
mod native;
mod r#trait;

pub use error::{VfsError, VfsResult};
pub use memory::MemoryFileSystem;
pub use native::NativeFileSystem;
pub use r#trait::VirtualFileSystem;

/// Create a new memory-based file system.
pub fn memory_fs() -> MemoryFileSystem {
    MemoryFileSystem::new()
}

/// Create a new native file system.
pub fn native_fs() -> NativeFileSystem {
    NativeFileSystem::new()
}
