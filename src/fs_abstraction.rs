//! Filesystem abstraction layer for testability
//!
//! The flattener, the comparison engine and the config file lookup go through
//! the [`FileSystem`] trait so read failures can be exercised in tests
//! without crafting unreadable files on disk. Uses mockall for automatic
//! mock generation in test builds.

use std::io;
use std::path::Path;

#[cfg(test)]
use mockall::automock;

/// Trait abstracting the file reads performed during a check.
///
/// # Example (testing)
/// ```ignore
/// use envcheck::fs_abstraction::MockFileSystem;
///
/// let mut mock_fs = MockFileSystem::new();
/// mock_fs.expect_read_to_string()
///     .returning(|_| Ok("db:\n  host: 10.0.0.1\n".to_string()));
/// ```
#[cfg_attr(test, automock)]
pub trait FileSystem: Send + Sync {
    /// Read file contents as a string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Real filesystem implementation using std::fs.
#[derive(Default, Clone, Copy)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

static REAL_FS: RealFileSystem = RealFileSystem;

/// Get a reference to the global real filesystem instance.
///
/// For testing, create a `MockFileSystem` instead.
pub fn real_fs() -> &'static RealFileSystem {
    &REAL_FS
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::ErrorKind;
    use tempfile::TempDir;

    #[test]
    fn test_real_fs_read() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("app-uat.env");
        std::fs::write(&file_path, "KEY=value\n").unwrap();

        let content = real_fs().read_to_string(&file_path).unwrap();
        assert_eq!(content, "KEY=value\n");
    }

    #[test]
    fn test_real_fs_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("envcheck.yaml");

        assert!(!real_fs().exists(&file_path));
        std::fs::write(&file_path, "scan_dir: .\n").unwrap();
        assert!(real_fs().exists(&file_path));
    }

    #[test]
    fn test_real_fs_read_nonexistent() {
        let result = real_fs().read_to_string(Path::new("/nonexistent/path/app-prod.yaml"));
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_mock_fs_read_error() {
        let mut mock_fs = MockFileSystem::new();
        mock_fs
            .expect_read_to_string()
            .returning(|_| Err(io::Error::new(ErrorKind::PermissionDenied, "denied")));

        let err = mock_fs
            .read_to_string(Path::new("app-prod.yaml"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PermissionDenied);
    }
}
