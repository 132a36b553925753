// File System Port

use crate::domain::FileInfo;
use crate::error::Result;
use std::path::{Path, PathBuf};

pub trait FileSystem: Send + Sync {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>>;

    /// Metadata of `path`, following symlinks
    fn stat(&self, path: &Path) -> Result<FileInfo>;

    /// Directory entries, described without following symlinks
    fn read_dir(&self, path: &Path) -> Result<Vec<FileInfo>>;

    /// Absolute, lexically cleaned form of `path` (no filesystem access)
    fn abs(&self, path: &Path) -> Result<PathBuf>;

    /// `path` with every symlink resolved
    fn eval_symlinks(&self, path: &Path) -> Result<PathBuf>;
}
