// Filesystem adapter backed by std::fs
use chrono::{DateTime, Utc};
use std::fs::{self, Metadata};
use std::io;
use std::os::unix::fs::MetadataExt;
use std::path::{Component, Path, PathBuf};

use hostcap_core::domain::FileInfo;
use hostcap_core::error::{HostError, Result};
use hostcap_core::port::FileSystem;

#[derive(Debug, Clone, Copy, Default)]
pub struct OsFileSystem;

impl OsFileSystem {
    pub fn new() -> Self {
        Self
    }
}

fn to_file_info(name: String, meta: &Metadata) -> FileInfo {
    FileInfo {
        name,
        size: meta.len(),
        mode: meta.mode(),
        is_dir: meta.is_dir(),
        is_symlink: meta.file_type().is_symlink(),
        modified: meta.modified().ok().map(DateTime::<Utc>::from),
    }
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Lexically clean an absolute path: drop `.`, fold `..`
fn clean(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // `..` at the root stays at the root
                if out.parent().is_some() {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

impl FileSystem for OsFileSystem {
    fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).map_err(|e| HostError::from_io(path.display(), e))
    }

    fn stat(&self, path: &Path) -> Result<FileInfo> {
        let meta = fs::metadata(path).map_err(|e| HostError::from_io(path.display(), e))?;
        Ok(to_file_info(base_name(path), &meta))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<FileInfo>> {
        let entries = fs::read_dir(path).map_err(|e| HostError::from_io(path.display(), e))?;

        let mut infos = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| HostError::from_io(path.display(), e))?;
            match entry.metadata() {
                Ok(meta) => infos.push(to_file_info(
                    entry.file_name().to_string_lossy().into_owned(),
                    &meta,
                )),
                // Removed while listing
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(HostError::from_io(entry.path().display(), e)),
            }
        }
        infos.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(infos)
    }

    fn abs(&self, path: &Path) -> Result<PathBuf> {
        if path.is_absolute() {
            return Ok(clean(path));
        }
        let cwd = std::env::current_dir().map_err(|e| HostError::from_io("current dir", e))?;
        Ok(clean(&cwd.join(path)))
    }

    fn eval_symlinks(&self, path: &Path) -> Result<PathBuf> {
        fs::canonicalize(path).map_err(|e| HostError::from_io(path.display(), e))
    }
}
