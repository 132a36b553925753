// File metadata as returned by stat / read_dir

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    /// Base name of the file
    pub name: String,
    pub size: u64,
    /// Unix permission and file type bits
    pub mode: u32,
    pub is_dir: bool,
    pub is_symlink: bool,
    pub modified: Option<DateTime<Utc>>,
}

impl FileInfo {
    pub fn is_file(&self) -> bool {
        !self.is_dir && !self.is_symlink
    }
}
