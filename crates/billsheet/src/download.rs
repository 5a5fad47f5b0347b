//! Delivery of exported files
//!
//! A [`Download`] receives the encoded workbook and a file name and puts it
//! somewhere the user can get at it.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// File name every checkout is delivered under
pub const FILE_NAME: &str = "billing.xlsx";

/// Receiver of an exported file
pub trait Download {
    /// Deliver `bytes` under `file_name`
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()>;
}

/// Saves deliveries into a directory, replacing existing files
#[derive(Debug, Clone)]
pub struct DirectoryDownload {
    dir: PathBuf,
}

impl DirectoryDownload {
    /// Deliver into `dir` (created on first delivery if missing)
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Target directory
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path a file name would be saved to
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl Download for DirectoryDownload {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(file_name);
        fs::write(&path, bytes)?;
        log::info!("saved {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Keeps deliveries in memory, keyed by file name
#[derive(Debug, Clone, Default)]
pub struct MemoryDownload {
    files: BTreeMap<String, Vec<u8>>,
    deliveries: usize,
}

impl MemoryDownload {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Last bytes delivered under `file_name`
    pub fn file(&self, file_name: &str) -> Option<&[u8]> {
        self.files.get(file_name).map(Vec::as_slice)
    }

    /// Number of deliveries received, including overwrites
    pub fn deliveries(&self) -> usize {
        self.deliveries
    }
}

impl Download for MemoryDownload {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        self.files.insert(file_name.to_string(), bytes.to_vec());
        self.deliveries += 1;
        Ok(())
    }
}

impl<D: Download + ?Sized> Download for &mut D {
    fn deliver(&mut self, file_name: &str, bytes: &[u8]) -> io::Result<()> {
        (**self).deliver(file_name, bytes)
    }
}
