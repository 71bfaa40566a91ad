use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;

/// Highest `name (n).ext` suffix tried before giving up.
const MAX_DUPLICATE_SUFFIX: u32 = 999;

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("download directory {path:?} is unusable: {reason}")]
    DownloadDir { path: PathBuf, reason: String },
    #[error("no free name left for {0:?}")]
    NoFreeName(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Make sure `dir` exists and is a directory, creating it when missing.
pub fn ensure_output_dir(dir: &Path) -> Result<(), PersistError> {
    let unusable = |reason: String| PersistError::DownloadDir {
        path: dir.to_path_buf(),
        reason,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(unusable("not a directory".to_string())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            fs::create_dir_all(dir).map_err(|e| unusable(e.to_string()))
        }
        Err(err) => Err(unusable(err.to_string())),
    }
}

/// Saves downloads into one directory the way a browser does: the bytes go
/// to a temp file first, which only appears under its final name once
/// complete. Existing files are never replaced; a clash gets `name (1).ext`.
#[derive(Debug, Clone)]
pub struct AtomicFileWriter {
    dir: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Returns the path the download was saved under.
    pub fn write(&self, filename: &str, content: &[u8]) -> Result<PathBuf, PersistError> {
        ensure_output_dir(&self.dir)?;

        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(content)?;
        tmp.as_file_mut().sync_all()?;

        for candidate in candidate_names(filename) {
            let target = self.dir.join(&candidate);
            match tmp.persist_noclobber(&target) {
                Ok(_) => return Ok(target),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => tmp = err.file,
                Err(err) => return Err(err.error.into()),
            }
        }
        Err(PersistError::NoFreeName(filename.to_string()))
    }
}

fn candidate_names(filename: &str) -> impl Iterator<Item = String> + '_ {
    let (stem, ext) = match filename.rfind('.') {
        Some(dot) if dot > 0 => filename.split_at(dot),
        _ => (filename, ""),
    };
    std::iter::once(filename.to_string())
        .chain((1..=MAX_DUPLICATE_SUFFIX).map(move |n| format!("{stem} ({n}){ext}")))
}
