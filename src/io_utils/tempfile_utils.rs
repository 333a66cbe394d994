//! Writing output files under a temporary name and renaming them into
//! place when complete, so that readers never see partial files.

use std::{
    path::{Path, PathBuf},
    process,
};

use crate::{debug, info};

#[derive(Debug, thiserror::Error)]
pub enum TempfileError {
    #[error("path is missing file name part: {0:?}")]
    MissingFileName(PathBuf),
    #[error("IO error while {0} {1:?}: {2:#}")]
    IOError(&'static str, PathBuf, std::io::Error),
}

/// `dir/name.ext` becomes `dir/name.tmp~{pid}.ext`; the extension is
/// kept since some writers (e.g. image encoders) choose the format
/// from it.
pub fn temp_path(target_path: impl AsRef<Path>) -> Result<PathBuf, TempfileError> {
    let target_path = target_path.as_ref();
    let stem = target_path
        .file_stem()
        .ok_or_else(|| TempfileError::MissingFileName(target_path.to_owned()))?;
    let mut file_name = stem.to_owned();
    file_name.push(format!(".tmp~{}", process::id()));
    if let Some(extension) = target_path.extension() {
        file_name.push(".");
        file_name.push(extension);
    }
    Ok(target_path.with_file_name(file_name))
}

/// A temporary path for `target_path`; call `finish` after writing to
/// `temp_path` to move the file into place. Dropping it without
/// calling `finish` deletes the temporary file if it exists.
#[derive(Debug)]
pub struct Tempfile {
    pub target_path: PathBuf,
    pub temp_path: PathBuf,
    finished: bool,
}

impl Tempfile {
    pub fn new(target_path: impl Into<PathBuf>) -> Result<Self, TempfileError> {
        let target_path = target_path.into();
        let temp_path = temp_path(&target_path)?;
        Ok(Tempfile {
            target_path,
            temp_path,
            finished: false,
        })
    }

    pub fn finish(mut self) -> Result<(), TempfileError> {
        // tell Drop that it should do nothing
        self.finished = true;
        std::fs::rename(&self.temp_path, &self.target_path)
            .map_err(|e| TempfileError::IOError("renaming to target", self.temp_path.clone(), e))?;
        info!("wrote {:?}", self.target_path);
        Ok(())
    }
}

impl Drop for Tempfile {
    fn drop(&mut self) {
        if !self.finished {
            match std::fs::remove_file(&self.temp_path) {
                Ok(()) => debug!("deleted temporary file {:?}", self.temp_path),
                Err(e) => match e.kind() {
                    std::io::ErrorKind::NotFound => (),
                    _ => info!("error deleting temporary file {:?}: {e:#}", self.temp_path),
                },
            }
        }
    }
}

/// Write `contents` to `target_path` via a temporary file.
pub fn write_file_atomically(
    target_path: impl Into<PathBuf>,
    contents: impl AsRef<[u8]>,
) -> Result<(), TempfileError> {
    let tempfile = Tempfile::new(target_path)?;
    std::fs::write(&tempfile.temp_path, contents)
        .map_err(|e| TempfileError::IOError("writing", tempfile.temp_path.clone(), e))?;
    tempfile.finish()
}
