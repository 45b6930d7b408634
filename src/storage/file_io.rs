//! Reading and replacing table files
//!
//! A table file is replaced by writing a sibling `.tmp` file and renaming it
//! over the original, so readers see the old rows or the new ones.

use std::fmt::Display;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use crate::error::{HospitalError, HospitalResult};

fn storage_error(action: &str, path: &Path, err: impl Display) -> HospitalError {
    HospitalError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

fn staging_path(path: &Path) -> PathBuf {
    path.with_extension("json.tmp")
}

/// Deserialize a JSON file that must exist
pub fn read_json_required<T, P>(path: P) -> HospitalResult<T>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => {
            HospitalError::Storage(format!("File not found: {}", path.display()))
        }
        _ => storage_error("read", path, e),
    })?;
    serde_json::from_slice(&bytes).map_err(|e| storage_error("parse", path, e))
}

/// Replace a file with the pretty-printed JSON form of `data`
pub fn write_json_atomic<T, P>(path: P, data: &T) -> HospitalResult<()>
where
    T: Serialize + ?Sized,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| storage_error("create directory", dir, e))?;
    }

    let staging = staging_path(path);
    let file = File::create(&staging).map_err(|e| storage_error("create", &staging, e))?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, data)
        .map_err(|e| storage_error("serialize rows for", path, e))?;
    out.flush().map_err(|e| storage_error("write", &staging, e))?;
    out.get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", &staging, e))?;

    if let Err(e) = fs::rename(&staging, path) {
        fs::remove_file(&staging).ok();
        return Err(storage_error("replace", path, e));
    }
    Ok(())
}

/// Whether a file exists and holds well-formed JSON
pub fn json_file_valid<P: AsRef<Path>>(path: P) -> bool {
    fs::read(path)
        .ok()
        .is_some_and(|bytes| serde_json::from_slice::<serde_json::Value>(&bytes).is_ok())
}
