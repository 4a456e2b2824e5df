use std::{
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use dumpconv_core::{Result, StoreError};
use rusqlite::{Connection, ErrorCode, OpenFlags};
use tracing::debug;

const LOCK_PROBE_SQL: &str = "BEGIN EXCLUSIVE; ROLLBACK;";
const SIDECAR_SUFFIXES: &[&str] = &["-journal", "-wal", "-shm"];

/// Deletes the store at `destination` and its journal files.
///
/// Fails with [`StoreError::Locked`] without deleting anything when another
/// connection holds a lock on the existing store.
pub(crate) fn remove_existing(destination: &Path) -> Result<()> {
    if destination.exists() {
        ensure_unlocked(destination)?;
        remove_file(destination)?;
        debug!(path = %destination.display(), "removed previous destination");
    }

    for suffix in SIDECAR_SUFFIXES {
        let sidecar = sidecar_path(destination, suffix);
        if sidecar.exists() {
            remove_file(&sidecar)?;
        }
    }

    Ok(())
}

fn ensure_unlocked(destination: &Path) -> Result<()> {
    let probe = match Connection::open_with_flags(
        destination,
        OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    ) {
        Ok(probe) => probe,
        Err(error) => {
            debug!(path = %destination.display(), %error, "lock probe could not open destination");
            return Ok(());
        }
    };

    let outcome = probe
        .busy_timeout(Duration::ZERO)
        .and_then(|()| probe.execute_batch(LOCK_PROBE_SQL));
    match outcome {
        Ok(()) => Ok(()),
        Err(error)
            if matches!(
                error.sqlite_error_code(),
                Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
            ) =>
        {
            Err(locked(destination))
        }
        Err(error) => {
            // Not a database or unreadable; it is removed anyway.
            debug!(path = %destination.display(), %error, "lock probe failed");
            Ok(())
        }
    }
}

fn remove_file(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(error) if error.kind() == io::ErrorKind::PermissionDenied => Err(locked(path)),
        Err(source) => Err(StoreError::Remove {
            path: path.to_path_buf(),
            source,
        }
        .into()),
    }
}

fn locked(path: &Path) -> dumpconv_core::Error {
    StoreError::Locked {
        path: path.to_path_buf(),
    }
    .into()
}

fn sidecar_path(destination: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
