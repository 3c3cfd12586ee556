use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::{debug, info};

use crate::error::{FixtureError, Result};

/// Writes `contents` to `path`, replacing any existing file.
///
/// The file is created, written, synced and closed before this returns; each
/// step reports its own error variant. A partially written file is left in
/// place on failure.
pub fn write_file(path: &Path, contents: &[u8]) -> Result<()> {
    let display = path.display().to_string();

    let mut file = File::create(path).map_err(|e| FixtureError::FileCreateError {
        path: display.clone(),
        message: e.to_string(),
    })?;

    file.write_all(contents)
        .map_err(|e| FixtureError::FileWriteError {
            path: display.clone(),
            message: e.to_string(),
        })?;

    // Dropping a File swallows close errors; sync_all is where they surface.
    file.sync_all().map_err(|e| FixtureError::FileCloseError {
        path: display.clone(),
        message: e.to_string(),
    })?;
    drop(file);

    debug!("{} bytes written to {display}", contents.len());
    info!("wrote {display}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ca01.crt");

        write_file(&path, b"first run, longer contents").unwrap();
        write_file(&path, b"second").unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"second");
    }

    #[test]
    fn test_missing_directory_is_a_create_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("svr01.key");

        match write_file(&path, b"key") {
            Err(FixtureError::FileCreateError { path: reported, .. }) => {
                assert!(reported.ends_with("svr01.key"));
            }
            other => panic!("expected create error, got {other:?}"),
        }
    }
}
