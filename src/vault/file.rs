//! Whole-file reads and atomic rewrites of sealed blobs.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::errors::Result;

/// Write `contents` to `path` **atomically**.
///
/// The data goes to a temp file in the same directory which is then
/// renamed over the target, so readers never see a half-written file.
/// On Unix the temp file is created owner-only (0o600).
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    stage(path, contents)?.commit()
}

/// A fully written temp file waiting to be renamed over its target.
///
/// Dropping it without calling [`StagedFile::commit`] removes the temp
/// file and leaves the target untouched.
#[derive(Debug)]
pub struct StagedFile {
    tmp_path: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedFile {
    /// Rename the temp file over the target.
    pub fn commit(mut self) -> Result<()> {
        fs::rename(&self.tmp_path, &self.target)?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for StagedFile {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

/// Write `contents` next to `path` without replacing it yet.
pub fn stage(path: &Path, contents: &[u8]) -> Result<StagedFile> {
    let tmp_path = temp_path(path);
    if let Err(e) = write_private(&tmp_path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }
    Ok(StagedFile {
        tmp_path,
        target: path.to_path_buf(),
        committed: false,
    })
}

/// Create `path` fresh, owner-only from the first byte, and fill it.
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    // A stale temp file would keep its old permissions.
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

/// Read a whole text blob.
pub fn read_text(path: &Path) -> Result<String> {
    Ok(fs::read_to_string(path)?)
}

/// Set owner-only permissions.  Best effort; failures are ignored.
pub fn restrict_permissions(path: &Path) {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(0o600));
    }
    #[cfg(not(unix))]
    let _ = path;
}

/// Create `dir` (and parents) owner-only if it does not exist.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(dir, fs::Permissions::from_mode(0o700));
        }
    }
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}
