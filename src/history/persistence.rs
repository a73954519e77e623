//! Disk persistence for the history buffer.
//!
//! The backing file is plain text, one entry per line. Writes never touch the
//! backing file directly: entries go to `<path>.tmp` in the same directory,
//! which is synced and then renamed over the original.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context as _;

/// Directory holding the history file, config and logs: `~/.rusty-history`.
pub fn data_dir() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().context("Failed to determine the user's home directory")?;
    Ok(home.join(".rusty-history"))
}

pub fn default_history_path() -> anyhow::Result<PathBuf> {
    Ok(data_dir()?.join("history"))
}

/// Temp file used by [`write_atomic`]: the backing file name with `.tmp` appended.
pub fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create history directory: {}", parent.display()))?;
    }
    Ok(())
}

fn open_private(path: &Path, truncate: bool) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(truncate);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    options.open(path)
}

/// Read the backing file, creating it empty when it does not exist yet.
///
/// Each line is trimmed and blank lines are dropped. Every record ends with a
/// newline, so trailing bytes after the last newline are ignored. Bytes that
/// are not valid UTF-8 are replaced rather than rejected.
pub fn load_lines(path: &Path) -> anyhow::Result<Vec<String>> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            ensure_parent_dir(path)?;
            open_private(path, false)
                .with_context(|| format!("Failed to create history file: {}", path.display()))?;
            tracing::debug!("Created empty history file at {}", path.display());
            return Ok(Vec::new());
        }
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to open history file: {}", path.display()));
        }
    };

    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();
    let mut lines = Vec::new();
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .with_context(|| format!("Failed to read history file: {}", path.display()))?;
        // A final chunk without a newline is an unfinished record.
        if read == 0 || buf.last() != Some(&b'\n') {
            break;
        }
        let line = String::from_utf8_lossy(&buf);
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push(trimmed.to_string());
        }
    }
    Ok(lines)
}

fn write_lines(tmp: &Path, entries: &[String]) -> anyhow::Result<()> {
    let file = open_private(tmp, true)
        .with_context(|| format!("Failed to create temp file: {}", tmp.display()))?;
    let mut writer = BufWriter::new(file);
    for entry in entries {
        writer
            .write_all(entry.as_bytes())
            .and_then(|()| writer.write_all(b"\n"))
            .with_context(|| format!("Failed to write temp file: {}", tmp.display()))?;
    }
    let file = writer
        .into_inner()
        .map_err(|e| e.into_error())
        .with_context(|| format!("Failed to flush temp file: {}", tmp.display()))?;
    file.sync_all()
        .with_context(|| format!("Failed to sync temp file: {}", tmp.display()))?;
    Ok(())
}

fn discard_tmp(tmp: &Path) {
    if let Err(e) = fs::remove_file(tmp) {
        tracing::debug!("Could not remove temp file {}: {}", tmp.display(), e);
    }
}

/// Replace `path` with `entries`, one per line.
///
/// On any error the file at `path` is left as it was.
pub fn write_atomic(path: &Path, entries: &[String]) -> anyhow::Result<()> {
    ensure_parent_dir(path)?;
    let tmp = tmp_path(path);
    if let Err(e) = write_lines(&tmp, entries) {
        discard_tmp(&tmp);
        return Err(e);
    }
    if let Err(e) = fs::rename(&tmp, path) {
        discard_tmp(&tmp);
        return Err(e).with_context(|| {
            format!(
                "Failed to replace {} with {}",
                path.display(),
                tmp.display()
            )
        });
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_tmp_path_appends_suffix() {
        assert_eq!(
            tmp_path(Path::new("/home/user/.rusty-history/history")),
            PathBuf::from("/home/user/.rusty-history/history.tmp")
        );
        assert_eq!(
            tmp_path(Path::new("hist.txt")),
            PathBuf::from("hist.txt.tmp")
        );
    }

    #[test]
    fn test_load_missing_file_creates_it() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("history");

        let lines = load_lines(&path).unwrap();

        assert!(lines.is_empty());
        assert!(path.is_file());
        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn test_load_trims_and_skips_blank_lines() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");
        fs::write(&path, "a\n\n b \n   \n").unwrap();

        assert_eq!(load_lines(&path).unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_load_drops_unterminated_last_line() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");
        fs::write(&path, "first\nsecond").unwrap();

        assert_eq!(load_lines(&path).unwrap(), vec!["first"]);
    }

    #[test]
    fn test_load_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");
        fs::write(&path, b"ok\nbad\xff\n").unwrap();

        let lines = load_lines(&path).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "ok");
        assert!(lines[1].starts_with("bad"));
    }

    #[test]
    fn test_load_directory_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert!(load_lines(dir.path()).is_err());
    }

    #[test]
    fn test_write_atomic_replaces_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");
        fs::write(&path, "old\n").unwrap();

        write_atomic(&path, &["x".to_string(), "y".to_string()]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "x\ny\n");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_write_atomic_failure_leaves_original() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");
        fs::write(&path, "keep\n").unwrap();
        // A directory squatting on the temp name makes the write fail before rename.
        fs::create_dir(tmp_path(&path)).unwrap();

        assert!(write_atomic(&path, &["new".to_string()]).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep\n");
    }

    #[test]
    fn test_write_atomic_rename_failure_removes_tmp() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("history");
        // A non-empty directory at the backing path cannot be renamed over.
        fs::create_dir(&path).unwrap();
        fs::write(path.join("inner"), "keep\n").unwrap();

        let err = write_atomic(&path, &["new".to_string()]).unwrap_err();

        assert!(err.to_string().contains("Failed to replace"));
        assert!(!tmp_path(&path).exists());
        assert!(path.is_dir());
        assert_eq!(fs::read_to_string(path.join("inner")).unwrap(), "keep\n");
    }
}
