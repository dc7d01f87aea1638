//! Atomic file writes

use std::path::Path;

/// Write data atomically using temp file + rename
pub fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    std::fs::write(&temp_name, data)?;
    std::fs::rename(&temp_name, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_atomic_write() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("nested").join("out_all.model");

        atomic_write(&target, b"-1.5 cat 3\n").unwrap();

        assert_eq!(std::fs::read(&target).unwrap(), b"-1.5 cat 3\n");
        assert!(!dir.path().join("nested").join("out_all.model.tmp").exists());
    }

    #[test]
    fn test_atomic_write_replaces_existing() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("m.model");
        atomic_write(&target, b"old").unwrap();
        atomic_write(&target, b"new").unwrap();
        assert_eq!(std::fs::read_to_string(&target).unwrap(), "new");
    }
}
