//! Raw-response cache.

use std::fs;
use std::path::Path;

use crate::domain::error::Result;

/// Persist the last raw deploy JSON response as a whole-file overwrite.
///
/// Parent directories are created on demand. Callers skip empty output; a
/// parse-failure response is still persisted when non-empty.
pub fn persist_raw_response(path: &Path, raw: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, raw)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persist_creates_parent_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".orgflow/last_response.json");

        persist_raw_response(&path, r#"{"status":0}"#).expect("persist");
        assert_eq!(
            fs::read_to_string(&path).expect("read"),
            r#"{"status":0}"#
        );
    }

    #[test]
    fn test_persist_overwrites_previous_response() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("last_response.json");

        persist_raw_response(&path, "first").expect("persist");
        persist_raw_response(&path, "second").expect("persist");
        assert_eq!(fs::read_to_string(&path).expect("read"), "second");
    }
}
