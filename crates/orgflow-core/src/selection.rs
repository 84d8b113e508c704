//! Selection-list resolution for selected-set deploys.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::domain::error::{Result, ValidationError};

/// Index of deployable files: short file name to full path.
///
/// The editor integration supplies one built from the project tree; the
/// selection list carries bare file names.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    entries: BTreeMap<String, PathBuf>,
}

impl FileIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one file under its final path component. Paths without a
    /// UTF-8 file name are ignored.
    pub fn insert(&mut self, path: PathBuf) {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string);
        if let Some(name) = name {
            self.entries.insert(name, path);
        }
    }

    /// Full path registered for `file_name`, if any.
    pub fn get(&self, file_name: &str) -> Option<&Path> {
        self.entries.get(file_name).map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve a selection of file names through the index.
///
/// Names missing from the index are dropped. Zero resolvable files is a
/// validation failure, not a process failure: nothing may spawn for an empty
/// selection.
pub fn resolve_selection(selection: &[String], index: &FileIndex) -> Result<Vec<PathBuf>> {
    let resolved: Vec<PathBuf> = selection
        .iter()
        .filter_map(|name| index.get(name).map(Path::to_path_buf))
        .collect();

    if resolved.is_empty() {
        return Err(ValidationError::EmptySelection.into());
    }
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::OrgflowError;

    fn index_with(paths: &[&str]) -> FileIndex {
        let mut index = FileIndex::new();
        for path in paths {
            index.insert(PathBuf::from(path));
        }
        index
    }

    #[test]
    fn test_index_keys_by_file_name() {
        let index = index_with(&["src/classes/Acct.cls", "src/triggers/AcctTrigger.trigger"]);
        assert_eq!(index.len(), 2);
        assert_eq!(
            index.get("Acct.cls"),
            Some(Path::new("src/classes/Acct.cls"))
        );
        assert!(index.get("Missing.cls").is_none());
    }

    #[test]
    fn test_resolve_drops_unknown_names() {
        let index = index_with(&["src/classes/Acct.cls"]);
        let resolved = resolve_selection(
            &["Acct.cls".to_string(), "Missing.cls".to_string()],
            &index,
        )
        .expect("resolve");
        assert_eq!(resolved, vec![PathBuf::from("src/classes/Acct.cls")]);
    }

    #[test]
    fn test_empty_resolution_is_validation_error() {
        let index = index_with(&["src/classes/Acct.cls"]);
        let err = resolve_selection(&["Missing.cls".to_string()], &index).unwrap_err();
        assert!(matches!(
            err,
            OrgflowError::Validation(ValidationError::EmptySelection)
        ));

        let err = resolve_selection(&[], &index).unwrap_err();
        assert!(matches!(
            err,
            OrgflowError::Validation(ValidationError::EmptySelection)
        ));
    }
}
