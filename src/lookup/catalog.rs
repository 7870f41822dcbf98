// SPDX-License-Identifier: GPL-3.0-only

//! Dictionary groups known to the service, read from a JSON file provided by
//! the dictionary engine.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::lookup::{DictionaryGroup, DictionaryId};

/// File name of the catalog inside the configuration directory.
pub const CATALOG_FILE_NAME: &str = "groups.json";

/// Every dictionary plus the groups they are organised in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryCatalog {
    /// Named groups, in selector order.
    #[serde(default)]
    pub groups: Vec<DictionaryGroup>,
    /// All dictionaries, searched when no group is selected.
    #[serde(default)]
    pub all_dictionaries: Vec<DictionaryId>,
}

impl DictionaryCatalog {
    /// Reads the catalog at `path`. A missing file yields an empty catalog.
    pub fn load(path: &Path) -> io::Result<Self> {
        match fs::read(path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::info!("No dictionary catalog at {}", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }

    /// `cosdict/groups.json` in the user config directory.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(env!("CARGO_PKG_NAME")).join(CATALOG_FILE_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lookup::GroupId;

    #[test]
    fn test_missing_catalog_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = DictionaryCatalog::load(&dir.path().join("groups.json")).unwrap();
        assert_eq!(catalog, DictionaryCatalog::default());
    }

    #[test]
    fn test_load_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        fs::write(
            &path,
            r#"{
                "groups": [{"id": 4, "name": "English", "dictionaries": ["wordnet"]}],
                "all_dictionaries": ["wordnet", "jargon"]
            }"#,
        )
        .unwrap();

        let catalog = DictionaryCatalog::load(&path).unwrap();
        assert_eq!(catalog.groups.len(), 1);
        assert_eq!(catalog.groups[0].id, GroupId(4));
        assert_eq!(catalog.all_dictionaries.len(), 2);
    }

    #[test]
    fn test_truncated_catalog_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("groups.json");
        fs::write(&path, r#"{"groups": ["#).unwrap();

        let err = DictionaryCatalog::load(&path).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_default_path_is_in_config_dir() {
        let expected = dirs::config_dir().map(|dir| dir.join("cosdict").join("groups.json"));
        assert_eq!(DictionaryCatalog::default_path(), expected);
    }
}
