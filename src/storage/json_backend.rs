use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use crate::core::utils::{ensure_dir, replace_file, PathResolver};

use super::{KeyValueStore, Result};

const FILE_EXTENSION: &str = "json";

/// Filesystem store writing `<root>/<key>.json` files.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Opens the store under `<base>/data`, where `base` defaults to the application home.
    pub fn new(base: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(base);
        Self::at(PathResolver::data_dir_in(&base))
    }

    /// Opens the store directly in `root`.
    pub fn at(root: PathBuf) -> Result<Self> {
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(key), FILE_EXTENSION))
    }
}

impl KeyValueStore for JsonStorage {
    fn load(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        let path = self.path_for(key);
        replace_file(&path, value)?;
        tracing::debug!(path = %path.display(), "saved collection");
        Ok(())
    }
}

fn canonical_name(key: &str) -> String {
    let sanitized: String = key
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "collection".into()
    } else {
        sanitized
    }
}
