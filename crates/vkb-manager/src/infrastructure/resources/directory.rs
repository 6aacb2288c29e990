//! A [`ResourceProvider`] reading layout files from a directory.
//!
//! Every `*.json` file except `locales.json` is a layout definition named by
//! its file stem.  `locales.json` is optional; without it the bundled locale
//! data is used.

use std::path::{Path, PathBuf};

use tracing::debug;
use vkb_core::{BundledResources, LayoutError, ResourceProvider};

const LOCALES_FILE: &str = "locales.json";

/// Layout resources stored as JSON files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryResources {
    dir: PathBuf,
}

impl DirectoryResources {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read(&self, path: &Path) -> Result<String, LayoutError> {
        std::fs::read_to_string(path)
            .map_err(|e| LayoutError::Resource(format!("{}: {e}", path.display())))
    }
}

impl ResourceProvider for DirectoryResources {
    fn layout_names(&self) -> Result<Vec<String>, LayoutError> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| LayoutError::Resource(format!("{}: {e}", self.dir.display())))?;

        let mut names = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|e| LayoutError::Resource(format!("{}: {e}", self.dir.display())))?
                .path();
            let is_layout = path.extension().is_some_and(|ext| ext == "json")
                && path.file_name().is_some_and(|name| name != LOCALES_FILE);
            if let (true, Some(stem)) = (is_layout, path.file_stem().and_then(|s| s.to_str())) {
                names.push(stem.to_string());
            }
        }
        names.sort();
        debug!(dir = %self.dir.display(), layouts = names.len(), "scanned layout directory");
        Ok(names)
    }

    fn read_layout(&self, name: &str) -> Result<String, LayoutError> {
        self.read(&self.dir.join(format!("{name}.json")))
    }

    fn read_locale_data(&self) -> Result<String, LayoutError> {
        let path = self.dir.join(LOCALES_FILE);
        if path.is_file() {
            self.read(&path)
        } else {
            debug!(dir = %self.dir.display(), "no locales.json, using bundled locale data");
            Ok(BundledResources::locale_data().to_string())
        }
    }
}
