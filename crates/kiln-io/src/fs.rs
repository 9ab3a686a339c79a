// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use kiln_core::{LoadError, ResourceLoader};
use std::path::{Path, PathBuf};

/// Reads resources straight from the local filesystem.
///
/// Canonical names already contain the factory's base path, so by default
/// they are opened as-is, relative to the working directory. A root can be
/// set to resolve them against another directory instead.
#[derive(Debug, Default, Clone)]
pub struct FileSystemLoader {
    root: Option<PathBuf>,
}

impl FileSystemLoader {
    /// Creates a loader opening canonical names relative to the working
    /// directory.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// Creates a loader opening canonical names relative to `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self {
            root: Some(root.as_ref().to_path_buf()),
        }
    }

    fn path_of(&self, canonical_name: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(canonical_name.trim_start_matches('/')),
            None => PathBuf::from(canonical_name),
        }
    }
}

impl ResourceLoader for FileSystemLoader {
    fn read(&mut self, canonical_name: &str) -> Result<Vec<u8>, LoadError> {
        let path = self.path_of(canonical_name);
        match std::fs::read(&path) {
            Ok(bytes) => {
                log::trace!("Read {} bytes from '{}'", bytes.len(), path.display());
                Ok(bytes)
            }
            Err(err) => Err(LoadError::from_io(canonical_name, err)),
        }
    }
}
