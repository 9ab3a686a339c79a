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

use fxhash::FxHashMap;
use kiln_core::{canonical_name, LoadError, ResourceLoader};

/// Serves resources from buffers held in memory.
///
/// Entries are stored under their canonical form, so lookups match whatever
/// equivalent spelling the factory canonicalized the request to.
#[derive(Debug, Default, Clone)]
pub struct MemoryLoader {
    entries: FxHashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    /// Creates an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, name: &str, bytes: impl Into<Vec<u8>>) {
        self.entries.insert(canonical_name("", name), bytes.into());
    }

    /// Builder-style variant of [`insert`](Self::insert).
    pub fn with(mut self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        self.insert(name, bytes);
        self
    }

    /// Removes an entry, returning its bytes.
    pub fn remove(&mut self, name: &str) -> Option<Vec<u8>> {
        self.entries.remove(&canonical_name("", name))
    }

    /// The number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the loader holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceLoader for MemoryLoader {
    fn read(&mut self, canonical_name: &str) -> Result<Vec<u8>, LoadError> {
        self.entries
            .get(canonical_name)
            .cloned()
            .ok_or_else(|| LoadError::NotFound {
                name: canonical_name.to_string(),
            })
    }
}
