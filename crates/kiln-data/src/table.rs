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

//! A fixed-capacity cache of resident resources.

use fxhash::FxHashMap;
use kiln_core::resource::Instance;
use kiln_core::{DescriptorSnapshot, NameHash, ResourceDescriptor, ResourceId, ResourceKind};
use thiserror::Error;

/// An error returned by [`ResourceTable::insert`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// The table already holds `capacity` entries.
    #[error("Resource table is full (capacity {capacity})")]
    Full {
        /// The table's fixed capacity.
        capacity: usize,
    },
    /// An entry with the same name hash is already resident.
    #[error("Resource {0} is already resident")]
    Occupied(NameHash),
}

/// Everything the table knows about one resident resource.
pub struct ResidentEntry {
    /// The hash of the canonical name; the table key.
    pub name_hash: NameHash,
    /// The canonical name, kept for diagnostics.
    pub canonical_name: String,
    /// The extension of the type handler that owns the instance.
    pub type_extension: String,
    /// How the instance was produced.
    pub kind: ResourceKind,
    /// The size of the raw buffer the instance was created from.
    pub buffer_size: usize,
    /// The number of outstanding references. Always at least 1 while resident.
    pub reference_count: u32,
    /// The shared resource instance.
    pub instance: Instance,
}

impl ResidentEntry {
    /// A read-only copy of the descriptor fields.
    pub fn snapshot(&self) -> DescriptorSnapshot {
        DescriptorSnapshot {
            name_hash: self.name_hash,
            resource: ResourceId::of(&self.instance),
            kind: self.kind,
            buffer_size: self.buffer_size,
            reference_count: self.reference_count,
        }
    }

    /// Turns the entry back into the descriptor handed to a destroy handler.
    pub fn into_descriptor(self) -> ResourceDescriptor {
        ResourceDescriptor::from_parts(
            self.name_hash,
            self.kind,
            self.buffer_size,
            self.reference_count,
            self.instance,
        )
    }
}

/// The resident-resource cache of a factory.
///
/// Maps a [`NameHash`] to exactly one [`ResidentEntry`]. The table never
/// evicts: once `capacity` entries are resident, further inserts are rejected
/// until an entry is removed.
///
/// The table stores counts but never changes them on its own; incrementing,
/// decrementing and removing at zero are the caller's responsibility.
pub struct ResourceTable {
    capacity: usize,
    entries: FxHashMap<NameHash, ResidentEntry>,
}

impl ResourceTable {
    /// Creates an empty table holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: FxHashMap::default(),
        }
    }

    /// The maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is resident.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if another insert would be rejected as full.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Returns `true` if an entry with this hash is resident.
    pub fn contains(&self, name_hash: NameHash) -> bool {
        self.entries.contains_key(&name_hash)
    }

    /// Looks up a resident entry.
    pub fn get(&self, name_hash: NameHash) -> Option<&ResidentEntry> {
        self.entries.get(&name_hash)
    }

    /// Looks up a resident entry for modification.
    pub fn get_mut(&mut self, name_hash: NameHash) -> Option<&mut ResidentEntry> {
        self.entries.get_mut(&name_hash)
    }

    /// Inserts a new entry.
    ///
    /// On failure the entry is handed back together with the reason, so the
    /// caller can still tear down the instance it owns.
    pub fn insert(&mut self, entry: ResidentEntry) -> Result<(), (TableError, ResidentEntry)> {
        debug_assert!(
            entry.reference_count > 0,
            "resident entries must hold at least one reference"
        );
        if self.entries.contains_key(&entry.name_hash) {
            return Err((TableError::Occupied(entry.name_hash), entry));
        }
        if self.is_full() {
            return Err((
                TableError::Full {
                    capacity: self.capacity,
                },
                entry,
            ));
        }
        log::trace!(
            "Resource table: inserted '{}' ({}/{})",
            entry.canonical_name,
            self.entries.len() + 1,
            self.capacity
        );
        self.entries.insert(entry.name_hash, entry);
        Ok(())
    }

    /// Removes and returns a resident entry.
    pub fn remove(&mut self, name_hash: NameHash) -> Option<ResidentEntry> {
        self.entries.remove(&name_hash)
    }

    /// Iterates over all resident entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &ResidentEntry> {
        self.entries.values()
    }
}
