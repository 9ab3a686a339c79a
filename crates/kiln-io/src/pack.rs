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

//! Pack files: every resource concatenated into one `data.pack`, located
//! through an `index.bin` of name, offset and size records.

use fxhash::FxHashMap;
use kiln_core::{canonical_name, LoadError, ResourceLoader};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Seek, SeekFrom, Write};
use thiserror::Error;

/// The location of one resource inside a pack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackEntry {
    /// The canonical name of the resource.
    pub name: String,
    /// Byte offset of the resource in `data.pack`.
    pub offset: u64,
    /// Byte length of the resource.
    pub size: u64,
}

/// An error raised while building or opening a pack.
#[derive(Debug, Error)]
pub enum PackError {
    /// The index bytes are not a valid bincode-encoded list of entries.
    #[error("Invalid pack index: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    /// The index could not be encoded.
    #[error("Failed to encode pack index: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    /// Writing the pack data failed.
    #[error("Failed to write pack data")]
    Io(#[from] std::io::Error),
    /// The same canonical name was added twice.
    #[error("Duplicate pack entry '{0}'")]
    Duplicate(String),
    /// The index has bytes left over after the entry list.
    #[error("Pack index has {trailing} trailing bytes")]
    TrailingBytes {
        /// The number of bytes not consumed by the entry list.
        trailing: usize,
    },
    /// An index entry points past the end of `data.pack`.
    #[error("Pack entry '{name}' ({offset}+{size}) exceeds the {pack_len} byte pack")]
    OutOfBounds {
        /// The canonical name of the entry.
        name: String,
        /// The recorded offset.
        offset: u64,
        /// The recorded size.
        size: u64,
        /// The actual length of `data.pack`.
        pack_len: u64,
    },
}

/// Reads resources out of an open `data.pack` file.
///
/// The index is decoded once up front into a map from canonical name to
/// location; each read then seeks to the entry and reads exactly its bytes.
pub struct PackLoader {
    index: FxHashMap<String, PackEntry>,
    pack_file: File,
}

impl PackLoader {
    /// Creates a loader from the raw bytes of `index.bin` and a handle to
    /// `data.pack`.
    ///
    /// Entry names are canonicalized, so indexes written by other tools
    /// match the names the factory asks for.
    ///
    /// # Errors
    /// - [`PackError::Decode`] or [`PackError::TrailingBytes`] if the index
    ///   is not exactly a bincode-encoded list of [`PackEntry`].
    /// - [`PackError::OutOfBounds`] if an entry does not fit in `pack_file`.
    /// - [`PackError::Duplicate`] if two entries share a canonical name.
    pub fn new(index_bytes: &[u8], pack_file: File) -> Result<Self, PackError> {
        let config = bincode::config::standard();
        let (entries, consumed): (Vec<PackEntry>, usize) =
            bincode::serde::decode_from_slice(index_bytes, config)?;
        if consumed != index_bytes.len() {
            return Err(PackError::TrailingBytes {
                trailing: index_bytes.len() - consumed,
            });
        }

        let pack_len = pack_file.metadata()?.len();
        let mut index = FxHashMap::default();
        for mut entry in entries {
            let fits = entry
                .offset
                .checked_add(entry.size)
                .is_some_and(|end| end <= pack_len);
            if !fits {
                return Err(PackError::OutOfBounds {
                    name: entry.name,
                    offset: entry.offset,
                    size: entry.size,
                    pack_len,
                });
            }
            entry.name = canonical_name("", &entry.name);
            if index.contains_key(&entry.name) {
                return Err(PackError::Duplicate(entry.name));
            }
            index.insert(entry.name.clone(), entry);
        }
        log::debug!("Opened pack with {} entries", index.len());

        Ok(Self { index, pack_file })
    }

    /// Looks up the location of a resource.
    pub fn entry(&self, canonical_name: &str) -> Option<&PackEntry> {
        self.index.get(canonical_name)
    }

    /// The number of resources in the pack.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the pack holds no resources.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl ResourceLoader for PackLoader {
    fn read(&mut self, canonical_name: &str) -> Result<Vec<u8>, LoadError> {
        let entry = self
            .index
            .get(canonical_name)
            .ok_or_else(|| LoadError::NotFound {
                name: canonical_name.to_string(),
            })?;

        let io_error = |source| LoadError::Io {
            name: canonical_name.to_string(),
            source,
        };
        self.pack_file
            .seek(SeekFrom::Start(entry.offset))
            .map_err(io_error)?;
        // The file may have shrunk since the index was checked.
        let mut buffer = Vec::new();
        (&self.pack_file)
            .take(entry.size)
            .read_to_end(&mut buffer)
            .map_err(io_error)?;
        if buffer.len() as u64 != entry.size {
            return Err(io_error(std::io::Error::from(
                std::io::ErrorKind::UnexpectedEof,
            )));
        }
        Ok(buffer)
    }
}

/// Builds the `data.pack` and `index.bin` pair read by [`PackLoader`].
#[derive(Debug, Default)]
pub struct PackWriter {
    entries: Vec<PackEntry>,
    data: Vec<u8>,
}

impl PackWriter {
    /// Creates an empty pack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a resource. `name` is stored in canonical form.
    pub fn add(&mut self, name: &str, bytes: &[u8]) -> Result<&PackEntry, PackError> {
        let name = canonical_name("", name);
        if self.entries.iter().any(|entry| entry.name == name) {
            return Err(PackError::Duplicate(name));
        }
        self.entries.push(PackEntry {
            name,
            offset: self.data.len() as u64,
            size: bytes.len() as u64,
        });
        self.data.extend_from_slice(bytes);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// The entries added so far, in insertion order.
    pub fn entries(&self) -> &[PackEntry] {
        &self.entries
    }

    /// Encodes the index as `index.bin` bytes.
    pub fn index_bytes(&self) -> Result<Vec<u8>, PackError> {
        let config = bincode::config::standard();
        Ok(bincode::serde::encode_to_vec(&self.entries, config)?)
    }

    /// Writes the pack data to `data` and returns the encoded index.
    pub fn finish(self, mut data: impl Write) -> Result<Vec<u8>, PackError> {
        let index = self.index_bytes()?;
        data.write_all(&self.data)?;
        log::debug!(
            "Wrote pack with {} entries ({} bytes of data)",
            self.entries.len(),
            self.data.len()
        );
        Ok(index)
    }
}
