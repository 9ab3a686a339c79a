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

//! Defines the abstraction for reading the raw bytes of a resource.

use thiserror::Error;

/// An error produced by a [`ResourceLoader`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The store has no entry with that name.
    #[error("No entry named '{name}'")]
    NotFound {
        /// The canonical name that was requested.
        name: String,
    },
    /// The entry exists but could not be read.
    #[error("Failed to read '{name}'")]
    Io {
        /// The canonical name that was requested.
        name: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    /// Builds the error for `name` from an I/O error, mapping
    /// [`std::io::ErrorKind::NotFound`] to [`LoadError::NotFound`].
    pub fn from_io(name: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                name: name.to_string(),
            }
        } else {
            Self::Io {
                name: name.to_string(),
                source,
            }
        }
    }
}

/// A source of raw resource bytes, addressed by canonical name.
///
/// This is the "I/O" half of loading. Implementors only fetch bytes; turning
/// them into a usable value is the job of the type handler registered for the
/// resource's extension. A loader performs no caching and no retries.
pub trait ResourceLoader: Send {
    /// Reads the full contents of the entry named `canonical_name`.
    fn read(&mut self, canonical_name: &str) -> Result<Vec<u8>, LoadError>;
}

impl<L: ResourceLoader + ?Sized> ResourceLoader for Box<L> {
    fn read(&mut self, canonical_name: &str) -> Result<Vec<u8>, LoadError> {
        (**self).read(canonical_name)
    }
}
