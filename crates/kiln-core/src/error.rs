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

//! Defines the error taxonomy of the resource factory.

use crate::decoder::DecodeError;
use crate::hash::NameHash;
use thiserror::Error;

/// A convenient result alias for factory operations.
pub type FactoryResult<T> = Result<T, FactoryError>;

/// The result a create or destroy handler reports back to the factory.
pub type CreateResult = Result<(), CreateError>;

/// An error returned by a factory operation.
///
/// Cache hits never produce an error, and no error path leaves a partially
/// created entry resident in the factory.
#[derive(Debug, Error)]
pub enum FactoryError {
    /// A type registration was malformed.
    #[error("Invalid type registration: {0}")]
    InvalidArgument(String),

    /// A handler is already bound to the extension.
    #[error("A resource type is already registered for extension '{extension}'")]
    AlreadyRegistered {
        /// The extension that was registered twice.
        extension: String,
    },

    /// No handler is bound to the extension of the requested name.
    #[error("No resource type registered for '{name}'")]
    UnknownResourceType {
        /// The canonical name that was requested.
        name: String,
    },

    /// The loader has no entry for the requested name.
    #[error("Resource '{name}' not found")]
    ResourceNotFound {
        /// The canonical name that was requested.
        name: String,
    },

    /// The loader found the entry but failed to read it.
    #[error("I/O error while loading '{name}'")]
    Io {
        /// The canonical name that was requested.
        name: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The create handler rejected the buffer.
    #[error("Failed to create resource '{name}'")]
    CreateFailed {
        /// The canonical name that was requested.
        name: String,
        /// What the handler reported.
        #[source]
        source: CreateError,
    },

    /// A descriptor was queried for a name that is not resident.
    #[error("Resource '{name}' is not loaded")]
    NotLoaded {
        /// The canonical name that was queried.
        name: String,
    },

    /// The factory already holds its maximum number of resident resources.
    #[error("Resource factory is full ({capacity} resident resources)")]
    OutOfResources {
        /// The factory's fixed capacity.
        capacity: usize,
    },
}

/// An error reported by a create or destroy handler.
#[derive(Debug, Error)]
pub enum CreateError {
    /// The buffer did not decode against the expected message schema.
    #[error("Message decoding failed")]
    Decode(#[from] DecodeError),

    /// A sub-resource the handler depends on could not be acquired.
    #[error("Failed to acquire dependency '{name}'")]
    Dependency {
        /// The name of the dependency as written in the parent resource.
        name: String,
        /// Why the factory refused it.
        #[source]
        source: Box<FactoryError>,
    },

    /// The handler reported success without storing a resource.
    #[error("Handler did not produce a resource for {0}")]
    MissingResource(NameHash),

    /// Any other handler-specific failure.
    #[error("{0}")]
    Other(String),
}

impl CreateError {
    /// Wraps a factory error raised while acquiring the dependency `name`.
    pub fn dependency(name: impl Into<String>, source: FactoryError) -> Self {
        Self::Dependency {
            name: name.into(),
            source: Box::new(source),
        }
    }
}
