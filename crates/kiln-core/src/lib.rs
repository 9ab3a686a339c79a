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

//! # Kiln Core
//!
//! Foundational crate containing the primitive types and interface contracts
//! shared by every layer of the resource factory.
//!
//! The key components are:
//! - [`NameHash`] and [`canonical_name`]: how a caller-supplied name becomes a
//!   stable cache identity.
//! - [`Resource`] and [`ResourceDescriptor`]: the handle handed out to callers
//!   and the record type handlers populate.
//! - [`ResourceLoader`]: the contract for anything that can produce raw bytes
//!   for a canonical name.
//! - [`decoder`]: the message decoder resource handlers use to turn bytes into
//!   typed values.
//!
//! This crate has no knowledge of how resources are cached or when they are
//! created and destroyed; that orchestration lives in `kiln-factory`.

#![warn(missing_docs)]

pub mod config;
pub mod decoder;
pub mod error;
pub mod hash;
pub mod loader;
pub mod name;
pub mod resource;

pub use config::{ConfigError, FactoryConfig};
pub use error::{CreateError, CreateResult, FactoryError, FactoryResult};
pub use hash::{hash64, NameHash};
pub use loader::{LoadError, ResourceLoader};
pub use name::{canonical_name, extension_of};
pub use resource::{DescriptorSnapshot, Resource, ResourceDescriptor, ResourceId, ResourceKind};
