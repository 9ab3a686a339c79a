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

//! # Kiln Factory
//!
//! The reference-counted resource factory.
//!
//! A [`ResourceFactory`] loads named resources through a
//! [`ResourceLoader`](kiln_core::ResourceLoader), turns their bytes into
//! in-memory instances through the create handler registered for the name's
//! extension, and keeps each instance resident for exactly as long as at
//! least one [`Resource`](kiln_core::Resource) handle to it is outstanding.
//!
//! Handlers receive the factory itself, so a container resource can acquire
//! its children with recursive [`ResourceFactory::get`] calls and give them
//! back from its destroy handler.

#![warn(missing_docs)]

mod factory;
mod registry;
mod scoped;
mod stats;

pub use factory::ResourceFactory;
pub use registry::{CreateFn, DestroyFn, TypeContext, TypeHandler, TypeRegistry};
pub use scoped::ScopedResource;
pub use stats::FactoryStats;

pub mod prelude {
    //! Commonly used exports.

    pub use crate::{
        CreateFn, DestroyFn, FactoryStats, ResourceFactory, ScopedResource, TypeContext,
    };
    pub use kiln_core::decoder::{decode_message, MessageFormat};
    pub use kiln_core::{
        CreateError, CreateResult, DescriptorSnapshot, FactoryConfig, FactoryError,
        FactoryResult, NameHash, Resource, ResourceDescriptor, ResourceKind,
    };
}
