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

use crate::ResourceFactory;
use kiln_core::{FactoryResult, Resource};
use std::ops::Deref;

/// A reference that is released when it goes out of scope.
///
/// Meant for call sites that bail out early on errors and would otherwise
/// have to remember to release on every path. The guard borrows the factory
/// for its whole lifetime; use [`factory`](Self::factory) to keep working
/// with it while the resource is held.
pub struct ScopedResource<'f> {
    factory: &'f mut ResourceFactory,
    resource: Option<Resource>,
}

impl<'f> ScopedResource<'f> {
    /// Acquires `name` from `factory`.
    pub fn get(factory: &'f mut ResourceFactory, name: &str) -> FactoryResult<Self> {
        let resource = factory.get(name)?;
        Ok(Self {
            factory,
            resource: Some(resource),
        })
    }

    /// The factory the resource was acquired from.
    pub fn factory(&mut self) -> &mut ResourceFactory {
        &mut *self.factory
    }

    /// Stops guarding the reference and hands it to the caller, who then
    /// owes the matching release.
    pub fn into_inner(mut self) -> Resource {
        match self.resource.take() {
            Some(resource) => resource,
            None => unreachable!("scoped resource is only emptied on drop"),
        }
    }
}

impl Deref for ScopedResource<'_> {
    type Target = Resource;

    fn deref(&self) -> &Resource {
        match &self.resource {
            Some(resource) => resource,
            None => unreachable!("scoped resource is only emptied on drop"),
        }
    }
}

impl Drop for ScopedResource<'_> {
    fn drop(&mut self) {
        if let Some(resource) = self.resource.take() {
            self.factory.release(resource);
        }
    }
}
