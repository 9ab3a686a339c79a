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

//! Resource handles and descriptors.

use crate::hash::NameHash;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The type-erased storage of a resource instance.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A counted reference to a resident resource.
///
/// A `Resource` is what `ResourceFactory::get` hands out, and exactly one
/// `release` must consume it again. It is deliberately not `Clone`: every
/// live handle stands for one unit of the descriptor's reference count, so
/// another reference has to be acquired through the factory.
///
/// Dropping a handle without releasing it leaks the reference and keeps the
/// resource resident for the lifetime of the factory.
pub struct Resource {
    name_hash: NameHash,
    instance: Instance,
}

impl Resource {
    /// Creates a handle for a resident instance.
    ///
    /// This is called by the factory once it has accounted for the new
    /// reference.
    pub fn new(name_hash: NameHash, instance: Instance) -> Self {
        Self {
            name_hash,
            instance,
        }
    }

    /// The hash of the canonical name this resource was loaded from.
    pub fn name_hash(&self) -> NameHash {
        self.name_hash
    }

    /// The identity of the shared instance.
    pub fn id(&self) -> ResourceId {
        ResourceId::of(&self.instance)
    }

    /// Returns a reference to the instance if it is of type `T`.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.instance.downcast_ref::<T>()
    }

    /// Returns `true` if the instance is of type `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.instance.is::<T>()
    }

    /// Returns `true` if this handle points at `instance`.
    pub fn same_instance(&self, instance: &Instance) -> bool {
        Arc::ptr_eq(&self.instance, instance)
    }

    /// Returns `true` if both handles share one instance.
    pub fn ptr_eq(a: &Resource, b: &Resource) -> bool {
        Arc::ptr_eq(&a.instance, &b.instance)
    }
}

impl fmt::Debug for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resource")
            .field("name_hash", &self.name_hash)
            .field("id", &self.id())
            .finish()
    }
}

/// The identity of a resource instance, comparable without holding a
/// reference to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceId(usize);

impl ResourceId {
    /// Computes the identity of an instance from its address.
    pub fn of(instance: &Instance) -> Self {
        Self(Arc::as_ptr(instance) as *const () as usize)
    }
}

/// How the resource instance was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResourceKind {
    /// A value built by the handler.
    #[default]
    Instance,
    /// A decoded message retained as-is.
    Message,
}

/// The record a create handler populates and a destroy handler tears down.
///
/// During creation the descriptor starts empty; the handler stores the
/// instance with [`set_resource`](Self::set_resource) and may set the kind.
/// During destruction the handler takes the instance back out with
/// [`take_resource`](Self::take_resource).
pub struct ResourceDescriptor {
    /// The hash of the canonical name.
    pub name_hash: NameHash,
    /// How the instance was produced.
    pub kind: ResourceKind,
    /// The size of the raw buffer the instance was created from.
    pub buffer_size: usize,
    /// The number of outstanding references.
    pub reference_count: u32,
    instance: Option<Instance>,
}

impl ResourceDescriptor {
    /// Creates the empty descriptor handed to a create handler.
    pub fn new(name_hash: NameHash, buffer_size: usize) -> Self {
        Self {
            name_hash,
            kind: ResourceKind::default(),
            buffer_size,
            reference_count: 0,
            instance: None,
        }
    }

    /// Rebuilds a descriptor around an existing instance.
    pub fn from_parts(
        name_hash: NameHash,
        kind: ResourceKind,
        buffer_size: usize,
        reference_count: u32,
        instance: Instance,
    ) -> Self {
        Self {
            name_hash,
            kind,
            buffer_size,
            reference_count,
            instance: Some(instance),
        }
    }

    /// Stores the resource instance.
    pub fn set_resource<T: Any + Send + Sync>(&mut self, value: T) {
        self.instance = Some(Arc::new(value));
    }

    /// Borrows the instance if it is of type `T`.
    pub fn resource<T: Any>(&self) -> Option<&T> {
        self.instance.as_deref()?.downcast_ref::<T>()
    }

    /// Moves the instance out of the descriptor.
    ///
    /// Returns `None`, leaving the descriptor untouched, if the instance is
    /// not a `T` or if some other handle still shares it.
    pub fn take_resource<T: Any + Send + Sync>(&mut self) -> Option<T> {
        let instance = self.instance.take()?;
        match instance.downcast::<T>() {
            Ok(typed) => match Arc::try_unwrap(typed) {
                Ok(value) => Some(value),
                Err(shared) => {
                    self.instance = Some(shared);
                    None
                }
            },
            Err(instance) => {
                self.instance = Some(instance);
                None
            }
        }
    }

    /// Returns `true` once an instance has been stored.
    pub fn has_resource(&self) -> bool {
        self.instance.is_some()
    }

    /// The identity of the stored instance, if any.
    pub fn resource_id(&self) -> Option<ResourceId> {
        self.instance.as_ref().map(ResourceId::of)
    }

    /// Moves the type-erased instance out of the descriptor.
    pub fn take_instance(&mut self) -> Option<Instance> {
        self.instance.take()
    }

    /// Puts a type-erased instance back into the descriptor.
    pub fn restore_instance(&mut self, instance: Instance) {
        self.instance = Some(instance);
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("name_hash", &self.name_hash)
            .field("kind", &self.kind)
            .field("buffer_size", &self.buffer_size)
            .field("reference_count", &self.reference_count)
            .field("resource", &self.resource_id())
            .finish()
    }
}

/// A read-only copy of a resident descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorSnapshot {
    /// The hash of the canonical name.
    pub name_hash: NameHash,
    /// The identity of the resident instance.
    pub resource: ResourceId,
    /// How the instance was produced.
    pub kind: ResourceKind,
    /// The size of the raw buffer the instance was created from.
    pub buffer_size: usize,
    /// The number of outstanding references at the time of the snapshot.
    pub reference_count: u32,
}
