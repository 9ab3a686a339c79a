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

//! The ResourceFactory is responsible for loading, caching and releasing
//! resources.

use std::fmt;
use std::sync::Arc;

use kiln_core::{
    canonical_name, CreateError, DescriptorSnapshot, FactoryConfig, FactoryError,
    FactoryResult, LoadError, NameHash, Resource, ResourceDescriptor, ResourceLoader,
};
use kiln_data::{ResidentEntry, ResourceTable, TableError};
use kiln_io::FileSystemLoader;

use crate::registry::{CreateFn, DestroyFn, TypeContext, TypeHandler, TypeRegistry};
use crate::stats::FactoryStats;

/// Loads resources by name and keeps them resident while referenced.
///
/// Every successful [`get`](Self::get) must be paired with exactly one
/// [`release`](Self::release). The factory never cleans up on its own: a
/// handle that is dropped instead of released keeps its resource resident
/// until the factory itself goes away.
///
/// A factory is owned by one loading context at a time. It can be moved to
/// another thread, but every operation needs exclusive access.
pub struct ResourceFactory {
    base_path: String,
    table: ResourceTable,
    registry: TypeRegistry,
    loader: Box<dyn ResourceLoader>,
    stats: FactoryStats,
}

impl ResourceFactory {
    /// Creates a factory reading resources from the filesystem.
    ///
    /// At most `max_resources` resources may be resident at once; every
    /// requested name is resolved against `base_path`.
    pub fn new(max_resources: usize, base_path: &str) -> Self {
        Self::with_loader(max_resources, base_path, FileSystemLoader::new())
    }

    /// Creates a factory reading resources through `loader`.
    pub fn with_loader(
        max_resources: usize,
        base_path: &str,
        loader: impl ResourceLoader + 'static,
    ) -> Self {
        log::debug!(
            "Creating resource factory (capacity {}, base path '{}')",
            max_resources,
            base_path
        );
        Self {
            base_path: base_path.to_string(),
            table: ResourceTable::new(max_resources),
            registry: TypeRegistry::new(),
            loader: Box::new(loader),
            stats: FactoryStats::default(),
        }
    }

    /// Creates a filesystem-backed factory from a configuration.
    pub fn from_config(config: &FactoryConfig) -> Self {
        Self::new(config.max_resources, &config.base_path)
    }

    /// Registers the handlers for resources with the given extension.
    ///
    /// See [`TypeRegistry::register`] for the failure cases.
    pub fn register_type(
        &mut self,
        extension: &str,
        context: TypeContext,
        create: Option<CreateFn>,
        destroy: Option<DestroyFn>,
    ) -> FactoryResult<()> {
        self.registry.register(extension, context, create, destroy)
    }

    /// Acquires a reference to the resource called `name`.
    ///
    /// If the resource is resident, its reference count is incremented and
    /// the shared instance is returned without touching storage. Otherwise it
    /// is read through the loader and built by the create handler bound to
    /// its extension, then becomes resident with a count of 1.
    ///
    /// # Errors
    /// - [`FactoryError::UnknownResourceType`] if no handler is bound to the
    ///   extension.
    /// - [`FactoryError::ResourceNotFound`] if the loader has no such entry,
    ///   or [`FactoryError::Io`] if reading it failed.
    /// - [`FactoryError::CreateFailed`] if the create handler failed.
    /// - [`FactoryError::OutOfResources`] if the factory is full.
    ///
    /// None of these leave an entry behind.
    pub fn get(&mut self, name: &str) -> FactoryResult<Resource> {
        let canonical = self.canonical_name(name);
        let name_hash = NameHash::of(&canonical);

        if let Some(entry) = self.table.get_mut(name_hash) {
            entry.reference_count += 1;
            log::trace!(
                "Cache hit for '{}' (references: {})",
                entry.canonical_name,
                entry.reference_count
            );
            let resource = Resource::new(name_hash, Arc::clone(&entry.instance));
            self.stats.cache_hits += 1;
            return Ok(resource);
        }

        match self.create(canonical, name_hash) {
            Ok(resource) => {
                self.stats.created += 1;
                Ok(resource)
            }
            Err(err) => {
                self.stats.failed += 1;
                match &err {
                    FactoryError::CreateFailed { .. } | FactoryError::OutOfResources { .. } => {
                        log::warn!("{err}")
                    }
                    _ => log::debug!("{err}"),
                }
                Err(err)
            }
        }
    }

    /// Gives back a reference acquired with [`get`](Self::get).
    ///
    /// When the last reference goes away the resource stops being resident
    /// and the destroy handler of its type runs, which in turn releases any
    /// sub-resources the instance holds. The entry is erased before the
    /// handler runs, so the handler holds the only reference to the instance
    /// and sees its own name as not loaded.
    ///
    /// # Panics
    /// Panics if `resource` is not tracked by this factory. That can only
    /// happen for a handle obtained from another factory or one that has
    /// already been released, and is a bug in the caller.
    pub fn release(&mut self, resource: Resource) {
        let name_hash = resource.name_hash();
        let remaining = match self.table.get_mut(name_hash) {
            Some(entry) if resource.same_instance(&entry.instance) => {
                entry.reference_count -= 1;
                log::trace!(
                    "Released '{}' (references: {})",
                    entry.canonical_name,
                    entry.reference_count
                );
                entry.reference_count
            }
            _ => panic!("released resource {name_hash} is not tracked by this factory"),
        };
        drop(resource);
        if remaining > 0 {
            return;
        }

        // The entry leaves the table first so that the destroy handler owns
        // the only reference to the instance.
        let Some(entry) = self.table.remove(name_hash) else {
            return;
        };
        // Types are never unregistered, so the creating handler is still bound.
        let Some(handler) = self.registry.get(&entry.type_extension).cloned() else {
            unreachable!("resource type '{}' is no longer registered", entry.type_extension);
        };
        let name = entry.canonical_name.clone();
        self.destroy(&handler, &name, entry.into_descriptor());
        self.stats.destroyed += 1;
        log::debug!("Destroyed resource '{}'", name);
    }

    /// Returns a snapshot of the descriptor of a resident resource.
    ///
    /// # Errors
    /// [`FactoryError::NotLoaded`] if `name` is not resident, whether or not
    /// it exists in storage.
    pub fn get_descriptor(&self, name: &str) -> FactoryResult<DescriptorSnapshot> {
        let canonical = self.canonical_name(name);
        self.table
            .get(NameHash::of(&canonical))
            .map(ResidentEntry::snapshot)
            .ok_or(FactoryError::NotLoaded { name: canonical })
    }

    /// Rewrites `name` into the canonical form used as the cache identity.
    pub fn canonical_name(&self, name: &str) -> String {
        canonical_name(&self.base_path, name)
    }

    /// The cache key `name` resolves to.
    pub fn name_hash(&self, name: &str) -> NameHash {
        NameHash::of(&self.canonical_name(name))
    }

    /// Returns `true` if `name` is resident.
    pub fn is_resident(&self, name: &str) -> bool {
        self.table.contains(self.name_hash(name))
    }

    /// The canonical names of all resident resources, in unspecified order.
    pub fn resident_names(&self) -> impl Iterator<Item = &str> {
        self.table.iter().map(|entry| entry.canonical_name.as_str())
    }

    /// The number of resident resources.
    pub fn resident_count(&self) -> usize {
        self.table.len()
    }

    /// The maximum number of resident resources.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// The path names are resolved against.
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// The registered resource types.
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// What the factory has done so far.
    pub fn stats(&self) -> FactoryStats {
        self.stats
    }

    fn create(&mut self, canonical: String, name_hash: NameHash) -> FactoryResult<Resource> {
        let Some(handler) = self.registry.handler_for(&canonical).cloned() else {
            return Err(FactoryError::UnknownResourceType { name: canonical });
        };
        let buffer = match self.loader.read(&canonical) {
            Ok(buffer) => buffer,
            Err(LoadError::NotFound { .. }) => {
                return Err(FactoryError::ResourceNotFound { name: canonical })
            }
            Err(LoadError::Io { source, .. }) => {
                return Err(FactoryError::Io {
                    name: canonical,
                    source,
                })
            }
        };
        // Skip the create handler when the insert is bound to fail anyway.
        if self.table.is_full() {
            return Err(FactoryError::OutOfResources {
                capacity: self.table.capacity(),
            });
        }

        let mut descriptor = ResourceDescriptor::new(name_hash, buffer.len());
        let create = handler.create_fn();
        if let Err(source) = create(self, handler.context(), &buffer, &mut descriptor) {
            return Err(FactoryError::CreateFailed {
                name: canonical,
                source,
            });
        }
        drop(buffer);

        let Some(instance) = descriptor.take_instance() else {
            return Err(FactoryError::CreateFailed {
                name: canonical,
                source: CreateError::MissingResource(name_hash),
            });
        };

        let entry = ResidentEntry {
            name_hash,
            canonical_name: canonical.clone(),
            type_extension: handler.extension().to_string(),
            kind: descriptor.kind,
            buffer_size: descriptor.buffer_size,
            reference_count: 1,
            instance: Arc::clone(&instance),
        };

        match self.table.insert(entry) {
            Ok(()) => {
                log::debug!(
                    "Created resource '{}' ({} bytes, {:?})",
                    canonical,
                    descriptor.buffer_size,
                    descriptor.kind
                );
                Ok(Resource::new(name_hash, instance))
            }
            Err((err, entry)) => {
                // Nothing owns the new instance, tear it down right away.
                drop(instance);
                let mut descriptor = entry.into_descriptor();
                descriptor.reference_count = 0;
                self.destroy(&handler, &canonical, descriptor);

                Err(match err {
                    TableError::Full { capacity } => FactoryError::OutOfResources { capacity },
                    TableError::Occupied(_) => FactoryError::CreateFailed {
                        name: canonical,
                        source: CreateError::Other(
                            "resource became resident while it was being created".to_string(),
                        ),
                    },
                })
            }
        }
    }

    fn destroy(&mut self, handler: &TypeHandler, name: &str, mut descriptor: ResourceDescriptor) {
        let destroy = handler.destroy_fn();
        if let Err(err) = destroy(self, handler.context(), &mut descriptor) {
            log::warn!("Destroy handler for '{}' failed: {}", name, err);
        }
    }
}

impl fmt::Debug for ResourceFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceFactory")
            .field("base_path", &self.base_path)
            .field("resident", &self.table.len())
            .field("capacity", &self.table.capacity())
            .field("types", &self.registry.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Drop for ResourceFactory {
    fn drop(&mut self) {
        if self.table.is_empty() {
            return;
        }
        log::warn!(
            "Resource factory dropped with {} resident resources",
            self.table.len()
        );
        for entry in self.table.iter() {
            log::warn!(
                "  leaked '{}' ({} references)",
                entry.canonical_name,
                entry.reference_count
            );
        }
    }
}
