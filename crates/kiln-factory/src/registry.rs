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

//! A registry of resource types, keyed by file extension.

use crate::ResourceFactory;
use fxhash::FxHashMap;
use kiln_core::{extension_of, CreateResult, FactoryError, FactoryResult, ResourceDescriptor};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Turns a raw buffer into a resource instance stored in the descriptor.
///
/// The handler may call back into the factory to acquire sub-resources. If it
/// fails after acquiring some, it must release them itself before returning.
pub type CreateFn =
    fn(&mut ResourceFactory, &TypeContext, &[u8], &mut ResourceDescriptor) -> CreateResult;

/// Tears down a resource instance, releasing every sub-resource its create
/// handler acquired.
pub type DestroyFn = fn(&mut ResourceFactory, &TypeContext, &mut ResourceDescriptor) -> CreateResult;

/// The opaque context registered alongside a type's handlers.
///
/// Handlers get it back on every call and recover their own state with
/// [`get`](Self::get). State that handlers mutate needs interior mutability,
/// since the context is shared.
#[derive(Clone, Default)]
pub struct TypeContext(Option<Arc<dyn Any + Send + Sync>>);

impl TypeContext {
    /// A context carrying no state.
    pub fn none() -> Self {
        Self(None)
    }

    /// Wraps shared handler state.
    pub fn new<T: Any + Send + Sync>(state: Arc<T>) -> Self {
        Self(Some(state))
    }

    /// Borrows the state if it is a `T`.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref()?.downcast_ref::<T>()
    }

    /// Returns `true` if no state was registered.
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }
}

impl fmt::Debug for TypeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("TypeContext(..)"),
            None => f.write_str("TypeContext(None)"),
        }
    }
}

/// The capability table entry of one resource type.
#[derive(Debug)]
pub struct TypeHandler {
    extension: String,
    context: TypeContext,
    create: CreateFn,
    destroy: DestroyFn,
}

impl TypeHandler {
    /// The extension this handler is bound to.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The context passed to both handlers.
    pub fn context(&self) -> &TypeContext {
        &self.context
    }

    /// The create handler.
    pub fn create_fn(&self) -> CreateFn {
        self.create
    }

    /// The destroy handler.
    pub fn destroy_fn(&self) -> DestroyFn {
        self.destroy
    }
}

/// Maps file extensions to the handlers that create and destroy their
/// resources.
#[derive(Debug, Default)]
pub struct TypeRegistry {
    handlers: FxHashMap<String, Arc<TypeHandler>>,
}

impl TypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `extension` to a handler pair and its context.
    ///
    /// # Errors
    /// - [`FactoryError::InvalidArgument`] if the extension is empty or starts
    ///   with `.`, or if either handler is missing.
    /// - [`FactoryError::AlreadyRegistered`] if the extension is taken.
    pub fn register(
        &mut self,
        extension: &str,
        context: TypeContext,
        create: Option<CreateFn>,
        destroy: Option<DestroyFn>,
    ) -> FactoryResult<()> {
        if extension.is_empty() {
            return Err(FactoryError::InvalidArgument(
                "extension must not be empty".to_string(),
            ));
        }
        if extension.starts_with('.') {
            return Err(FactoryError::InvalidArgument(format!(
                "extension '{extension}' must not start with a separator"
            )));
        }
        let (Some(create), Some(destroy)) = (create, destroy) else {
            return Err(FactoryError::InvalidArgument(format!(
                "extension '{extension}' needs both a create and a destroy handler"
            )));
        };
        if self.handlers.contains_key(extension) {
            return Err(FactoryError::AlreadyRegistered {
                extension: extension.to_string(),
            });
        }

        let handler = TypeHandler {
            extension: extension.to_string(),
            context,
            create,
            destroy,
        };
        self.handlers
            .insert(extension.to_string(), Arc::new(handler));
        log::debug!("Registered resource type '{}'", extension);
        Ok(())
    }

    /// The handler bound to `extension`, if any.
    pub fn get(&self, extension: &str) -> Option<&Arc<TypeHandler>> {
        self.handlers.get(extension)
    }

    /// The handler responsible for a canonical resource name, chosen by the
    /// name's extension.
    pub fn handler_for(&self, canonical_name: &str) -> Option<&Arc<TypeHandler>> {
        extension_of(canonical_name).and_then(|extension| self.get(extension))
    }

    /// Returns `true` if a handler is bound to `extension`.
    pub fn contains(&self, extension: &str) -> bool {
        self.handlers.contains_key(extension)
    }

    /// The registered extensions in unspecified order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// The number of registered types.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns `true` if no type is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dummy_create(
        _: &mut ResourceFactory,
        _: &TypeContext,
        _: &[u8],
        _: &mut ResourceDescriptor,
    ) -> CreateResult {
        Ok(())
    }

    fn dummy_destroy(
        _: &mut ResourceFactory,
        _: &TypeContext,
        _: &mut ResourceDescriptor,
    ) -> CreateResult {
        Ok(())
    }

    #[test]
    fn test_register_type() {
        let mut registry = TypeRegistry::new();

        // Missing create/destroy handlers
        let result = registry.register("foo", TypeContext::none(), None, None);
        assert!(matches!(result, Err(FactoryError::InvalidArgument(_))));
        let result = registry.register("foo", TypeContext::none(), Some(dummy_create), None);
        assert!(matches!(result, Err(FactoryError::InvalidArgument(_))));

        // Leading separator
        let result = registry.register(
            ".foo",
            TypeContext::none(),
            Some(dummy_create),
            Some(dummy_destroy),
        );
        assert!(matches!(result, Err(FactoryError::InvalidArgument(_))));

        // Ok
        registry
            .register("foo", TypeContext::none(), Some(dummy_create), Some(dummy_destroy))
            .unwrap();

        // Already registered
        let result = registry.register(
            "foo",
            TypeContext::none(),
            Some(dummy_create),
            Some(dummy_destroy),
        );
        assert!(matches!(
            result,
            Err(FactoryError::AlreadyRegistered { ref extension }) if extension == "foo"
        ));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_empty_extension_is_invalid() {
        let mut registry = TypeRegistry::new();
        let result = registry.register("", TypeContext::none(), Some(dummy_create), Some(dummy_destroy));
        assert!(matches!(result, Err(FactoryError::InvalidArgument(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_handler_for_uses_final_extension() {
        let mut registry = TypeRegistry::new();
        registry
            .register("cont", TypeContext::none(), Some(dummy_create), Some(dummy_destroy))
            .unwrap();

        let handler = registry.handler_for("build/default/test.cont").unwrap();
        assert_eq!(handler.extension(), "cont");
        assert!(registry.handler_for("build/default/test.foo").is_none());
        assert!(registry.handler_for("build.cont/noext").is_none());
        assert_eq!(registry.extensions().collect::<Vec<_>>(), vec!["cont"]);
    }

    #[test]
    fn test_context_downcast() {
        struct Counter(u32);

        let context = TypeContext::new(Arc::new(Counter(3)));
        assert_eq!(context.get::<Counter>().map(|c| c.0), Some(3));
        assert!(context.get::<String>().is_none());
        assert!(TypeContext::none().is_none());
        assert!(TypeContext::none().get::<Counter>().is_none());
    }
}
