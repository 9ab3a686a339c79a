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

//! The `cont` and `foo` resource types loaded by the sandbox.

use kiln_core::hash64;
use kiln_factory::prelude::*;
use serde::Deserialize;

/// Handler state shared by both types.
pub struct SandboxTypes {
    pub format: MessageFormat,
}

/// A named group of other resources.
#[derive(Deserialize)]
struct ContainerDesc {
    name: String,
    resources: Vec<String>,
}

/// A leaf resource holding a single value.
#[derive(Debug, Deserialize)]
pub struct Foo {
    pub x: i32,
}

/// A loaded container, holding a reference to each of its children.
pub struct Container {
    pub name: String,
    pub name_hash: u64,
    pub resources: Vec<Resource>,
}

fn format_of(context: &TypeContext) -> Result<MessageFormat, CreateError> {
    context
        .get::<SandboxTypes>()
        .map(|types| types.format)
        .ok_or_else(|| CreateError::Other("sandbox types registered without context".to_string()))
}

fn container_create(
    factory: &mut ResourceFactory,
    context: &TypeContext,
    buffer: &[u8],
    descriptor: &mut ResourceDescriptor,
) -> CreateResult {
    let desc: ContainerDesc = decode_message(format_of(context)?, buffer)?;

    let mut resources = Vec::with_capacity(desc.resources.len());
    for name in &desc.resources {
        match factory.get(name) {
            Ok(resource) => resources.push(resource),
            Err(err) => {
                for resource in resources {
                    factory.release(resource);
                }
                return Err(CreateError::dependency(name.as_str(), err));
            }
        }
    }

    log::info!(
        "Container '{}' holds {} resources",
        desc.name,
        resources.len()
    );
    descriptor.set_resource(Container {
        name_hash: hash64(desc.name.as_bytes()),
        name: desc.name,
        resources,
    });
    Ok(())
}

fn container_destroy(
    factory: &mut ResourceFactory,
    _: &TypeContext,
    descriptor: &mut ResourceDescriptor,
) -> CreateResult {
    let container = descriptor
        .take_resource::<Container>()
        .ok_or_else(|| CreateError::Other("container is still shared".to_string()))?;
    for resource in container.resources {
        factory.release(resource);
    }
    Ok(())
}

fn foo_create(
    _: &mut ResourceFactory,
    context: &TypeContext,
    buffer: &[u8],
    descriptor: &mut ResourceDescriptor,
) -> CreateResult {
    let foo: Foo = decode_message(format_of(context)?, buffer)?;
    descriptor.set_resource(foo);
    descriptor.kind = ResourceKind::Message;
    Ok(())
}

fn foo_destroy(
    _: &mut ResourceFactory,
    _: &TypeContext,
    descriptor: &mut ResourceDescriptor,
) -> CreateResult {
    descriptor.take_resource::<Foo>();
    Ok(())
}

/// Registers `cont` and `foo` with `factory`.
pub fn register(factory: &mut ResourceFactory, format: MessageFormat) -> FactoryResult<()> {
    let context = TypeContext::new(std::sync::Arc::new(SandboxTypes { format }));
    factory.register_type(
        "cont",
        context.clone(),
        Some(container_create),
        Some(container_destroy),
    )?;
    factory.register_type("foo", context, Some(foo_create), Some(foo_destroy))
}

/// A one-line description of a loaded instance.
pub fn describe(resource: &Resource) -> String {
    if let Some(foo) = resource.downcast_ref::<Foo>() {
        return format!("foo (x = {})", foo.x);
    }
    if let Some(container) = resource.downcast_ref::<Container>() {
        let children = container
            .resources
            .iter()
            .map(describe)
            .collect::<Vec<_>>();
        return format!(
            "container '{}' ({:#018x}) [{}]",
            container.name,
            container.name_hash,
            children.join(", ")
        );
    }
    "unknown instance".to_string()
}
