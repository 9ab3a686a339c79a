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

//! Loads resources through a kiln factory and prints what became resident.
//!
//! ```text
//! sandbox --config sandbox.toml levels/test.cont
//! ```

mod types;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use kiln_factory::prelude::*;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Bincode,
    Ron,
}

impl From<Format> for MessageFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Bincode => MessageFormat::Bincode,
            Format::Ron => MessageFormat::Ron,
        }
    }
}

/// Loads resources through a reference-counted factory.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// TOML file with the factory settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Overrides the base path from the configuration
    #[arg(long)]
    base_path: Option<String>,

    /// Encoding of the `cont` and `foo` files
    #[arg(long, value_enum, default_value_t = Format::Ron)]
    format: Format,

    /// Resources to load, relative to the base path
    #[arg(required = true)]
    names: Vec<String>,
}

fn main() -> Result<()> {
    use env_logger::{Builder, Env};

    Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => FactoryConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => FactoryConfig::default(),
    };
    if let Some(base_path) = args.base_path {
        config.base_path = base_path;
    }

    let mut factory = ResourceFactory::from_config(&config);
    types::register(&mut factory, args.format.into())?;

    let mut loaded = Vec::with_capacity(args.names.len());
    let mut failures = 0;
    for name in &args.names {
        match factory.get(name) {
            Ok(resource) => {
                let descriptor = factory.get_descriptor(name)?;
                println!(
                    "{} {} refs={} kind={:?} size={} -> {}",
                    factory.canonical_name(name),
                    descriptor.name_hash,
                    descriptor.reference_count,
                    descriptor.kind,
                    descriptor.buffer_size,
                    types::describe(&resource)
                );
                loaded.push(resource);
            }
            Err(err) => {
                failures += 1;
                log::error!("Could not load '{}': {}", name, err);
            }
        }
    }

    let mut resident = factory.resident_names().map(str::to_owned).collect::<Vec<_>>();
    resident.sort_unstable();
    log::info!("Resident resources: {}", resident.join(", "));

    for resource in loaded {
        factory.release(resource);
    }

    let stats = factory.stats();
    log::info!(
        "{} requests: {} created, {} cache hits, {} failed, {} destroyed",
        stats.requests(),
        stats.created,
        stats.cache_hits,
        stats.failed,
        stats.destroyed
    );

    if failures > 0 {
        anyhow::bail!("{} of {} resources failed to load", failures, args.names.len());
    }
    Ok(())
}
