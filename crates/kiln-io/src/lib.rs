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

//! # Kiln IO
//!
//! Implementations of [`ResourceLoader`](kiln_core::ResourceLoader) that fetch
//! raw resource bytes from the filesystem, from memory, or from a pack file.

#![warn(missing_docs)]

mod fs;
mod memory;
mod pack;

pub use fs::FileSystemLoader;
pub use memory::MemoryLoader;
pub use pack::{PackEntry, PackError, PackLoader, PackWriter};
