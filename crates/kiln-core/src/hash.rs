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

//! 64-bit name hashing.

use fxhash::FxHasher64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hasher;

/// Hashes a byte buffer to a deterministic 64-bit value.
///
/// The result only depends on the bytes, never on process state, so it is
/// safe to persist and to compare across factories.
pub fn hash64(bytes: &[u8]) -> u64 {
    let mut hasher = FxHasher64::default();
    hasher.write(bytes);
    hasher.finish()
}

/// The 64-bit hash of a canonical resource name, used as the cache key.
///
/// Two distinct canonical names are assumed never to collide within the
/// lifetime of a single factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameHash(u64);

impl NameHash {
    /// Hashes a canonical name.
    pub fn of(canonical_name: &str) -> Self {
        Self(hash64(canonical_name.as_bytes()))
    }

    /// Wraps an already computed hash value.
    pub const fn from_raw(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw 64-bit value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
