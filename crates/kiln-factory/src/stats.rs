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

/// Counters describing what a factory has done since it was created.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FactoryStats {
    /// `get` calls served from the cache.
    pub cache_hits: u64,
    /// Resources created by a create handler and made resident.
    pub created: u64,
    /// Resources torn down by a destroy handler after their last release.
    pub destroyed: u64,
    /// `get` calls that returned an error.
    pub failed: u64,
}

impl FactoryStats {
    /// Total number of `get` calls, successful or not.
    pub fn requests(&self) -> u64 {
        self.cache_hits + self.created + self.failed
    }
}
