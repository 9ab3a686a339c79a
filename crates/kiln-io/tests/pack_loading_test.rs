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

use anyhow::Result;
use kiln_core::{LoadError, ResourceLoader};
use kiln_io::{PackLoader, PackWriter};
use std::fs::File;
use tempfile::tempdir;

#[test]
fn test_load_resources_from_pack() -> Result<()> {
    // --- 1. Setup: write a real pack and index to disk ---
    let dir = tempdir()?;
    let index_path = dir.path().join("index.bin");
    let data_path = dir.path().join("data.pack");

    let mut writer = PackWriter::new();
    writer.add("textures/stone.foo", &1234u32.to_le_bytes())?;
    writer.add("levels/test.cont", b"(name: \"Testing\")")?;
    let index_bytes = writer.finish(File::create(&data_path)?)?;
    std::fs::write(&index_path, &index_bytes)?;

    // --- 2. Open the pack like a game build would ---
    let index_bytes = std::fs::read(&index_path)?;
    let mut loader = PackLoader::new(&index_bytes, File::open(&data_path)?)?;
    assert_eq!(loader.len(), 2);

    // --- 3. Read entries back, out of order ---
    let level = loader.read("levels/test.cont")?;
    assert_eq!(level, b"(name: \"Testing\")");

    let texture = loader.read("textures/stone.foo")?;
    assert_eq!(u32::from_le_bytes(texture.as_slice().try_into()?), 1234);

    // --- 4. Missing names are reported as such ---
    assert!(matches!(
        loader.read("textures/missing.foo"),
        Err(LoadError::NotFound { .. })
    ));
    Ok(())
}

#[test]
fn test_truncated_pack_reports_io_error() -> Result<()> {
    let dir = tempdir()?;
    let data_path = dir.path().join("data.pack");

    let mut writer = PackWriter::new();
    writer.add("a.foo", b"0123456789")?;
    let index_bytes = writer.finish(Vec::new())?;
    std::fs::write(&data_path, b"01234")?;

    let mut loader = PackLoader::new(&index_bytes, File::open(&data_path)?)?;
    assert!(matches!(loader.read("a.foo"), Err(LoadError::Io { .. })));
    Ok(())
}
