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

//! Canonical resource names.
//!
//! Every name a caller passes to the factory is rewritten into a canonical
//! form before it is hashed, so that `"a/./b.foo"`, `"a//b.foo"` and
//! `"a\\b.foo"` all refer to the same cached resource.

/// Joins `name` onto `base_path` and normalizes the result.
///
/// - `\` is treated as `/`.
/// - Empty segments and `.` segments are dropped.
/// - `..` removes the preceding segment when there is one to remove.
/// - A leading `/` on the joined path is preserved.
///
/// An empty result is returned as `"."`.
pub fn canonical_name(base_path: &str, name: &str) -> String {
    let joined = if base_path.is_empty() {
        name.replace('\\', "/")
    } else {
        format!("{}/{}", base_path, name).replace('\\', "/")
    };

    let absolute = joined.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();
    for segment in joined.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                // Nothing to climb out of at the root.
                _ if absolute => {}
                _ => segments.push(".."),
            },
            _ => segments.push(segment),
        }
    }

    let body = segments.join("/");
    match (absolute, body.is_empty()) {
        (true, _) => format!("/{body}"),
        (false, true) => ".".to_string(),
        (false, false) => body,
    }
}

/// Returns the extension of the final path segment, without the dot.
///
/// Names whose final segment has no dot, or ends with one, have no
/// extension.
pub fn extension_of(canonical_name: &str) -> Option<&str> {
    let file_name = canonical_name.rsplit('/').next()?;
    let (_, extension) = file_name.rsplit_once('.')?;
    (!extension.is_empty()).then_some(extension)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joins_base_path() {
        assert_eq!(canonical_name("build/data", "test.cont"), "build/data/test.cont");
        assert_eq!(canonical_name("", "test.cont"), "test.cont");
    }

    #[test]
    fn test_current_dir_base_disappears() {
        assert_eq!(canonical_name(".", "DOES_NOT_EXISTS.foo"), "DOES_NOT_EXISTS.foo");
        assert_eq!(canonical_name("./", "./a.foo"), "a.foo");
    }

    #[test]
    fn test_equivalent_paths_collapse() {
        let expected = "assets/sub/a.foo";
        assert_eq!(canonical_name("assets", "sub//a.foo"), expected);
        assert_eq!(canonical_name("assets/", "/sub/./a.foo"), expected);
        assert_eq!(canonical_name("assets", "sub\\a.foo"), expected);
        assert_eq!(canonical_name("assets", "other/../sub/a.foo"), expected);
    }

    #[test]
    fn test_parent_segments() {
        assert_eq!(canonical_name("a", "../../b.foo"), "../b.foo");
        assert_eq!(canonical_name("/a", "../../b.foo"), "/b.foo");
        assert_eq!(canonical_name("a", ".."), ".");
    }

    #[test]
    fn test_absolute_base_is_kept() {
        assert_eq!(canonical_name("/tmp/data/", "x.cont"), "/tmp/data/x.cont");
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("a/b/test.cont"), Some("cont"));
        assert_eq!(extension_of("a.dir/file"), None);
        assert_eq!(extension_of("archive.tar.gz"), Some("gz"));
        assert_eq!(extension_of("trailing."), None);
        assert_eq!(extension_of("."), None);
    }
}
