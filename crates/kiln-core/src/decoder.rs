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

//! The message decoder used by resource handlers.
//!
//! A message is a serde type acting as the schema of a resource file. Handlers
//! decode the raw buffer into their message type, build the in-memory
//! resource from it, and let the intermediate message drop when it is not
//! retained.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use thiserror::Error;

/// The encoding of a message buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageFormat {
    /// Compact binary encoding (`bincode`, standard configuration).
    #[default]
    Bincode,
    /// Human-readable text encoding (`ron`).
    Ron,
}

/// An error raised while decoding a message.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The binary buffer does not match the schema.
    #[error("Invalid binary message: {0}")]
    Bincode(#[from] bincode::error::DecodeError),
    /// The binary buffer has bytes left over after the message.
    #[error("Binary message has {trailing} trailing bytes")]
    TrailingBytes {
        /// Number of bytes that were not consumed.
        trailing: usize,
    },
    /// The text buffer does not match the schema.
    #[error("Invalid text message: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

/// An error raised while encoding a message.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Binary encoding failed.
    #[error("Failed to encode binary message: {0}")]
    Bincode(#[from] bincode::error::EncodeError),
    /// Text encoding failed.
    #[error("Failed to encode text message: {0}")]
    Ron(#[from] ron::Error),
}

/// Decodes `bytes` into the message type `T`.
pub fn decode_message<T: DeserializeOwned>(
    format: MessageFormat,
    bytes: &[u8],
) -> Result<T, DecodeError> {
    match format {
        MessageFormat::Bincode => {
            let config = bincode::config::standard();
            let (message, consumed): (T, usize) =
                bincode::serde::decode_from_slice(bytes, config)?;
            if consumed != bytes.len() {
                return Err(DecodeError::TrailingBytes {
                    trailing: bytes.len() - consumed,
                });
            }
            Ok(message)
        }
        MessageFormat::Ron => Ok(ron::de::from_bytes(bytes)?),
    }
}

/// Encodes `message` in the given format.
pub fn encode_message<T: Serialize>(
    format: MessageFormat,
    message: &T,
) -> Result<Vec<u8>, EncodeError> {
    match format {
        MessageFormat::Bincode => {
            let config = bincode::config::standard();
            Ok(bincode::serde::encode_to_vec(message, config)?)
        }
        MessageFormat::Ron => Ok(ron::to_string(message)?.into_bytes()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ResourceFoo {
        x: i32,
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct ContainerDesc {
        name: String,
        resources: Vec<String>,
    }

    #[test]
    fn test_decode_ron_text() {
        let text = br#"(name: "Testing", resources: ["a.foo", "b.foo"])"#;
        let desc: ContainerDesc = decode_message(MessageFormat::Ron, text).unwrap();
        assert_eq!(desc.name, "Testing");
        assert_eq!(desc.resources, vec!["a.foo", "b.foo"]);
    }

    #[test]
    fn test_decode_bincode_written_by_encoder() {
        let bytes = encode_message(MessageFormat::Bincode, &ResourceFoo { x: 456 }).unwrap();
        let foo: ResourceFoo = decode_message(MessageFormat::Bincode, &bytes).unwrap();
        assert_eq!(foo, ResourceFoo { x: 456 });
    }

    #[test]
    fn test_decode_rejects_wrong_schema() {
        let result: Result<ResourceFoo, _> = decode_message(MessageFormat::Ron, b"(y: \"no\")");
        assert!(matches!(result, Err(DecodeError::Ron(_))));
    }

    #[test]
    fn test_decode_rejects_trailing_bytes() {
        let mut bytes = encode_message(MessageFormat::Bincode, &ResourceFoo { x: 1 }).unwrap();
        bytes.extend_from_slice(&[0, 0]);
        let result: Result<ResourceFoo, _> = decode_message(MessageFormat::Bincode, &bytes);
        assert!(matches!(result, Err(DecodeError::TrailingBytes { trailing: 2 })));
    }

    #[test]
    fn test_decode_rejects_truncated_buffer() {
        let result: Result<ContainerDesc, _> = decode_message(MessageFormat::Bincode, &[5]);
        assert!(matches!(result, Err(DecodeError::Bincode(_))));
    }
}
