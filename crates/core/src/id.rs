// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Random hexadecimal identifiers

use rand::RngCore;
use thiserror::Error;

/// Returns a string slice truncated to at most `n` characters.
pub fn short(s: &str, n: usize) -> &str {
    if s.len() <= n {
        s
    } else {
        &s[..n]
    }
}

/// Errors from parsing an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("invalid {kind} '{value}': expected {len} lowercase hex characters")]
    Invalid { kind: &'static str, value: String, len: usize },
}

/// Generate `bytes` bytes from the thread-local CSPRNG, hex encoded.
pub fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}

/// True if `s` is exactly `len` lowercase hex characters.
pub fn is_hex_id(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// Define a newtype ID wrapper around a lowercase hex string.
///
/// Generates `new()` for random ID generation, `parse()` for validated
/// construction, `as_str()`, `short()`, `shard()`, `Display`, `FromStr`,
/// `TryFrom<String>`, `PartialEq<str>`, `PartialEq<&str>`, `AsRef<str>` and
/// `Deref` implementations. Deserialization goes through `parse()`, so a
/// stored id of the wrong shape is rejected on read.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct TaskId(16, "task id");
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident($bytes:literal, $kind:literal);
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Number of hex characters in this ID.
            pub const LEN: usize = $bytes * 2;

            /// Generate a new random ID
            pub fn new() -> Self {
                Self($crate::id::random_hex($bytes))
            }

            /// Validate and wrap an existing string
            pub fn parse(s: &str) -> Result<Self, $crate::id::IdError> {
                if $crate::id::is_hex_id(s, Self::LEN) {
                    Ok(Self(s.to_string()))
                } else {
                    Err($crate::id::IdError::Invalid {
                        kind: $kind,
                        value: s.to_string(),
                        len: Self::LEN,
                    })
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Split into the two-character shard prefix and the remainder.
            pub fn shard(&self) -> (&str, &str) {
                self.0.split_at(2)
            }

            /// Returns a string slice truncated to at most `n` characters.
            pub fn short(&self, n: usize) -> &str {
                $crate::id::short(&self.0, n)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::id::IdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::id::IdError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
