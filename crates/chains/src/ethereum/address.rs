//! Ethereum address parsing.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ChainError;

/// A 20-byte Ethereum account address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; Address::LENGTH]);

impl Address {
    pub const LENGTH: usize = 20;

    pub fn from_bytes(bytes: [u8; Address::LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; Address::LENGTH] {
        &self.0
    }
}

fn strip_hex_prefix(s: &str) -> &str {
    s.strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s)
}

/// Check whether `s` is a hex encoded address: 40 hex digits with an
/// optional `0x` prefix. Checksum casing is not verified.
pub fn is_hex_address(s: &str) -> bool {
    let digits = strip_hex_prefix(s);
    digits.len() == 2 * Address::LENGTH && digits.bytes().all(|b| b.is_ascii_hexdigit())
}

impl FromStr for Address {
    type Err = ChainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_hex_address(s) {
            return Err(ChainError::InvalidAddress(s.to_string()));
        }

        let decoded = hex::decode(strip_hex_prefix(s))
            .map_err(|_| ChainError::InvalidAddress(s.to_string()))?;
        let mut bytes = [0u8; Address::LENGTH];
        bytes.copy_from_slice(&decoded);
        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
