//! Normalized account addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TypesError, TypesResult};

/// Number of hex digits in an account address (20 bytes).
const ADDRESS_HEX_LEN: usize = 40;

/// An on-chain account address in canonical form.
///
/// Always `0x` followed by 40 lower-case hex digits, so two addresses that
/// differ only in letter case (checksummed vs. plain) compare equal once
/// parsed. Ordering is lexicographic on the canonical string, which gives
/// every map keyed by `Address` a deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address.
    ///
    /// Accepts an optional `0x`/`0X` prefix and any letter case.
    pub fn parse(input: &str) -> TypesResult<Self> {
        let trimmed = input.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if hex.len() != ADDRESS_HEX_LEN || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(TypesError::invalid_address(input));
        }

        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// The canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
