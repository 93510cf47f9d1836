//! Token amounts.
//!
//! Amounts are unbounded unsigned integers in the token's smallest unit.
//! JSON has no integer type wide enough for them, so every amount field is
//! serialized as a decimal string through the helpers in this module.
//! Deserialization also accepts plain JSON integers for hand-written
//! fixtures.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::Deserializer;

/// Amount in the token's smallest unit.
pub type Amount = num::BigUint;

/// Parse a decimal amount string.
pub fn parse_amount(input: &str) -> Option<Amount> {
    Amount::from_str(input.trim()).ok()
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a non-negative integer or decimal string")
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Amount, E> {
        Ok(Amount::from(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Amount, E> {
        u64::try_from(value)
            .map(Amount::from)
            .map_err(|_| E::custom(format!("negative amount {value}")))
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Amount, E> {
        parse_amount(value).ok_or_else(|| E::custom(format!("invalid amount {value:?}")))
    }
}

fn deserialize_one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
    deserializer.deserialize_any(AmountVisitor)
}

/// Serde helper for a single `Amount` field.
pub mod serde_amount {
    use serde::{Deserializer, Serializer};

    use super::Amount;

    pub fn serialize<S: Serializer>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(amount)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Amount, D::Error> {
        super::deserialize_one(deserializer)
    }
}

#[derive(serde::Deserialize)]
#[serde(transparent)]
struct AmountRepr(#[serde(deserialize_with = "deserialize_one")] Amount);

/// Serde helper for `Vec<Amount>` fields.
pub mod serde_amounts {
    use serde::ser::SerializeSeq;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::{Amount, AmountRepr};

    pub fn serialize<S: Serializer>(amounts: &[Amount], serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(amounts.len()))?;
        for amount in amounts {
            seq.serialize_element(&amount.to_string())?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Amount>, D::Error> {
        let raw = Vec::<AmountRepr>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|r| r.0).collect())
    }
}

/// Serde helper for `BTreeMap<K, Amount>` fields.
pub mod serde_amount_map {
    use std::collections::BTreeMap;

    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Amount, AmountRepr};

    pub fn serialize<K, S>(map: &BTreeMap<K, Amount>, serializer: S) -> Result<S::Ok, S::Error>
    where
        K: Serialize,
        S: Serializer,
    {
        let mut out = serializer.serialize_map(Some(map.len()))?;
        for (key, amount) in map {
            out.serialize_entry(key, &amount.to_string())?;
        }
        out.end()
    }

    pub fn deserialize<'de, K, D>(deserializer: D) -> Result<BTreeMap<K, Amount>, D::Error>
    where
        K: Deserialize<'de> + Ord,
        D: Deserializer<'de>,
    {
        let raw = BTreeMap::<K, AmountRepr>::deserialize(deserializer)?;
        Ok(raw.into_iter().map(|(k, v)| (k, v.0)).collect())
    }
}
