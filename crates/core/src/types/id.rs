//! Newtype IDs for type-safe entity references.
//!
//! Catalog entries are keyed by server-assigned UUIDs, cart lines by an
//! identity derived from the furniture configuration, and orders by a
//! short timestamp-based reference.

use core::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a furniture entry in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FurnitureId(Uuid);

impl FurnitureId {
    /// Wrap an existing UUID.
    #[must_use]
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Get the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for FurnitureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for FurnitureId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for FurnitureId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Identity of a cart line.
///
/// Two cart additions with the same configuration share an identity and
/// are merged into a single line. See [`crate::FurnitureConfig::id`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(String);

impl CartItemId {
    /// Create an identity from a raw string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identity as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CartItemId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// Customer-facing order reference, e.g. `WD482913`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Prefix shared by every order reference.
    pub const PREFIX: &'static str = "WD";

    /// Derive an order reference from the last six digits of the
    /// millisecond timestamp.
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        let millis = at.timestamp_millis().unsigned_abs() % 1_000_000;
        Self(format!("{}{millis:06}", Self::PREFIX))
    }

    /// Returns the reference as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_id_uses_last_six_digits() {
        let at = DateTime::from_timestamp_millis(1_700_000_123_456).unwrap();
        assert_eq!(OrderId::from_timestamp(at).as_str(), "WD123456");
    }

    #[test]
    fn test_order_id_is_zero_padded() {
        let at = DateTime::from_timestamp_millis(1_700_000_000_042).unwrap();
        assert_eq!(OrderId::from_timestamp(at).as_str(), "WD000042");
    }

    #[test]
    fn test_furniture_id_parse_roundtrip() {
        let id = FurnitureId::generate();
        let parsed: FurnitureId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_furniture_id_rejects_garbage() {
        assert!("not-a-uuid".parse::<FurnitureId>().is_err());
    }
}
