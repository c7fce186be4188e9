//! Catalog listing status.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Whether a catalog entry is offered to customers.
///
/// Stored as `"Active"`, `"Inactive"` or `"Draft"`. Any other value read
/// from the catalog file is treated as `Inactive` so that unknown states
/// never surface in the storefront.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(from = "String", into = "String")]
pub enum FurnitureStatus {
    #[default]
    Active,
    Inactive,
    Draft,
}

impl FurnitureStatus {
    /// Wire name of the status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::Draft => "Draft",
        }
    }
}

impl From<String> for FurnitureStatus {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "active" => Self::Active,
            "draft" => Self::Draft,
            _ => Self::Inactive,
        }
    }
}

impl From<FurnitureStatus> for String {
    fn from(status: FurnitureStatus) -> Self {
        status.as_str().to_owned()
    }
}

impl fmt::Display for FurnitureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for FurnitureStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_owned()))
    }
}
