//! Furniture catalog entries.
//!
//! The flat-file catalog has accumulated rows written by different tools,
//! so `dimensions` and `model3d` show up either as JSON objects or as
//! JSON-encoded strings, and numbers sometimes arrive as strings. All of
//! that is absorbed here, at deserialization time, by the [`lenient`]
//! field parsers. Everything downstream works with one canonical shape,
//! and serialization always writes structured objects.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::form::{FormError, require};
use crate::{CartItemId, Dimensions, FurnitureConfig, FurnitureId, FurnitureStatus};

/// URLs of the 3D models used by the AR/VR previews.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Model3d {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glb: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usdz: Option<String>,
}

impl Model3d {
    /// Returns `true` if no model URL is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.glb.is_none() && self.usdz.is_none()
    }
}

/// A furniture entry as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FurnitureItem {
    pub id: FurnitureId,
    pub name: String,
    pub category: String,
    pub material: String,
    #[serde(default, deserialize_with = "lenient::dimensions")]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub finish: String,
    #[serde(default)]
    pub color: String,
    /// Price in whole rupees.
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub price: u64,
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub stock: u64,
    #[serde(default)]
    pub status: FurnitureStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient::model3d",
        skip_serializing_if = "Option::is_none"
    )]
    pub model3d: Option<Model3d>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FurnitureItem {
    /// Materialize a new catalog entry with a server-assigned id.
    #[must_use]
    pub fn from_new(new: NewFurniture, id: FurnitureId, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: new.name,
            category: new.category,
            material: new.material,
            dimensions: new.dimensions,
            finish: new.finish,
            color: new.color,
            price: new.price,
            stock: new.stock,
            status: new.status,
            images: new.images,
            description: new.description,
            model3d: new.model3d,
            created_at: now,
            updated_at: now,
        }
    }

    /// The configuration this entry contributes to a cart line.
    #[must_use]
    pub fn config(&self) -> FurnitureConfig {
        FurnitureConfig {
            category: self.category.clone(),
            material: self.material.clone(),
            dimensions: self.dimensions,
            finish: self.finish.clone(),
            color: self.color.clone(),
        }
    }

    /// Identity of the cart line this entry would occupy.
    #[must_use]
    pub fn cart_item_id(&self) -> CartItemId {
        self.config().id()
    }
}

/// Request body for creating a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NewFurniture {
    pub name: String,
    pub category: String,
    pub material: String,
    #[serde(default, deserialize_with = "lenient::dimensions")]
    pub dimensions: Dimensions,
    #[serde(default)]
    pub finish: String,
    #[serde(default)]
    pub color: String,
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub price: u64,
    #[serde(default, deserialize_with = "lenient::whole_number")]
    pub stock: u64,
    #[serde(default)]
    pub status: FurnitureStatus,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(
        default,
        deserialize_with = "lenient::model3d",
        skip_serializing_if = "Option::is_none"
    )]
    pub model3d: Option<Model3d>,
}

impl NewFurniture {
    /// Check the fields the admin form marks as required.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::MissingField`] for the first empty required field.
    pub fn validate(&self) -> Result<(), FormError> {
        require("name", &self.name)?;
        require("category", &self.category)?;
        require("material", &self.material)?;
        Ok(())
    }
}

/// Field deserializers that accept every encoding found in the catalog file.
pub mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::{Map, Value};
    use tracing::warn;

    use crate::{Dimensions, Model3d};

    /// Deserialize dimensions from an object or a JSON-encoded string.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON at all; shape problems
    /// fall back to zero dimensions.
    pub fn dimensions<'de, D>(deserializer: D) -> Result<Dimensions, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(normalize_dimensions(&value))
    }

    /// Deserialize a 3D model reference from an object or a JSON-encoded string.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON at all.
    pub fn model3d<'de, D>(deserializer: D) -> Result<Option<Model3d>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(normalize_model3d(&value))
    }

    /// Deserialize a non-negative whole number from a number or numeric string.
    ///
    /// # Errors
    ///
    /// Only fails if the input is not valid JSON at all.
    pub fn whole_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(coerce_number(&value))
    }

    /// Canonicalize a `dimensions` value. Unusable input yields zeros.
    #[must_use]
    pub fn normalize_dimensions(value: &Value) -> Dimensions {
        match value {
            Value::Object(map) if map.contains_key("width") => dimensions_from_map(map),
            Value::String(raw) => match serde_json::from_str::<Value>(raw) {
                Ok(Value::Object(map)) => dimensions_from_map(&map),
                Ok(_) => Dimensions::default(),
                Err(e) => {
                    warn!(error = %e, raw = %raw, "Failed to parse dimensions string");
                    Dimensions::default()
                }
            },
            Value::Null => Dimensions::default(),
            other => {
                warn!(value = %other, "Unexpected dimensions value");
                Dimensions::default()
            }
        }
    }

    /// Canonicalize a `model3d` value. Unusable or empty input yields `None`.
    #[must_use]
    pub fn normalize_model3d(value: &Value) -> Option<Model3d> {
        let model = match value {
            Value::Object(_) => serde_json::from_value::<Model3d>(value.clone())
                .map_err(|e| warn!(error = %e, "Unexpected model3d object"))
                .ok(),
            Value::String(raw) => serde_json::from_str::<Model3d>(raw)
                .map_err(|e| warn!(error = %e, raw = %raw, "Failed to parse model3d string"))
                .ok(),
            _ => None,
        }?;
        (!model.is_empty()).then_some(model)
    }

    fn dimensions_from_map(map: &Map<String, Value>) -> Dimensions {
        let axis = |key: &str| {
            map.get(key)
                .map_or(0, |v| u32::try_from(coerce_number(v)).unwrap_or(u32::MAX))
        };
        Dimensions::new(axis("width"), axis("height"), axis("depth"))
    }

    /// Numbers and numeric strings become rounded non-negative integers;
    /// everything else becomes zero.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn coerce_number(value: &Value) -> u64 {
        let float = match value {
            Value::Number(n) => {
                if let Some(whole) = n.as_u64() {
                    return whole;
                }
                n.as_f64()
            }
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        match float {
            Some(f) if f.is_finite() && f > 0.0 => f.round() as u64,
            _ => 0,
        }
    }
}
