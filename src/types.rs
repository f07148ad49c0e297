use serde::{Deserialize, Deserializer, Serialize};

use crate::error::PackError;

/// One shippable unit type. Dimensions in millimetres, weight in grams per unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
    #[serde(
        default = "default_quantity",
        deserialize_with = "deserialize_u32_from_number"
    )]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl Item {
    pub fn new(name: &str, length: f64, width: f64, height: f64, weight: f64, quantity: u32) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            length,
            width,
            height,
            weight,
            quantity,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    /// Catalog id when present, otherwise the display name.
    pub fn identity_key(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.name)
    }

    pub fn unit_volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    pub fn volume(&self) -> f64 {
        self.unit_volume() * self.quantity as f64
    }

    pub fn total_weight(&self) -> f64 {
        self.weight * self.quantity as f64
    }

    /// Dimensions sorted longest first.
    pub fn sorted_dims(&self) -> [f64; 3] {
        sort_desc([self.length, self.width, self.height])
    }

    /// Equal length, width and height. Weight and identity are ignored.
    pub fn same_shape(&self, other: &Item) -> bool {
        self.length == other.length && self.width == other.width && self.height == other.height
    }

    pub fn with_quantity(&self, quantity: u32) -> Self {
        Self {
            quantity,
            ..self.clone()
        }
    }

    /// Fits inside `container` as given, without rotation.
    pub fn fits_in(&self, container: &ShippingBox) -> bool {
        self.length <= container.length
            && self.width <= container.width
            && self.height <= container.height
    }

    pub fn validate(&self) -> Result<(), PackError> {
        let invalid = |reason: &str| PackError::InvalidItem {
            name: self.name.clone(),
            reason: reason.to_string(),
        };
        for (label, v) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(invalid(&format!("{label} must be positive")));
            }
        }
        if !self.weight.is_finite() || self.weight <= 0.0 {
            return Err(invalid("weight must be positive"));
        }
        if self.quantity == 0 {
            return Err(invalid("quantity must be non-zero"));
        }
        if self.quantity > MAX_QUANTITY {
            return Err(invalid(&format!("quantity must be at most {MAX_QUANTITY}")));
        }
        Ok(())
    }
}

/// Upper bound on units per request. The greedy packer materialises one
/// record per unit.
pub const MAX_QUANTITY: u32 = 100_000;

/// Validates every record and caps the total unit count at `MAX_QUANTITY`.
pub fn validate_items(items: &[Item]) -> Result<(), PackError> {
    items.iter().try_for_each(Item::validate)?;
    let total = total_quantity(items);
    if total > MAX_QUANTITY as u64 {
        return Err(PackError::InvalidItem {
            name: format!("{} items", items.len()),
            reason: format!("total quantity {total} exceeds {MAX_QUANTITY}"),
        });
    }
    Ok(())
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {}x{}x{} {}g x{}",
            self.name, self.length, self.width, self.height, self.weight, self.quantity
        )
    }
}

/// A standard container. Its axes are fixed: a box is never re-oriented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShippingBox {
    pub id: String,
    pub name: String,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub max_weight: f64,
}

impl ShippingBox {
    pub fn new(id: &str, name: &str, length: f64, width: f64, height: f64, max_weight: f64) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            length,
            width,
            height,
            max_weight,
        }
    }

    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    pub fn sorted_dims(&self) -> [f64; 3] {
        sort_desc([self.length, self.width, self.height])
    }

    /// Ordering used for "smallest box": volume, then length.
    pub fn size_cmp(&self, other: &ShippingBox) -> std::cmp::Ordering {
        self.volume()
            .total_cmp(&other.volume())
            .then(self.length.total_cmp(&other.length))
    }

    pub fn validate(&self) -> Result<(), PackError> {
        for (label, v) in [
            ("length", self.length),
            ("width", self.width),
            ("height", self.height),
            ("maxWeight", self.max_weight),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(PackError::InvalidBox {
                    name: self.name.clone(),
                    reason: format!("{label} must be positive"),
                });
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for ShippingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({}x{}x{}, max {}g)",
            self.name, self.length, self.width, self.height, self.max_weight
        )
    }
}

fn sort_desc(mut dims: [f64; 3]) -> [f64; 3] {
    dims.sort_by(|a, b| b.total_cmp(a));
    dims
}

/// Outcome of a single-box selection.
///
/// `success` is true exactly when `container` is set; on success
/// `unfit_items` is empty, on failure `packed_items` is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingResult {
    pub success: bool,
    #[serde(rename = "box")]
    pub container: Option<ShippingBox>,
    pub packed_items: Vec<Item>,
    pub unfit_items: Vec<Item>,
}

impl PackingResult {
    pub fn fitted(container: ShippingBox, items: &[Item]) -> Self {
        Self {
            success: true,
            container: Some(container),
            packed_items: items.to_vec(),
            unfit_items: vec![],
        }
    }

    pub fn unfitted(items: &[Item]) -> Self {
        Self {
            success: false,
            container: None,
            packed_items: vec![],
            unfit_items: items.to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    #[serde(rename = "box")]
    pub container: ShippingBox,
    pub packed_items: Vec<Item>,
}

impl Shipment {
    pub fn quantity(&self) -> u64 {
        total_quantity(&self.packed_items)
    }

    pub fn weight(&self) -> f64 {
        self.packed_items.iter().map(Item::total_weight).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiBoxPackingResult {
    pub success: bool,
    pub shipments: Vec<Shipment>,
    pub unfit_items: Vec<Item>,
}

impl MultiBoxPackingResult {
    pub fn new(shipments: Vec<Shipment>, unfit_items: Vec<Item>) -> Self {
        Self {
            success: unfit_items.is_empty(),
            shipments,
            unfit_items,
        }
    }

    pub fn shipment_count(&self) -> usize {
        self.shipments.len()
    }

    pub fn packed_quantity(&self) -> u64 {
        self.shipments.iter().map(Shipment::quantity).sum()
    }

    pub fn unfit_quantity(&self) -> u64 {
        total_quantity(&self.unfit_items)
    }
}

pub fn total_quantity(items: &[Item]) -> u64 {
    items.iter().map(|i| i.quantity as u64).sum()
}

/// Accepts any integral JSON number (`3` or `3.0`) for a `u32` field.
pub fn deserialize_u32_from_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let n = f64::deserialize(deserializer)?;
    if n.fract() != 0.0 || n < 0.0 || n > u32::MAX as f64 {
        return Err(serde::de::Error::custom(format!(
            "expected a non-negative whole number, got {n}"
        )));
    }
    Ok(n as u32)
}
