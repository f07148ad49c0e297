//! Shipping box selection for physical items.
//!
//! Picks the smallest standard box that holds a whole item set, or splits
//! the set across several boxes using a cross-section heuristic for long
//! items. Both entry points take the box catalog explicitly.

pub mod catalog;
pub mod error;
pub mod orientation;
pub mod packer;
pub mod selector;
pub mod types;

pub use error::PackError;
pub use packer::{PackStrategy, Packer};
pub use types::{Item, MultiBoxPackingResult, PackingResult, Shipment, ShippingBox};

/// Smallest single box for the whole set, or every item reported unfit.
pub fn select_best_box(items: &[Item], catalog: &[ShippingBox]) -> Result<PackingResult, PackError> {
    Ok(Packer::new(catalog)?.select_best_box(items))
}

/// Splits the set across as many boxes as needed.
pub fn pack_multi_box(
    items: &[Item],
    catalog: &[ShippingBox],
) -> Result<MultiBoxPackingResult, PackError> {
    Ok(Packer::new(catalog)?.pack(items))
}
