use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::PackError;
use crate::orientation::{OrientationSearch, cross_section_fit_with};
use crate::selector;
use crate::types::{Item, MultiBoxPackingResult, PackingResult, Shipment, ShippingBox, total_quantity};

/// Multi-box packing strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PackStrategy {
    /// Longest units first, each into the earliest opened box with room.
    /// Identical item sets take the fixed-capacity fast path.
    #[default]
    GreedyLongestFirst,
}

pub struct Packer<'a> {
    catalog: &'a [ShippingBox],
    orientation: OrientationSearch,
    strategy: PackStrategy,
}

/// One opened box in the greedy loop.
///
/// The cross-section capacity is fixed by the unit that opened it and is
/// not re-checked against later units of other shapes.
struct Arrangement<'a> {
    container: &'a ShippingBox,
    packed: Vec<Item>,
    max_cross_section_items: u64,
    current_cross_section_items: u64,
    remaining_weight: f64,
}

impl<'a> Arrangement<'a> {
    fn open(container: &'a ShippingBox, max_units: u64, unit: Item) -> Self {
        Self {
            container,
            remaining_weight: container.max_weight - unit.weight,
            packed: vec![unit],
            max_cross_section_items: max_units,
            current_cross_section_items: 1,
        }
    }

    fn accepts(&self, unit: &Item) -> bool {
        self.current_cross_section_items < self.max_cross_section_items
            && self.remaining_weight >= unit.weight
    }

    fn place(&mut self, unit: Item) {
        self.current_cross_section_items += 1;
        self.remaining_weight -= unit.weight;
        self.packed.push(unit);
    }

    fn into_shipment(self) -> Shipment {
        Shipment {
            container: self.container.clone(),
            packed_items: consolidate(self.packed),
        }
    }
}

impl<'a> Packer<'a> {
    /// Fails on an empty catalog: nothing downstream is defined without a box.
    pub fn new(catalog: &'a [ShippingBox]) -> Result<Self, PackError> {
        if catalog.is_empty() {
            return Err(PackError::EmptyCatalog);
        }
        Ok(Self {
            catalog,
            orientation: OrientationSearch::default(),
            strategy: PackStrategy::default(),
        })
    }

    pub fn with_orientation(mut self, orientation: OrientationSearch) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_strategy(mut self, strategy: PackStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn select_best_box(&self, items: &[Item]) -> PackingResult {
        let result = selector::select_box(items, self.catalog);
        info!(
            success = result.success,
            box_id = result.container.as_ref().map(|b| b.id.as_str()),
            "single box selection"
        );
        result
    }

    /// Packs `items` into as many boxes as needed.
    pub fn pack(&self, items: &[Item]) -> MultiBoxPackingResult {
        let result = match self.strategy {
            PackStrategy::GreedyLongestFirst => {
                if all_same_shape(items) {
                    self.pack_identical(items)
                } else {
                    self.pack_general(items)
                }
            }
        };

        info!(
            strategy = ?self.strategy,
            shipments = result.shipment_count(),
            packed = result.packed_quantity(),
            unfit = result.unfit_quantity(),
            "multi box packing"
        );
        if !result.success {
            warn!(
                unfit = result.unfit_quantity(),
                "some items fit no catalog box"
            );
        }
        result
    }

    /// Fast path for records that all share one shape.
    ///
    /// Per-box capacity is computed once from the first record, including its
    /// weight, and the total quantity is split into full boxes plus one
    /// partial box. Records are drawn in input order so every shipment keeps
    /// the identity of the units it holds.
    pub fn pack_identical(&self, items: &[Item]) -> MultiBoxPackingResult {
        let Some(reference) = items.first() else {
            return MultiBoxPackingResult::new(vec![], vec![]);
        };

        let Some((container, capacity)) = self.best_capacity_box(reference) else {
            debug!(item = %reference, "no box holds a single unit");
            return MultiBoxPackingResult::new(vec![], items.to_vec());
        };

        let total = total_quantity(items);
        debug!(
            box_id = %container.id,
            capacity,
            boxes = total.div_ceil(capacity),
            "identical items"
        );

        let mut records: VecDeque<Item> = items.iter().cloned().collect();
        let mut remaining = total;
        let mut shipments = Vec::new();
        while remaining > 0 {
            let units = capacity.min(remaining);
            shipments.push(Shipment {
                container: container.clone(),
                packed_items: consolidate(take_units(&mut records, units)),
            });
            remaining -= units;
        }

        MultiBoxPackingResult::new(shipments, vec![])
    }

    /// Greedy packing for mixed shapes, one unit at a time.
    pub fn pack_general(&self, items: &[Item]) -> MultiBoxPackingResult {
        let units = expand_items(items);
        let mut arrangements: Vec<Arrangement> = Vec::new();
        let mut unpackable = Vec::new();

        for unit in units {
            if let Some(open) = arrangements.iter_mut().find(|a| a.accepts(&unit)) {
                open.place(unit);
                continue;
            }

            match self.best_box_for(&unit) {
                Some((container, max_units)) => {
                    debug!(
                        box_id = %container.id,
                        max_units,
                        item = %unit.name,
                        "opened box"
                    );
                    arrangements.push(Arrangement::open(container, max_units, unit));
                }
                None => {
                    debug!(item = %unit.name, "unit fits no box");
                    unpackable.push(unit);
                }
            }
        }

        let shipments = arrangements
            .into_iter()
            .map(Arrangement::into_shipment)
            .collect();
        MultiBoxPackingResult::new(shipments, consolidate(unpackable))
    }

    /// Box with the highest effective capacity for `reference`; smaller
    /// volume wins ties. `None` when no box holds even one unit.
    fn best_capacity_box(&self, reference: &Item) -> Option<(&'a ShippingBox, u64)> {
        let mut best: Option<(&ShippingBox, u64)> = None;
        for container in self.catalog {
            let space = cross_section_fit_with(reference, container, self.orientation).max_units;
            let capacity = space.min(weight_capacity(container, reference.weight));
            let better = match best {
                None => true,
                Some((b, cap)) => {
                    capacity > cap || (capacity == cap && container.volume() < b.volume())
                }
            };
            if better {
                best = Some((container, capacity));
            }
        }
        best.filter(|&(_, capacity)| capacity > 0)
    }

    /// Box to open for `unit`: most cross-section slots, then smaller volume.
    fn best_box_for(&self, unit: &Item) -> Option<(&'a ShippingBox, u64)> {
        let mut best: Option<(&ShippingBox, u64)> = None;
        for container in self.catalog {
            if unit.weight > container.max_weight {
                continue;
            }
            let fit = cross_section_fit_with(unit, container, self.orientation);
            if !fit.fits() {
                continue;
            }
            let better = match best {
                None => true,
                Some((b, units)) => {
                    fit.max_units > units
                        || (fit.max_units == units && container.volume() < b.volume())
                }
            };
            if better {
                best = Some((container, fit.max_units));
            }
        }
        best
    }
}

fn all_same_shape(items: &[Item]) -> bool {
    match items.split_first() {
        Some((first, rest)) => rest.iter().all(|item| item.same_shape(first)),
        None => false,
    }
}

/// Units a box can carry by weight. A non-positive unit weight places no limit.
fn weight_capacity(container: &ShippingBox, unit_weight: f64) -> u64 {
    if unit_weight <= 0.0 || !unit_weight.is_finite() {
        return u64::MAX;
    }
    (container.max_weight / unit_weight).floor() as u64
}

/// One quantity-1 record per unit, longest first, then largest volume.
/// The sort is stable so equal units keep their input order.
fn expand_items(items: &[Item]) -> Vec<Item> {
    let mut units = Vec::new();
    for item in items {
        for _ in 0..item.quantity {
            units.push(item.with_quantity(1));
        }
    }
    units.sort_by(|a, b| {
        b.length
            .total_cmp(&a.length)
            .then(b.unit_volume().total_cmp(&a.unit_volume()))
    });
    units
}

/// Removes `units` units from the front of `records`, splitting a record
/// when only part of it is needed.
fn take_units(records: &mut VecDeque<Item>, mut units: u64) -> Vec<Item> {
    let mut taken = Vec::new();
    while units > 0 {
        let Some(front) = records.front_mut() else {
            break;
        };
        if front.quantity == 0 {
            records.pop_front();
            continue;
        }
        let n = units.min(front.quantity as u64) as u32;
        taken.push(front.with_quantity(n));
        front.quantity -= n;
        units -= n as u64;
        if front.quantity == 0 {
            records.pop_front();
        }
    }
    taken
}

/// Merges records sharing an identity key, keeping first-seen order.
/// A merge that would overflow `u32` starts a second record for the key.
fn consolidate(units: Vec<Item>) -> Vec<Item> {
    let mut merged: Vec<Item> = Vec::new();
    for unit in units {
        let slot = merged.iter_mut().find(|m| {
            m.identity_key() == unit.identity_key()
                && m.quantity.checked_add(unit.quantity).is_some()
        });
        match slot {
            Some(m) => m.quantity += unit.quantity,
            None => merged.push(unit),
        }
    }
    merged
}
