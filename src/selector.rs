//! Single-box selection: the smallest catalog box that holds a whole item set.

use tracing::debug;

use crate::types::{Item, PackingResult, ShippingBox};

/// Checks the three single-box conditions for every catalog entry and keeps
/// the smallest passing box by `(volume, length)`. The whole catalog is
/// scanned; on equal size the earlier entry wins.
///
/// The volume check is a necessary condition only. It rules out obviously
/// impossible sets but does not prove an arrangement exists.
pub(crate) fn smallest_fitting_box<'a>(items: &[Item], catalog: &'a [ShippingBox]) -> Option<&'a ShippingBox> {
    let total_weight: f64 = items.iter().map(Item::total_weight).sum();
    let total_volume: f64 = items.iter().map(Item::volume).sum();

    let mut best: Option<&ShippingBox> = None;
    for container in catalog {
        if total_weight > container.max_weight {
            continue;
        }
        if !items.iter().all(|item| item.fits_in(container)) {
            continue;
        }
        if total_volume > container.volume() {
            continue;
        }
        if best.is_none_or(|b| container.size_cmp(b).is_lt()) {
            best = Some(container);
        }
    }
    best
}

/// All-or-nothing fit of `items` into one box. Items are never split.
pub(crate) fn select_box(items: &[Item], catalog: &[ShippingBox]) -> PackingResult {
    match smallest_fitting_box(items, catalog) {
        Some(container) => {
            debug!(box_id = %container.id, items = items.len(), "single box selected");
            PackingResult::fitted(container.clone(), items)
        }
        None => {
            debug!(items = items.len(), "no single box holds the item set");
            PackingResult::unfitted(items)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::standard_catalog;

    fn assert_result_valid(result: &PackingResult, input: &[Item]) {
        assert_eq!(result.success, result.container.is_some());
        if result.success {
            assert!(result.unfit_items.is_empty());
            assert_eq!(result.packed_items, input);
        } else {
            assert!(result.packed_items.is_empty());
            assert_eq!(result.unfit_items, input);
        }
    }

    #[test]
    fn test_single_item_smallest_box() {
        let catalog = standard_catalog();
        let items = vec![Item::new("Cube", 150.0, 150.0, 100.0, 1000.0, 1)];
        let result = select_box(&items, &catalog);
        assert_result_valid(&result, &items);
        let chosen = result.container.unwrap();

        // No smaller box passes all three checks.
        for other in &catalog {
            let passes = items[0].fits_in(other)
                && other.max_weight >= 1000.0
                && other.volume() >= items[0].volume();
            if passes {
                assert!(chosen.size_cmp(other).is_le(), "{other} is smaller than {chosen}");
            }
        }
        assert_eq!(chosen.id, "xs");
    }

    #[test]
    fn test_oversized_item_fails() {
        let items = vec![Item::new("Crate", 2000.0, 2000.0, 2000.0, 1000.0, 1)];
        let result = select_box(&items, &standard_catalog());
        assert_result_valid(&result, &items);
        assert!(!result.success);
        assert_eq!(result.unfit_items.len(), 1);
    }

    #[test]
    fn test_weight_rules_out_small_box() {
        let catalog = vec![
            ShippingBox::new("light", "Light", 300.0, 300.0, 300.0, 500.0),
            ShippingBox::new("heavy", "Heavy", 400.0, 400.0, 400.0, 5000.0),
        ];
        let items = vec![Item::new("Block", 100.0, 100.0, 100.0, 300.0, 2)];
        let result = select_box(&items, &catalog);
        assert_eq!(result.container.unwrap().id, "heavy");
    }

    #[test]
    fn test_volume_check_uses_quantity() {
        let catalog = vec![
            ShippingBox::new("small", "Small", 200.0, 200.0, 200.0, 10_000.0),
            ShippingBox::new("big", "Big", 400.0, 400.0, 400.0, 10_000.0),
        ];
        // 9 x 100^3 = 9e6 > 8e6 of the small box.
        let items = vec![Item::new("Block", 100.0, 100.0, 100.0, 10.0, 9)];
        let result = select_box(&items, &catalog);
        assert_eq!(result.container.unwrap().id, "big");
    }

    #[test]
    fn test_items_are_not_rotated() {
        let catalog = vec![ShippingBox::new("flat", "Flat", 400.0, 300.0, 50.0, 10_000.0)];
        let upright = vec![Item::new("Panel", 50.0, 300.0, 400.0, 10.0, 1)];
        assert!(!select_box(&upright, &catalog).success);
        let flat = vec![Item::new("Panel", 400.0, 300.0, 50.0, 10.0, 1)];
        assert!(select_box(&flat, &catalog).success);
    }

    #[test]
    fn test_catalog_order_does_not_matter() {
        let mut catalog = standard_catalog();
        let items = vec![Item::new("Cube", 150.0, 150.0, 100.0, 1000.0, 1)];
        let forward = select_box(&items, &catalog);
        catalog.reverse();
        let backward = select_box(&items, &catalog);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_equal_volume_prefers_shorter_box() {
        let catalog = vec![
            ShippingBox::new("long", "Long", 400.0, 100.0, 100.0, 10_000.0),
            ShippingBox::new("wide", "Wide", 200.0, 200.0, 100.0, 10_000.0),
        ];
        let items = vec![Item::new("Block", 100.0, 100.0, 100.0, 10.0, 1)];
        assert_eq!(select_box(&items, &catalog).container.unwrap().id, "wide");
    }

    #[test]
    fn test_empty_items_get_smallest_box() {
        let catalog = standard_catalog();
        let result = select_box(&[], &catalog);
        assert!(result.success);
        let smallest = catalog.iter().min_by(|a, b| a.size_cmp(b)).unwrap();
        assert_eq!(result.container.as_ref(), Some(smallest));
    }

    #[test]
    fn test_subset_never_needs_larger_box() {
        let catalog = standard_catalog();
        let full = vec![
            Item::new("Cube", 150.0, 150.0, 100.0, 1000.0, 2),
            Item::new("Plate", 200.0, 100.0, 20.0, 400.0, 1),
        ];
        let subset = vec![Item::new("Cube", 150.0, 150.0, 100.0, 1000.0, 1)];
        let big = smallest_fitting_box(&full, &catalog).unwrap();
        let small = smallest_fitting_box(&subset, &catalog).unwrap();
        assert!(small.size_cmp(big).is_le());
    }
}
