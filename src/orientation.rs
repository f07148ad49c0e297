//! Cross-section fitting of one item shape inside one box shape.
//!
//! Long thin items (extrusions, rails) are bundled side by side along the
//! box's longest axis. The unit count is the number of item end faces that
//! tile the box's cross-section.

use serde::{Deserialize, Serialize};

use crate::types::{Item, ShippingBox};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrientationSearch {
    /// Item's long axis along the box's long axis; the two cross-section
    /// tilings (as is, transposed) are compared.
    #[default]
    LongAxis,
    /// Every one of the six axis permutations.
    AllAxes,
}

/// Item dimensions as laid along the box's length, width and height
/// (box dims sorted longest first).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub along: f64,
    pub across: f64,
    pub up: f64,
    pub transposed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrossSectionFit {
    pub max_units: u64,
    pub orientation: Orientation,
}

impl CrossSectionFit {
    pub fn fits(&self) -> bool {
        self.max_units > 0
    }
}

/// Long-axis cross-section fit.
pub fn cross_section_fit(item: &Item, container: &ShippingBox) -> CrossSectionFit {
    cross_section_fit_with(item, container, OrientationSearch::LongAxis)
}

pub fn cross_section_fit_with(
    item: &Item,
    container: &ShippingBox,
    search: OrientationSearch,
) -> CrossSectionFit {
    let [item_len, item_w, item_h] = item.sorted_dims();
    let [box_len, box_w, box_h] = container.sorted_dims();

    match search {
        OrientationSearch::LongAxis => {
            let upright = Orientation {
                along: item_len,
                across: item_w,
                up: item_h,
                transposed: false,
            };
            if item_len > box_len {
                return CrossSectionFit {
                    max_units: 0,
                    orientation: upright,
                };
            }
            let transposed = Orientation {
                along: item_len,
                across: item_h,
                up: item_w,
                transposed: true,
            };
            best_of([upright, transposed], box_len, box_w, box_h)
        }
        OrientationSearch::AllAxes => {
            let (a, b, c) = (item_len, item_w, item_h);
            let candidates = [
                (a, b, c, false),
                (a, c, b, true),
                (b, a, c, false),
                (b, c, a, true),
                (c, a, b, false),
                (c, b, a, true),
            ]
            .map(|(along, across, up, transposed)| Orientation {
                along,
                across,
                up,
                transposed,
            });
            best_of(candidates, box_len, box_w, box_h)
        }
    }
}

/// Highest tiling count; the first candidate wins ties.
fn best_of<const N: usize>(
    candidates: [Orientation; N],
    box_len: f64,
    box_w: f64,
    box_h: f64,
) -> CrossSectionFit {
    let mut best = CrossSectionFit {
        max_units: 0,
        orientation: candidates[0],
    };
    for orientation in candidates {
        let units = if orientation.along > box_len {
            0
        } else {
            tiles(box_w, orientation.across) * tiles(box_h, orientation.up)
        };
        if units > best.max_units {
            best = CrossSectionFit {
                max_units: units,
                orientation,
            };
        }
    }
    best
}

/// How many `side` lengths fit in `span`. Zero for degenerate sides.
fn tiles(span: f64, side: f64) -> u64 {
    if side <= 0.0 || !side.is_finite() {
        return 0;
    }
    // `as` saturates, so an oversized quotient cannot wrap.
    (span / side).floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rail() -> Item {
        Item::new("Rail", 1000.0, 20.0, 40.0, 1000.0, 1)
    }

    #[test]
    fn test_too_long_does_not_fit() {
        let container = ShippingBox::new("s", "Short", 900.0, 500.0, 500.0, 50_000.0);
        let fit = cross_section_fit(&rail(), &container);
        assert_eq!(fit.max_units, 0);
        assert!(!fit.fits());
    }

    #[test]
    fn test_transposed_tiling_wins() {
        // Sorted box (1100, 100, 80); item cross-section 40x20.
        // As is: (100/40)*(80/20) = 2*4 = 8. Transposed: (100/20)*(80/40) = 5*2 = 10.
        let container = ShippingBox::new("t", "Tube", 1100.0, 80.0, 100.0, 20_000.0);
        let fit = cross_section_fit(&rail(), &container);
        assert_eq!(fit.max_units, 10);
        assert!(fit.orientation.transposed);
        assert_eq!(fit.orientation.along, 1000.0);
    }

    #[test]
    fn test_tie_keeps_first_candidate() {
        let cube = Item::new("Cube", 100.0, 100.0, 100.0, 10.0, 1);
        let container = ShippingBox::new("c", "Cube box", 200.0, 200.0, 200.0, 10_000.0);
        let fit = cross_section_fit(&cube, &container);
        assert_eq!(fit.max_units, 4);
        assert!(!fit.orientation.transposed);
    }

    #[test]
    fn test_box_axes_are_sorted() {
        // Box declared with its long side as height.
        let container = ShippingBox::new("p", "Post", 80.0, 100.0, 1100.0, 20_000.0);
        assert_eq!(cross_section_fit(&rail(), &container).max_units, 10);
    }

    #[test]
    fn test_all_axes_never_worse_than_long_axis() {
        let shapes = [
            (1000.0, 20.0, 40.0),
            (300.0, 300.0, 10.0),
            (400.0, 390.0, 50.0),
            (70.0, 50.0, 50.0),
            (150.0, 150.0, 100.0),
        ];
        let boxes = [
            ShippingBox::new("a", "A", 1100.0, 80.0, 100.0, 20_000.0),
            ShippingBox::new("b", "B", 610.0, 620.0, 305.0, 20_000.0),
            ShippingBox::new("c", "C", 420.0, 400.0, 100.0, 20_000.0),
            ShippingBox::new("d", "D", 100.0, 100.0, 70.0, 20_000.0),
        ];
        for (l, w, h) in shapes {
            let item = Item::new("i", l, w, h, 1.0, 1);
            for container in &boxes {
                let long_axis = cross_section_fit_with(&item, container, OrientationSearch::LongAxis);
                let all_axes = cross_section_fit_with(&item, container, OrientationSearch::AllAxes);
                assert!(
                    all_axes.max_units >= long_axis.max_units,
                    "{item} in {container}: all axes {} < long axis {}",
                    all_axes.max_units,
                    long_axis.max_units
                );
            }
        }
    }

    #[test]
    fn test_all_axes_tie_keeps_long_axis_layout() {
        // Sorted box (620, 610, 305); 300 along, 300x10 face: max(2*30, 61*1) = 61.
        let tile = Item::new("Tile", 300.0, 300.0, 10.0, 50.0, 1);
        let container = ShippingBox::new("b", "Box", 610.0, 620.0, 305.0, 100_000.0);
        let fit = cross_section_fit_with(&tile, &container, OrientationSearch::AllAxes);
        assert_eq!(fit.max_units, 61);
        assert_eq!(fit.orientation.along, 300.0);
        assert!(fit.orientation.transposed);
    }

    #[test]
    fn test_zero_dimension_does_not_panic() {
        let flat = Item::new("Flat", 100.0, 10.0, 0.0, 1.0, 1);
        let container = ShippingBox::new("b", "Box", 200.0, 100.0, 100.0, 1000.0);
        assert_eq!(cross_section_fit(&flat, &container).max_units, 0);
    }
}
