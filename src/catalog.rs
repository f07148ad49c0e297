//! Standard box catalog and JSON catalog files.
//!
//! A catalog file is a JSON array of boxes:
//!
//! ```json
//! [{ "id": "m", "name": "Medium Box", "length": 400, "width": 300, "height": 200, "maxWeight": 10000 }]
//! ```

use std::path::Path;

use crate::error::PackError;
use crate::types::ShippingBox;

/// The hand-curated sizes quoted by default, from padded satchel to XXL box.
pub fn standard_catalog() -> Vec<ShippingBox> {
    vec![
        ShippingBox::new("satchel", "Padded Satchel", 350.0, 250.0, 40.0, 2_000.0),
        ShippingBox::new("xs", "Extra Small Box", 200.0, 150.0, 100.0, 3_000.0),
        ShippingBox::new("s", "Small Box", 300.0, 200.0, 150.0, 5_000.0),
        ShippingBox::new("m", "Medium Box", 400.0, 300.0, 200.0, 10_000.0),
        ShippingBox::new("l", "Large Box", 600.0, 400.0, 300.0, 20_000.0),
        ShippingBox::new("long-s", "Long Tube", 1_050.0, 120.0, 120.0, 15_000.0),
        ShippingBox::new("long-l", "Long Box", 1_600.0, 200.0, 200.0, 25_000.0),
        ShippingBox::new("xl", "XL Box", 800.0, 600.0, 400.0, 25_000.0),
        ShippingBox::new("xxl", "XXL Box", 1_600.0, 400.0, 400.0, 30_000.0),
    ]
}

/// Parses a catalog from JSON text without validating it.
pub fn parse_catalog(json: &str) -> Result<Vec<ShippingBox>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Loads a catalog file. The catalog must be non-empty and every box must
/// have positive dimensions and weight capacity.
pub fn load_catalog(path: &Path) -> Result<Vec<ShippingBox>, PackError> {
    let contents = std::fs::read_to_string(path).map_err(|e| PackError::CatalogRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let catalog = parse_catalog(&contents).map_err(|e| PackError::CatalogParse {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate_catalog(&catalog)?;
    tracing::info!(path = %path.display(), boxes = catalog.len(), "loaded box catalog");
    Ok(catalog)
}

pub fn validate_catalog(catalog: &[ShippingBox]) -> Result<(), PackError> {
    if catalog.is_empty() {
        return Err(PackError::EmptyCatalog);
    }
    catalog.iter().try_for_each(ShippingBox::validate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_standard_catalog_is_valid() {
        let catalog = standard_catalog();
        assert!(validate_catalog(&catalog).is_ok());
        assert!(catalog.iter().all(|b| b.sorted_dims()[0] <= 1600.0));
    }

    #[test]
    fn test_load_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id":"t","name":"Tube","length":1100,"width":80,"height":100,"maxWeight":20000}}]"#
        )
        .unwrap();
        let catalog = load_catalog(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].max_weight, 20_000.0);
    }

    #[test]
    fn test_load_empty_catalog_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(matches!(
            load_catalog(file.path()),
            Err(PackError::EmptyCatalog)
        ));
    }

    #[test]
    fn test_load_malformed_catalog_fails() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id":"t","name":"Tube"}}]"#).unwrap();
        assert!(matches!(
            load_catalog(file.path()),
            Err(PackError::CatalogParse { .. })
        ));
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("boxes.json");
        assert!(matches!(
            load_catalog(&missing),
            Err(PackError::CatalogRead { .. })
        ));
    }

    #[test]
    fn test_non_positive_box_rejected() {
        let catalog = vec![ShippingBox::new("z", "Zero", 100.0, 0.0, 100.0, 1000.0)];
        assert!(matches!(
            validate_catalog(&catalog),
            Err(PackError::InvalidBox { .. })
        ));
    }
}
