use std::fs;
use tempfile::TempDir;

use foodrag_core::dataset::load_foods;
use foodrag_core::enrich::{enrich_all, FieldSet};
use foodrag_core::fingerprint::dataset_fingerprint;
use foodrag_core::Error;

const FOODS: &str = r#"[
  {"id": "1", "text": "Biryani is a rice dish.", "region": "South Asia", "type": "main course"},
  {"id": "2", "text": "Rasmalai is a dessert of soft paneer discs in saffron milk.",
   "region": "East India", "type": "dessert", "dietary": ["vegetarian", "gluten-free"],
   "nutritional_highlights": "calcium and protein"}
]"#;

#[test]
fn load_foods_reads_json_array_from_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("foods.json");
    fs::write(&path, FOODS).unwrap();

    let records = load_foods(&path).expect("load");

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, "1");
    assert_eq!(records[1].nutritional_highlights.as_deref(), Some("calcium and protein"));
}

#[test]
fn missing_file_is_a_dataset_error_naming_the_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nope.json");

    let err = load_foods(&path).expect_err("missing file");

    assert!(matches!(err, Error::Dataset(_)));
    assert!(err.to_string().contains("nope.json"));
}

#[test]
fn malformed_file_is_a_dataset_error() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("foods.json");
    fs::write(&path, "{\"id\": \"1\"").unwrap();

    assert!(matches!(load_foods(&path), Err(Error::Dataset(_))));
}

#[test]
fn enrichment_of_reloaded_dataset_is_byte_identical() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("foods.json");
    fs::write(&path, FOODS).unwrap();

    let first = enrich_all(&load_foods(&path).unwrap(), &FieldSet::full());
    let second = enrich_all(&load_foods(&path).unwrap(), &FieldSet::full());

    assert_eq!(first, second);
    assert_eq!(dataset_fingerprint(&first), dataset_fingerprint(&second));
    assert_eq!(
        first[0].text,
        "Biryani is a rice dish. This food is popular in South Asia. It is a type of main course."
    );
}
