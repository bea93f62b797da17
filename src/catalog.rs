// 📱 Catalog - Smartphone records and the JSON document that holds them
// Records keep every field they were loaded with, so a rewrite never drops data

use crate::error::{CatalogError, DocumentError, RecordError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

// ============================================================================
// PHONE IDENTITY
// ============================================================================

/// Unique key of a phone record.
///
/// The integer `1` and the string `"1"` are different identifiers.
/// Integers above `i64::MAX` decode as `Unsigned`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum PhoneId {
    Number(i64),
    Unsigned(u64),
    Text(String),
}

impl fmt::Display for PhoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhoneId::Number(n) => write!(f, "{}", n),
            PhoneId::Unsigned(n) => write!(f, "{}", n),
            PhoneId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for PhoneId {
    fn from(n: i64) -> Self {
        PhoneId::Number(n)
    }
}

impl From<&str> for PhoneId {
    fn from(s: &str) -> Self {
        PhoneId::Text(s.to_string())
    }
}

impl From<String> for PhoneId {
    fn from(s: String) -> Self {
        PhoneId::Text(s)
    }
}

impl From<PhoneId> for Value {
    fn from(id: PhoneId) -> Self {
        match id {
            PhoneId::Number(n) => Value::from(n),
            PhoneId::Unsigned(n) => Value::from(n),
            PhoneId::Text(s) => Value::from(s),
        }
    }
}

// ============================================================================
// PHONE RECORD
// ============================================================================

/// A smartphone record.
///
/// The consumed fields are decoded up front; the full JSON object is kept
/// alongside them and is what gets serialized back, in its original key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Phone {
    id: PhoneId,
    name: String,
    brand: String,
    price: f64,
    categories: Vec<String>,
    fields: Map<String, Value>,
}

impl Phone {
    /// Create a record with the required fields and no categories
    pub fn new(
        id: impl Into<PhoneId>,
        name: impl Into<String>,
        brand: impl Into<String>,
        price: i64,
    ) -> Self {
        let id = id.into();
        let name = name.into();
        let brand = brand.into();

        let mut fields = Map::new();
        fields.insert("id".to_string(), Value::from(id.clone()));
        fields.insert("name".to_string(), Value::from(name.clone()));
        fields.insert("brand".to_string(), Value::from(brand.clone()));
        fields.insert("price".to_string(), Value::from(price));

        Phone {
            id,
            name,
            brand,
            price: price as f64,
            categories: Vec::new(),
            fields,
        }
    }

    /// Builder pattern: set category tags
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = categories.into_iter().map(Into::into).collect();
        self.fields.insert(
            "categories".to_string(),
            Value::from(self.categories.clone()),
        );
        self
    }

    /// Builder pattern: attach a field the catalog carries but never reads
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if !matches!(
            key.as_str(),
            "id" | "name" | "brand" | "price" | "categories"
        ) {
            self.fields.insert(key, value);
        }
        self
    }

    pub fn id(&self) -> &PhoneId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    /// Category tags; empty when the record has none
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Raw field lookup, including fields that are not decoded
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }
}

fn required_str(fields: &Map<String, Value>, field: &'static str) -> Result<String, RecordError> {
    match fields.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(RecordError::InvalidField {
            field,
            expected: "a string",
        }),
        None => Err(RecordError::MissingField(field)),
    }
}

impl TryFrom<Map<String, Value>> for Phone {
    type Error = RecordError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = match fields.get("id") {
            Some(Value::Number(n)) => {
                if let Some(id) = n.as_i64() {
                    PhoneId::Number(id)
                } else if let Some(id) = n.as_u64() {
                    PhoneId::Unsigned(id)
                } else if n.is_f64() {
                    return Err(RecordError::InvalidField {
                        field: "id",
                        expected: "an integer or a string",
                    });
                } else {
                    return Err(RecordError::OutOfRange {
                        field: "id",
                        range: "a 64-bit integer",
                    });
                }
            }
            Some(Value::String(s)) => PhoneId::Text(s.clone()),
            Some(_) => {
                return Err(RecordError::InvalidField {
                    field: "id",
                    expected: "an integer or a string",
                })
            }
            None => return Err(RecordError::MissingField("id")),
        };

        let name = required_str(&fields, "name")?;
        let brand = required_str(&fields, "brand")?;

        let price = match fields.get("price") {
            Some(Value::Number(n)) => n.as_f64().ok_or(RecordError::InvalidField {
                field: "price",
                expected: "a number",
            })?,
            Some(_) => {
                return Err(RecordError::InvalidField {
                    field: "price",
                    expected: "a number",
                })
            }
            None => return Err(RecordError::MissingField("price")),
        };

        // Absent and null both mean "no categories"
        let categories = match fields.get("categories") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or(RecordError::InvalidField {
                            field: "categories",
                            expected: "an array of strings",
                        })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => {
                return Err(RecordError::InvalidField {
                    field: "categories",
                    expected: "an array of strings",
                })
            }
        };

        Ok(Phone {
            id,
            name,
            brand,
            price,
            categories,
            fields,
        })
    }
}

impl From<Phone> for Map<String, Value> {
    fn from(phone: Phone) -> Self {
        phone.fields
    }
}

// ============================================================================
// CATALOG DOCUMENT
// ============================================================================

/// Top-level key holding the phone records
const SMARTPHONES: &str = "smartphones";

/// The canonical document: `{"smartphones": [...]}` plus any other top-level fields.
///
/// The whole top-level object is kept so other keys keep their values and
/// their position relative to `smartphones` when the catalog is rewritten.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "Map<String, Value>")]
pub struct Catalog {
    pub smartphones: Vec<Phone>,

    // `smartphones` stays in here as a placeholder to hold its position
    fields: Map<String, Value>,
}

impl TryFrom<Map<String, Value>> for Catalog {
    type Error = DocumentError;

    fn try_from(mut fields: Map<String, Value>) -> Result<Self, Self::Error> {
        let items = match fields.get_mut(SMARTPHONES).map(Value::take) {
            Some(Value::Array(items)) => items,
            Some(_) => return Err(DocumentError::SmartphonesNotArray),
            None => return Err(DocumentError::MissingSmartphones),
        };

        let smartphones = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                let record = match item {
                    Value::Object(record) => Phone::try_from(record),
                    _ => Err(RecordError::NotAnObject),
                };
                record.map_err(|source| DocumentError::InvalidPhone { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Catalog {
            smartphones,
            fields,
        })
    }
}

impl From<Catalog> for Map<String, Value> {
    fn from(catalog: Catalog) -> Self {
        let mut fields = catalog.fields;
        let phones = catalog
            .smartphones
            .into_iter()
            .map(|phone| Value::Object(phone.into()))
            .collect();

        // Existing keys keep their position on insert
        fields.insert(SMARTPHONES.to_string(), Value::Array(phones));
        fields
    }
}

impl Catalog {
    pub fn new(smartphones: Vec<Phone>) -> Self {
        let mut fields = Map::new();
        fields.insert(SMARTPHONES.to_string(), Value::Null);

        Catalog {
            smartphones,
            fields,
        }
    }

    /// Builder pattern: set a top-level field other than `smartphones`
    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        let key = key.into();
        if key != SMARTPHONES {
            self.fields.insert(key, value);
        }
        self
    }

    /// Top-level field lookup; `smartphones` is only reachable as a typed list
    pub fn field(&self, key: &str) -> Option<&Value> {
        if key == SMARTPHONES {
            return None;
        }
        self.fields.get(key)
    }

    /// Load the catalog from disk. A missing file is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = read_optional(path)?.ok_or_else(|| CatalogError::NotFound {
            path: path.to_path_buf(),
        })?;

        serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Rewrite the whole catalog: 2-space indent, non-ASCII left unescaped.
    ///
    /// The document goes to a sibling temp file first and is renamed over
    /// `path`, so readers see either the old or the new catalog.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), CatalogError> {
        let path = path.as_ref();
        let bytes = serde_json::to_vec_pretty(self).map_err(|source| CatalogError::Encode {
            path: path.to_path_buf(),
            source,
        })?;

        write_atomic(path, &bytes).map_err(|source| CatalogError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn len(&self) -> usize {
        self.smartphones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.smartphones.is_empty()
    }

    /// Identifiers currently in the catalog
    pub fn ids(&self) -> HashSet<PhoneId> {
        self.smartphones.iter().map(|p| p.id().clone()).collect()
    }
}

/// Load a candidate file: a bare JSON array of phones.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_candidates<P: AsRef<Path>>(path: P) -> Result<Option<Vec<Phone>>, CatalogError> {
    let path = path.as_ref();
    let content = match read_optional(path)? {
        Some(content) => content,
        None => return Ok(None),
    };

    let phones = serde_json::from_str(&content).map_err(|source| CatalogError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(Some(phones))
}

fn read_optional(path: &Path) -> Result<Option<String>, CatalogError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;

    let mut tmp = dir;
    tmp.push(format!(
        ".{}.{}.tmp",
        file_name.to_string_lossy(),
        std::process::id()
    ));

    let result = (|| -> io::Result<()> {
        let mut f = File::create(&tmp)?;
        f.write_all(data)?;
        f.sync_all()?;
        drop(f);
        fs::rename(&tmp, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }

    result
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integer_and_string_ids_are_distinct() {
        let phones: Vec<Phone> = serde_json::from_value(json!([
            {"id": 1, "name": "One", "brand": "A", "price": 100},
            {"id": "1", "name": "One again", "brand": "A", "price": 100}
        ]))
        .unwrap();

        assert_eq!(phones[0].id(), &PhoneId::Number(1));
        assert_eq!(phones[1].id(), &PhoneId::Text("1".to_string()));
        assert_ne!(phones[0].id(), phones[1].id());
    }

    #[test]
    fn test_categories_absent_or_null_is_empty() {
        let phones: Vec<Phone> = serde_json::from_value(json!([
            {"id": 1, "name": "A1", "brand": "A", "price": 1},
            {"id": 2, "name": "A2", "brand": "A", "price": 1, "categories": null},
            {"id": 3, "name": "A3", "brand": "A", "price": 1, "categories": ["gaming", "camera"]}
        ]))
        .unwrap();

        assert!(phones[0].categories().is_empty());
        assert!(phones[1].categories().is_empty());
        assert_eq!(phones[2].categories(), ["gaming", "camera"]);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        let result: Result<Phone, _> =
            serde_json::from_value(json!({"name": "No Id", "brand": "A", "price": 1}));

        let err = result.unwrap_err().to_string();
        assert!(err.contains("missing required field `id`"), "{}", err);
    }

    #[test]
    fn test_wrong_price_type_is_rejected() {
        let result: Result<Phone, _> =
            serde_json::from_value(json!({"id": 1, "name": "X", "brand": "A", "price": "cheap"}));

        let err = result.unwrap_err().to_string();
        assert!(err.contains("`price` must be a number"), "{}", err);
    }

    #[test]
    fn test_unknown_fields_survive_round_trip_in_order() {
        let source = r#"{"specs":{"ram":"8GB"},"id":7,"image":"x.png","name":"Seven","brand":"B","price":2999000}"#;
        let phone: Phone = serde_json::from_str(source).unwrap();

        assert_eq!(phone.field("image"), Some(&json!("x.png")));
        assert_eq!(serde_json::to_string(&phone).unwrap(), source);
    }

    #[test]
    fn test_ids_above_i64_decode_as_unsigned() {
        let phone: Phone = serde_json::from_str(
            r#"{"id": 18446744073709551615, "name": "Max", "brand": "A", "price": 1}"#,
        )
        .unwrap();

        assert_eq!(phone.id(), &PhoneId::Unsigned(u64::MAX));
        assert_eq!(phone.id().to_string(), "18446744073709551615");
    }

    #[test]
    fn test_id_beyond_u64_is_out_of_range() {
        let result: Result<Phone, _> = serde_json::from_str(
            r#"{"id": 123456789012345678901234, "name": "Huge", "brand": "A", "price": 1}"#,
        );

        let err = result.unwrap_err().to_string();
        assert!(err.contains("`id` is out of range"), "{}", err);
    }

    #[test]
    fn test_fractional_id_is_rejected() {
        let result: Result<Phone, _> =
            serde_json::from_str(r#"{"id": 1.5, "name": "Half", "brand": "A", "price": 1}"#);

        let err = result.unwrap_err().to_string();
        assert!(err.contains("`id` must be an integer or a string"), "{}", err);
    }

    #[test]
    fn test_catalog_shape_errors_name_the_problem() {
        let missing: Result<Catalog, _> = serde_json::from_str(r#"{"phones": []}"#);
        assert!(missing
            .unwrap_err()
            .to_string()
            .contains("missing the `smartphones` field"));

        let not_array: Result<Catalog, _> = serde_json::from_str(r#"{"smartphones": {}}"#);
        assert!(not_array
            .unwrap_err()
            .to_string()
            .contains("`smartphones` must be an array"));

        let bad_record: Result<Catalog, _> = serde_json::from_str(
            r#"{"smartphones": [{"id": 1, "name": "Ok", "brand": "A", "price": 1}, {"name": "No Id"}]}"#,
        );
        let err = bad_record.unwrap_err().to_string();
        assert!(err.contains("smartphones[1]"), "{}", err);
        assert!(err.contains("missing required field `id`"), "{}", err);
    }

    #[test]
    fn test_rewrite_keeps_top_level_order_and_big_integers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartphones.json");
        fs::write(
            &path,
            r#"{"meta":1,"smartphones":[{"id":1,"name":"A One","brand":"A","price":1500000,"barcode":123456789012345678901234}],"source":"toko"}"#,
        )
        .unwrap();

        let catalog = Catalog::load(&path).unwrap();
        assert_eq!(catalog.field("meta"), Some(&json!(1)));
        assert_eq!(catalog.field("smartphones"), None);
        catalog.save(&path).unwrap();

        let expected = "{\n  \"meta\": 1,\n  \"smartphones\": [\n    {\n      \"id\": 1,\n      \"name\": \"A One\",\n      \"brand\": \"A\",\n      \"price\": 1500000,\n      \"barcode\": 123456789012345678901234\n    }\n  ],\n  \"source\": \"toko\"\n}";
        assert_eq!(fs::read_to_string(&path).unwrap(), expected);
    }

    #[test]
    fn test_builder_sets_categories() {
        let phone = Phone::new(3, "Three", "A", 3_500_000)
            .with_categories(["gaming"])
            .with_field("image", json!("three.png"));

        assert_eq!(phone.categories(), ["gaming"]);
        assert_eq!(phone.price(), 3_500_000.0);
        assert_eq!(
            serde_json::to_value(&phone).unwrap(),
            json!({
                "id": 3,
                "name": "Three",
                "brand": "A",
                "price": 3500000,
                "categories": ["gaming"],
                "image": "three.png"
            })
        );
    }

    #[test]
    fn test_load_missing_catalog_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = Catalog::load(dir.path().join("smartphones.json")).unwrap_err();

        assert!(matches!(err, CatalogError::NotFound { .. }));
    }

    #[test]
    fn test_load_malformed_catalog_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartphones.json");
        fs::write(&path, "{\"smartphones\": [").unwrap();

        let err = Catalog::load(&path).unwrap_err();
        assert!(matches!(err, CatalogError::Parse { .. }));
    }

    #[test]
    fn test_load_candidates_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load_candidates(dir.path().join("new_smartphones.json")).unwrap();

        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_keeps_non_ascii_and_two_space_indent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartphones.json");

        let catalog = Catalog::new(vec![Phone::new(1, "Redmi Note 13 – Ünique", "Xiaomi", 2_499_000)])
            .with_field("updated", json!("2024-05-01"));
        catalog.save(&path).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("Redmi Note 13 – Ünique"));
        assert!(written.starts_with("{\n  \"smartphones\": [\n    {\n      \"id\": 1,"));

        let reloaded = Catalog::load(&path).unwrap();
        assert_eq!(reloaded, catalog);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("smartphones.json");
        fs::write(&path, "old").unwrap();

        Catalog::new(vec![Phone::new(1, "One", "A", 1)]).save(&path).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_ne!(fs::read_to_string(&path).unwrap(), "old");
    }
}
