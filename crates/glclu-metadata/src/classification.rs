//! Classification table loading.
//!
//! Tables are delimited text with columns
//! `value, general_class, class, sub_class, color_hint`, one row per
//! discrete raster value. They ship embedded in the crate, so a malformed
//! row is a packaging defect and aborts the whole load.

use csv::ReaderBuilder;
use stac_types::ClassificationClass;
use tracing::warn;

use crate::error::{MetadataError, MetadataResult};

/// Raster value reserved for missing data.
pub const NODATA_VALUE: u8 = 255;

const REQUIRED_COLUMNS: [&str; 5] = ["value", "general_class", "class", "sub_class", "color_hint"];

/// Parse a classification table into ordered class entries.
pub fn load_classes(table: &str) -> MetadataResult<Vec<ClassificationClass>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(table.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| MetadataError::ClassificationTable {
            line: 1,
            message: e.to_string(),
        })?
        .clone();

    let mut columns = [0usize; 5];
    for (slot, name) in columns.iter_mut().zip(REQUIRED_COLUMNS) {
        *slot = headers
            .iter()
            .position(|header| header.trim() == name)
            .ok_or_else(|| MetadataError::ClassificationTable {
                line: 1,
                message: format!("missing required column '{}'", name),
            })?;
    }
    let [value_col, general_col, class_col, sub_col, color_col] = columns;

    let mut classes: Vec<ClassificationClass> = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let line = index + 2;
        let record = record.map_err(|e| MetadataError::ClassificationTable {
            line,
            message: e.to_string(),
        })?;
        let field = |column: usize| record.get(column).unwrap_or("").trim();

        let value: u8 =
            field(value_col)
                .parse()
                .map_err(|_| MetadataError::ClassificationTable {
                    line,
                    message: format!("invalid value '{}'", field(value_col)),
                })?;

        let class = field(class_col);
        let sub_class = field(sub_col);
        let name = slugify(&format!(
            "{}__{}__{}",
            field(general_col),
            class,
            sub_class
        ));
        let description = if sub_class.is_empty() {
            class.to_string()
        } else {
            format!("{} - {}", class, sub_class)
        };

        let color_hint = field(color_col);
        let color_hint = (!color_hint.is_empty()).then(|| color_hint.to_string());

        if classes.iter().any(|c| c.value == value) {
            warn!(value, line, "Duplicate classification value in table");
        }

        classes.push(ClassificationClass {
            value,
            name,
            description,
            nodata: value == NODATA_VALUE,
            color_hint,
        });
    }

    Ok(classes)
}

/// Normalize a label to a lowercase ASCII slug. Runs of anything other
/// than ASCII alphanumerics collapse to a single hyphen.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut last_was_hyphen = false;
    for c in label.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
            last_was_hyphen = false;
        } else if !last_was_hyphen {
            slug.push('-');
            last_was_hyphen = true;
        }
    }
    slug.trim_matches('-').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = "\
value,general_class,class,sub_class,color_hint
0,Terra firma,Desert,,FEFECC
4,Terra firma,Tree cover,dense,1B7E00
255,No data,No data,,
";

    #[test]
    fn test_load_classes() {
        let classes = load_classes(TABLE).unwrap();
        assert_eq!(classes.len(), 3);

        assert_eq!(classes[0].value, 0);
        assert_eq!(classes[0].name, "terra-firma-desert");
        assert_eq!(classes[0].description, "Desert");
        assert!(!classes[0].nodata);
        assert_eq!(classes[0].color_hint.as_deref(), Some("FEFECC"));

        assert_eq!(classes[1].name, "terra-firma-tree-cover-dense");
        assert_eq!(classes[1].description, "Tree cover - dense");

        assert!(classes[2].nodata);
        assert!(classes[2].color_hint.is_none());
    }

    #[test]
    fn test_nodata_only_for_255() {
        let classes = load_classes(TABLE).unwrap();
        for class in &classes {
            assert_eq!(class.nodata, class.value == NODATA_VALUE);
        }
    }

    #[test]
    fn test_invalid_value_is_fatal() {
        let table = "value,general_class,class,sub_class,color_hint\nx,A,B,,\n";
        let err = load_classes(table).unwrap_err();
        match err {
            MetadataError::ClassificationTable { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("invalid value 'x'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_out_of_range_value_is_fatal() {
        let table = "value,general_class,class,sub_class,color_hint\n256,A,B,,\n";
        assert!(load_classes(table).is_err());
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let table = "value,general_class,class,color_hint\n0,A,B,aabbcc\n";
        let err = load_classes(table).unwrap_err();
        assert!(err.to_string().contains("sub_class"));
    }

    #[test]
    fn test_duplicate_values_tolerated() {
        let table = "\
value,general_class,class,sub_class,color_hint
1,A,B,,aabbcc
1,A,C,,ddeeff
";
        let classes = load_classes(table).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[1].description, "C");
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Terra firma__Tree cover__dense"), "terra-firma-tree-cover-dense");
        assert_eq!(slugify("Wetland  (seasonal)"), "wetland-seasonal");
        assert_eq!(slugify("__edge__"), "edge");
    }
}
