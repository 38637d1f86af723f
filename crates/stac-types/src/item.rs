//! STAC Item document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::collection::{Asset, Link};

/// A STAC Item (GeoJSON Feature) as emitted by this generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "type")]
    pub type_field: String,

    pub stac_version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    pub id: String,
    pub collection: String,

    pub geometry: serde_json::Value,
    pub bbox: [f64; 4],

    pub properties: ItemProperties,

    pub assets: BTreeMap<String, Asset>,

    pub links: Vec<Link>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemProperties {
    pub datetime: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_datetime: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_datetime: Option<DateTime<Utc>>,

    /// Version extension property, carried from the href's version field
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// Convert a `[west, south, east, north]` bbox to a GeoJSON Polygon.
pub fn bbox_to_polygon(bbox: &[f64; 4]) -> serde_json::Value {
    let (west, south, east, north) = (bbox[0], bbox[1], bbox[2], bbox[3]);
    serde_json::json!({
        "type": "Polygon",
        "coordinates": [[
            [west, south],
            [east, south],
            [east, north],
            [west, north],
            [west, south]
        ]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bbox_to_polygon_closes_ring() {
        let poly = bbox_to_polygon(&[-80.0, 30.0, -70.0, 40.0]);
        let ring = poly["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn test_optional_range_fields_omitted_for_instants() {
        let props = ItemProperties {
            datetime: Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap(),
            start_datetime: None,
            end_datetime: None,
            version: Some("v2".to_string()),
        };
        let json = serde_json::to_value(&props).unwrap();
        assert_eq!(json["datetime"], "2000-01-01T00:00:00Z");
        assert!(json.get("start_datetime").is_none());
        assert!(json.get("end_datetime").is_none());
        assert_eq!(json["version"], "v2");
    }
}
