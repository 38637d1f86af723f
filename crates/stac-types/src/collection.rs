//! STAC Collection document model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{ClassificationClass, MediaType};

/// A STAC Collection as emitted by this generator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collection {
    #[serde(rename = "type")]
    pub type_field: String,

    pub stac_version: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stac_extensions: Vec<String>,

    pub id: String,
    pub title: String,
    pub description: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,

    pub license: String,
    pub extent: Extent,

    /// Scientific extension citation
    #[serde(
        rename = "sci:citation",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub citation: Option<String>,

    /// Per-time-slice styling hints (render extension shape)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub renders: BTreeMap<String, Render>,

    /// Item-assets schema for items in this collection
    pub item_assets: BTreeMap<String, AssetDefinition>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, Asset>,

    pub links: Vec<Link>,
}

/// Spatial and temporal extent pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extent {
    pub spatial: SpatialExtent,
    pub temporal: TemporalExtent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpatialExtent {
    pub bbox: Vec<[f64; 4]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemporalExtent {
    pub interval: Vec<[Option<DateTime<Utc>>; 2]>,
}

/// Schema for an asset type shared by all items in a collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetDefinition {
    pub title: String,
    pub description: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,

    pub roles: Vec<String>,

    #[serde(
        rename = "classification:classes",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub classes: Vec<ClassificationClass>,
}

/// A concrete asset (collection thumbnail or item data file).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    #[serde(
        rename = "classification:classes",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub classes: Vec<ClassificationClass>,
}

/// Styling hints for one recognized time slice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Render {
    /// Asset keys the render applies to
    pub assets: Vec<String>,

    /// ISO 8601 instant or start/end interval
    pub datetime: String,

    /// Pixel value to RGB triple
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub colormap: BTreeMap<u8, [u8; 3]>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl Link {
    pub fn new(rel: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            href: href.into(),
            media_type: None,
            title: None,
        }
    }

    pub fn with_media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_temporal_interval_serializes_utc_instants() {
        let extent = TemporalExtent {
            interval: vec![[
                Some(Utc.with_ymd_and_hms(2000, 1, 1, 0, 0, 0).unwrap()),
                Some(Utc.with_ymd_and_hms(2020, 12, 31, 23, 59, 59).unwrap()),
            ]],
        };
        let json = serde_json::to_value(&extent).unwrap();
        assert_eq!(json["interval"][0][0], "2000-01-01T00:00:00Z");
        assert_eq!(json["interval"][0][1], "2020-12-31T23:59:59Z");
    }

    #[test]
    fn test_link_builder_chain() {
        let link = Link::new("license", "https://example.com/license")
            .with_media_type("text/html")
            .with_title("License");
        let json = serde_json::to_value(&link).unwrap();
        assert_eq!(json["rel"], "license");
        assert_eq!(json["type"], "text/html");
        assert_eq!(json["title"], "License");
    }

    #[test]
    fn test_colormap_keys_are_numeric_strings() {
        let mut colormap = BTreeMap::new();
        colormap.insert(255u8, [0u8, 0, 0]);
        colormap.insert(2u8, [10u8, 20, 30]);
        let render = Render {
            assets: vec!["data".to_string()],
            datetime: "2000-01-01T00:00:00Z".to_string(),
            colormap,
        };
        let json = serde_json::to_string(&render).unwrap();
        assert!(json.contains("\"2\":[10,20,30]"));
        assert!(json.contains("\"255\":[0,0,0]"));
    }
}
