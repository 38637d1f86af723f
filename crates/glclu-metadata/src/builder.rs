//! Collection and item document assembly.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use stac_types::{
    bbox_to_polygon, extensions, Asset, AssetDefinition, Collection, Extent, Item, ItemProperties,
    Link, MediaType, Render, SpatialExtent, TemporalExtent, STAC_VERSION,
};
use tracing::debug;

use crate::collections::{
    CollectionDefinition, CollectionId, CollectionRegistry, ANNUAL_YEARS, ASSET_NAME, ASSET_ROLES,
    COLLECTION_CITATION, COLLECTION_DOI_URL, COLLECTION_END_YEAR, COLLECTION_HOMEPAGE,
    COLLECTION_KEYWORDS, COLLECTION_START_YEAR, THUMBNAIL_HREF,
};
use crate::error::{MetadataError, MetadataResult};
use crate::geotiff;
use crate::href::{year_end, year_start, ParsedHref};

/// Collection spatial extent bbox, exactly as published upstream.
const COLLECTION_BBOX: [f64; 4] = [-180.0, 80.0, 180.0, -80.0];

/// Item footprint fallback when an asset carries no usable georeferencing.
const GLOBAL_ITEM_BBOX: [f64; 4] = [-180.0, -80.0, 180.0, 80.0];

fn interval(start: DateTime<Utc>, end: DateTime<Utc>) -> String {
    let fmt = "%Y-%m-%dT%H:%M:%SZ";
    format!("{}/{}", start.format(fmt), end.format(fmt))
}

impl CollectionDefinition {
    /// Assemble the collection-level document.
    pub fn build_collection(&self, media_type: MediaType) -> Collection {
        let mut item_assets = BTreeMap::new();
        item_assets.insert(
            ASSET_NAME.to_string(),
            AssetDefinition {
                title: self.asset_title.clone(),
                description: self.asset_description.clone(),
                media_type: Some(media_type),
                roles: ASSET_ROLES.iter().map(|r| r.to_string()).collect(),
                classes: self.classes.clone(),
            },
        );

        let mut assets = BTreeMap::new();
        assets.insert(
            "thumbnail".to_string(),
            Asset {
                href: THUMBNAIL_HREF.to_string(),
                media_type: Some(MediaType::Png),
                title: Some(self.title.clone()),
                description: None,
                roles: vec!["thumbnail".to_string()],
                classes: Vec::new(),
            },
        );

        Collection {
            type_field: "Collection".to_string(),
            stac_version: STAC_VERSION.to_string(),
            stac_extensions: vec![
                extensions::ITEM_ASSETS.to_string(),
                extensions::CLASSIFICATION.to_string(),
                extensions::SCIENTIFIC.to_string(),
            ],
            id: self.id.as_str().to_string(),
            title: self.title.clone(),
            description: self.description.clone(),
            keywords: COLLECTION_KEYWORDS.iter().map(|k| k.to_string()).collect(),
            license: "CC-BY-4.0".to_string(),
            extent: Extent {
                spatial: SpatialExtent {
                    bbox: vec![COLLECTION_BBOX],
                },
                temporal: TemporalExtent {
                    interval: vec![[
                        Some(year_start(COLLECTION_START_YEAR)),
                        Some(year_end(COLLECTION_END_YEAR)),
                    ]],
                },
            },
            citation: Some(COLLECTION_CITATION.to_string()),
            renders: self.renders(),
            item_assets,
            assets,
            links: vec![
                Link::new("license", "https://creativecommons.org/licenses/by/4.0/")
                    .with_media_type("text/html")
                    .with_title("CC-BY-4.0 license"),
                Link::new("documentation", COLLECTION_HOMEPAGE)
                    .with_media_type("text/html")
                    .with_title("GLAD GLCLU Access Page"),
                Link::new("cite-as", COLLECTION_DOI_URL),
            ],
        }
    }

    /// Styling hints per recognized time slice: one render per published
    /// year for the annual collection, a single full-span render for the
    /// change collection.
    fn renders(&self) -> BTreeMap<String, Render> {
        let colormap: BTreeMap<u8, [u8; 3]> = self
            .classes
            .iter()
            .filter_map(|class| class.rgb().map(|rgb| (class.value, rgb)))
            .collect();

        let slices: Vec<(String, String)> = match self.id {
            CollectionId::Annual => ANNUAL_YEARS
                .iter()
                .map(|&year| {
                    (
                        year.to_string(),
                        interval(year_start(year), year_end(year)),
                    )
                })
                .collect(),
            CollectionId::Change => vec![(
                format!("{}-{} change", COLLECTION_START_YEAR, COLLECTION_END_YEAR),
                interval(
                    year_start(COLLECTION_START_YEAR),
                    year_end(COLLECTION_END_YEAR),
                ),
            )],
        };

        slices
            .into_iter()
            .map(|(key, datetime)| {
                (
                    key,
                    Render {
                        assets: vec![ASSET_NAME.to_string()],
                        datetime,
                        colormap: colormap.clone(),
                    },
                )
            })
            .collect()
    }

    /// Decompose an href with this definition's template.
    pub fn parse_href(&self, href: &str) -> MetadataResult<ParsedHref> {
        let captures =
            self.href_template
                .parse(href)
                .ok_or_else(|| MetadataError::HrefMismatch {
                    href: href.to_string(),
                    template: self.href_template.template().to_string(),
                })?;
        ParsedHref::from_captures(captures)
    }

    /// Build an item for a raster asset belonging to this collection.
    ///
    /// When no media type is supplied the asset itself is sniffed, which
    /// requires it to be a readable local file.
    pub fn create_item(
        &self,
        asset_href: &str,
        media_type: Option<MediaType>,
    ) -> MetadataResult<Item> {
        let parsed = self.parse_href(asset_href)?;
        self.build_item(asset_href, &parsed, media_type)
    }

    pub(crate) fn build_item(
        &self,
        asset_href: &str,
        parsed: &ParsedHref,
        media_type: Option<MediaType>,
    ) -> MetadataResult<Item> {
        let media_type = match media_type {
            Some(media_type) => media_type,
            None => geotiff::sniff_media_type(asset_href)?,
        };

        let bbox = geotiff::read_footprint(asset_href).unwrap_or_else(|| {
            debug!(
                href = asset_href,
                "No geographic footprint available, using dataset-global bbox"
            );
            GLOBAL_ITEM_BBOX
        });

        let (start_datetime, end_datetime) = match parsed.year.range() {
            Some((start, end)) => (Some(start), Some(end)),
            None => (None, None),
        };

        let mut assets = BTreeMap::new();
        assets.insert(
            ASSET_NAME.to_string(),
            Asset {
                href: asset_href.to_string(),
                media_type: Some(media_type),
                title: Some(self.asset_title.clone()),
                description: None,
                roles: ASSET_ROLES.iter().map(|r| r.to_string()).collect(),
                classes: self.classes.clone(),
            },
        );

        Ok(Item {
            type_field: "Feature".to_string(),
            stac_version: STAC_VERSION.to_string(),
            stac_extensions: vec![
                extensions::CLASSIFICATION.to_string(),
                extensions::VERSION.to_string(),
            ],
            id: parsed.id.clone(),
            collection: self.id.as_str().to_string(),
            geometry: bbox_to_polygon(&bbox),
            bbox,
            properties: ItemProperties {
                datetime: parsed.year.datetime(),
                start_datetime,
                end_datetime,
                version: Some(parsed.version.clone()),
            },
            assets,
            links: Vec::new(),
        })
    }
}

impl CollectionRegistry {
    /// Build a collection document, resolving the asset media type from an
    /// explicit value or a sample asset.
    pub fn create_collection(
        &self,
        id: CollectionId,
        media_type: Option<MediaType>,
        sample_asset_href: Option<&str>,
    ) -> MetadataResult<Collection> {
        let media_type = geotiff::resolve_media_type(media_type, sample_asset_href)?;
        Ok(self.get(id).build_collection(media_type))
    }

    /// Route an asset href to the collection it belongs to and build its
    /// item, sniffing the asset's media type.
    pub fn create_item(&self, asset_href: &str) -> MetadataResult<Item> {
        self.create_item_with_media_type(asset_href, None)
    }

    /// Same as [`create_item`](Self::create_item) with the sniffing step
    /// bypassed when the media type is already known.
    ///
    /// Definitions are tried in registration order; the first whose
    /// template matches decomposes the href, and the interpreted year field
    /// selects the owning collection (an annual year can sit in the same
    /// path segment as a change range, so the field shape is the real
    /// discriminator).
    pub fn create_item_with_media_type(
        &self,
        asset_href: &str,
        media_type: Option<MediaType>,
    ) -> MetadataResult<Item> {
        for definition in self.definitions() {
            let Some(captures) = definition.href_template.parse(asset_href) else {
                continue;
            };
            let parsed = ParsedHref::from_captures(captures)?;
            let owner = self.get(parsed.year.collection_id());
            return owner.build_item(asset_href, &parsed, media_type);
        }
        Err(MetadataError::NoMatchingCollection(asset_href.to_string()))
    }
}
