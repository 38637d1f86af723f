//! Typed object model for the STAC documents this workspace emits.
//!
//! This is deliberately not a general STAC implementation: it models
//! exactly the Collection and Item shapes the GLCLU generator produces,
//! with serde doing the schema work.

pub mod classification;
pub mod collection;
pub mod item;
pub mod media_type;

pub use classification::ClassificationClass;
pub use collection::{
    Asset, AssetDefinition, Collection, Extent, Link, Render, SpatialExtent, TemporalExtent,
};
pub use item::{bbox_to_polygon, Item, ItemProperties};
pub use media_type::MediaType;

/// STAC spec version declared in every emitted document.
pub const STAC_VERSION: &str = "1.1.0";

/// Extension schema URIs declared in `stac_extensions`.
pub mod extensions {
    pub const ITEM_ASSETS: &str =
        "https://stac-extensions.github.io/item-assets/v1.0.0/schema.json";
    pub const CLASSIFICATION: &str =
        "https://stac-extensions.github.io/classification/v2.0.0/schema.json";
    pub const SCIENTIFIC: &str =
        "https://stac-extensions.github.io/scientific/v1.0.0/schema.json";
    pub const VERSION: &str = "https://stac-extensions.github.io/version/v1.2.0/schema.json";
}
