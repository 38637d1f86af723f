//! STAC metadata generation for the GLAD GLCLU2000-2020 land cover dataset.
//!
//! Two collections exist: the annual land cover / land use maps and the
//! 2000-2020 net change map. This crate parses asset hrefs with a
//! placeholder template, loads the bundled classification tables, and
//! assembles the STAC Collection and Item documents describing the assets.

pub mod builder;
pub mod classification;
pub mod collections;
pub mod error;
pub mod geotiff;
pub mod href;

pub use classification::{load_classes, slugify, NODATA_VALUE};
pub use collections::{
    CollectionDefinition, CollectionId, CollectionRegistry, DEFAULT_HREF_FORMAT,
};
pub use error::{MetadataError, MetadataResult};
pub use geotiff::{resolve_media_type, sniff_media_type};
pub use href::{HrefTemplate, ParsedHref, YearField};
