//! Collection definitions and the two-collection registry.

use stac_types::ClassificationClass;

use crate::classification::load_classes;
use crate::error::MetadataResult;
use crate::href::HrefTemplate;

/// Default location of the published assets.
pub const DEFAULT_HREF_FORMAT: &str =
    "https://storage.googleapis.com/earthenginepartners-hansen/GLCLU2000-2020/{version}/{year}/{loc}.tif";

pub const COLLECTION_HOMEPAGE: &str =
    "https://storage.googleapis.com/earthenginepartners-hansen/GLCLU2000-2020/v2/download.html";

pub const COLLECTION_CITATION: &str = "P.V. Potapov, M.C. Hansen, A.H. Pickens, A. Hernandez-Serna, \
     A. Tyukavina, S. Turubanova, V. Zalles, X. Li, A. Khan, \
     F. Stolle, N. Harris, X.-P. Song, A. Baggett, I. Kommareddy, \
     A. Komareddy (2022).";

pub const COLLECTION_DOI_URL: &str = "https://doi.org/10.3389/frsen.2022.856903";

pub const COLLECTION_KEYWORDS: [&str; 5] = [
    "land cover",
    "land use",
    "land use change",
    "vegetation",
    "surface water",
];

pub const THUMBNAIL_HREF: &str =
    "https://glad.umd.edu/sites/default/files/styles/projects/public/datasets_glulc.jpg?itok=bxS-HPMi";

/// Asset key and roles used for the single raster asset on every item.
pub const ASSET_NAME: &str = "data";
pub const ASSET_ROLES: [&str; 1] = ["data"];

/// Years with a published annual map.
pub const ANNUAL_YEARS: [i32; 5] = [2000, 2005, 2010, 2015, 2020];

/// First and last year covered by the dataset.
pub const COLLECTION_START_YEAR: i32 = 2000;
pub const COLLECTION_END_YEAR: i32 = 2020;

const ANNUAL_CLASSES_CSV: &str = include_str!("../data/annual_classes.csv");
const CHANGE_CLASSES_CSV: &str = include_str!("../data/change_classes.csv");

fn collection_description() -> String {
    format!(
        "The GLAD Global Land Cover and Land Use Change dataset quantifies \
         changes in forest extent and height, cropland, built-up lands, \
         surface water, and perennial snow and ice extent from the year 2000 \
         to 2020 at 30-m spatial resolution. The global dataset derived from \
         the GLAD Landsat Analysis Ready Data. Each thematic product was \
         independently derived using state-of-the-art, locally and regionally \
         calibrated machine learning tools. Each thematic layer was validated \
         independently using a statistical sampling. The global dataset is \
         available online, with no charges for access and no restrictions on \
         subsequent redistribution or use, as long as the proper citation is \
         provided as specified by the Creative Commons Attribution License \
         (CC BY). For all questions and comment contact Peter Potapov \
         (potapov@umd.edu).\n\n{}",
        COLLECTION_CITATION
    )
}

/// The two collection kinds of the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionId {
    /// Annual land cover / land use maps
    Annual,
    /// Net 2000-2020 change map
    Change,
}

impl CollectionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionId::Annual => "glad-glclu2020",
            CollectionId::Change => "glad-glclu2020-change",
        }
    }

    /// Both kinds, in registration order.
    pub fn all() -> [CollectionId; 2] {
        [CollectionId::Annual, CollectionId::Change]
    }
}

impl std::fmt::Display for CollectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Immutable configuration for one collection.
#[derive(Debug, Clone)]
pub struct CollectionDefinition {
    pub id: CollectionId,
    pub title: String,
    pub description: String,
    pub asset_title: String,
    pub asset_description: String,
    pub classes: Vec<ClassificationClass>,
    pub href_template: HrefTemplate,
}

impl CollectionDefinition {
    fn annual(href_template: HrefTemplate) -> MetadataResult<Self> {
        Ok(Self {
            id: CollectionId::Annual,
            title: "GLAD: Annual maps of land cover and land use".to_string(),
            description: collection_description(),
            asset_title: "Annual maps of land cover and land use".to_string(),
            asset_description: "Continuous measures of bare ground and tree height inside and \
                 outside of wetlands, seasonal water percent, and binary labels of \
                 built-up, permanent snow/ice, and cropland."
                .to_string(),
            classes: load_classes(ANNUAL_CLASSES_CSV)?,
            href_template,
        })
    }

    fn change(href_template: HrefTemplate) -> MetadataResult<Self> {
        Ok(Self {
            id: CollectionId::Change,
            title: "GLAD: Net change of land cover and land use between 2000 and 2020"
                .to_string(),
            description: collection_description(),
            asset_title: "Net change of land cover and land use between 2000 and 2020"
                .to_string(),
            asset_description: "Land cover and land use states of 2020 with transitions \
                 relative to 2000 labeled."
                .to_string(),
            classes: load_classes(CHANGE_CLASSES_CSV)?,
            href_template,
        })
    }
}

/// The fixed registry of both collection definitions, sharing one
/// validated href template.
#[derive(Debug, Clone)]
pub struct CollectionRegistry {
    definitions: Vec<CollectionDefinition>,
}

impl CollectionRegistry {
    /// Registry over the default published asset locations.
    pub fn new() -> MetadataResult<Self> {
        Self::with_href_template(DEFAULT_HREF_FORMAT)
    }

    /// Registry over a caller-supplied template. Fails fast when required
    /// placeholders are missing.
    pub fn with_href_template(template: &str) -> MetadataResult<Self> {
        let href_template = HrefTemplate::new(template)?;
        Ok(Self {
            definitions: vec![
                CollectionDefinition::annual(href_template.clone())?,
                CollectionDefinition::change(href_template)?,
            ],
        })
    }

    pub fn get(&self, id: CollectionId) -> &CollectionDefinition {
        match id {
            CollectionId::Annual => &self.definitions[0],
            CollectionId::Change => &self.definitions[1],
        }
    }

    /// Definitions in registration order (annual first).
    pub fn definitions(&self) -> &[CollectionDefinition] {
        &self.definitions
    }
}
