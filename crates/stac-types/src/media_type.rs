//! Media types for raster assets and links.

use serde::{Deserialize, Serialize};

/// IANA media type strings used in asset and link metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    /// Cloud-Optimized GeoTIFF
    #[serde(rename = "image/tiff; application=geotiff; profile=cloud-optimized")]
    Cog,

    /// Plain GeoTIFF
    #[serde(rename = "image/tiff; application=geotiff")]
    Geotiff,

    #[serde(rename = "image/png")]
    Png,

    #[serde(rename = "text/html")]
    Html,

    #[serde(rename = "application/json")]
    Json,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Cog => "image/tiff; application=geotiff; profile=cloud-optimized",
            MediaType::Geotiff => "image/tiff; application=geotiff",
            MediaType::Png => "image/png",
            MediaType::Html => "text/html",
            MediaType::Json => "application/json",
        }
    }
}

impl std::fmt::Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "image/tiff; application=geotiff; profile=cloud-optimized" => Ok(MediaType::Cog),
            "image/tiff; application=geotiff" => Ok(MediaType::Geotiff),
            "image/png" => Ok(MediaType::Png),
            "text/html" => Ok(MediaType::Html),
            "application/json" => Ok(MediaType::Json),
            other => Err(format!("Unknown media type: {}", other)),
        }
    }
}
