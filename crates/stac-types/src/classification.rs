//! Classification extension class objects.

use serde::{Deserialize, Serialize};

/// One discrete raster value with its label and optional color hint.
///
/// Serialized into `classification:classes` lists on asset definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationClass {
    /// Pixel value this class applies to
    pub value: u8,

    /// Identifier-safe slug name
    pub name: String,

    /// Human-readable description
    pub description: String,

    /// True when the value marks missing data
    pub nodata: bool,

    /// Six-hex-digit RGB string, no leading '#'
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_hint: Option<String>,
}

impl ClassificationClass {
    /// Decode the color hint into an RGB triple, two hex digits per channel.
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let hex = self.color_hint.as_deref()?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
        let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
        let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
        Some([r, g, b])
    }
}
