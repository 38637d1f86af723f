//! GeoTIFF header inspection.
//!
//! Media-type sniffing opens the sample asset and classifies it from TIFF
//! structure alone: a tiled base image carrying reduced-resolution overview
//! directories is cloud-optimized, any other readable TIFF is a plain
//! GeoTIFF. The cloud-optimized test runs first since it is the stronger
//! claim. Footprints come from the standard georeferencing tags.

use std::fs::File;
use std::io::BufReader;

use stac_types::MediaType;
use tiff::decoder::Decoder;
use tiff::tags::Tag;
use tracing::debug;

use crate::error::{MetadataError, MetadataResult};

// GeoTIFF tag ids (not named in the tiff crate)
const MODEL_PIXEL_SCALE: u16 = 33550;
const MODEL_TIEPOINT: u16 = 33922;

/// Pick the asset media type: an explicit type wins, otherwise a sample
/// asset is sniffed. One of the two must be supplied.
pub fn resolve_media_type(
    explicit: Option<MediaType>,
    sample_href: Option<&str>,
) -> MetadataResult<MediaType> {
    match (explicit, sample_href) {
        (Some(media_type), _) => Ok(media_type),
        (None, Some(href)) => sniff_media_type(href),
        (None, None) => Err(MetadataError::MediaTypeUnresolvable),
    }
}

/// Classify a raster asset as COG or plain GeoTIFF from its headers.
pub fn sniff_media_type(href: &str) -> MetadataResult<MediaType> {
    let mut decoder = open(href)?;

    let tiled = decoder
        .find_tag(Tag::TileWidth)
        .map_err(|e| detection_error(href, &e))?
        .is_some();

    let mut overviews = 0usize;
    while decoder.more_images() {
        decoder
            .next_image()
            .map_err(|e| detection_error(href, &e))?;
        overviews += 1;
    }

    if tiled && overviews > 0 {
        return Ok(MediaType::Cog);
    }

    debug!(
        href,
        tiled, overviews, "Not a cloud-optimized layout, classifying as plain GeoTIFF"
    );
    Ok(MediaType::Geotiff)
}

/// Read the `[west, south, east, north]` footprint from the
/// ModelTiepoint/ModelPixelScale tags.
///
/// Returns `None` when the asset is unreadable, ungeoreferenced, or not in
/// geographic coordinates (projected rasters would need a CRS transform,
/// which is out of scope here).
pub fn read_footprint(href: &str) -> Option<[f64; 4]> {
    let mut decoder = open(href).ok()?;

    let scale = decoder
        .find_tag(Tag::Unknown(MODEL_PIXEL_SCALE))
        .ok()??
        .into_f64_vec()
        .ok()?;
    let tiepoint = decoder
        .find_tag(Tag::Unknown(MODEL_TIEPOINT))
        .ok()??
        .into_f64_vec()
        .ok()?;
    let (width, height) = decoder.dimensions().ok()?;

    if scale.len() < 2 || tiepoint.len() < 6 {
        return None;
    }

    // Tiepoint maps raster origin (upper-left) to model space; pixel scale
    // is positive in both axes with north-up rasters.
    let west = tiepoint[3];
    let north = tiepoint[4];
    let east = west + f64::from(width) * scale[0];
    let south = north - f64::from(height) * scale[1];

    let bbox = [
        west.min(east),
        south.min(north),
        west.max(east),
        south.max(north),
    ];
    is_geographic_bbox(&bbox).then_some(bbox)
}

fn is_geographic_bbox(bbox: &[f64; 4]) -> bool {
    let lon_ok = bbox[0] >= -180.0 && bbox[2] <= 180.0;
    let lat_ok = bbox[1] >= -90.0 && bbox[3] <= 90.0;
    lon_ok && lat_ok
}

fn open(href: &str) -> MetadataResult<Decoder<BufReader<File>>> {
    let file = File::open(href).map_err(|e| detection_error(href, &e))?;
    Decoder::new(BufReader::new(file)).map_err(|e| detection_error(href, &e))
}

fn detection_error(href: &str, error: &dyn std::fmt::Display) -> MetadataError {
    MetadataError::MediaTypeDetection {
        href: href.to_string(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tiff::encoder::colortype::Gray8;
    use tiff::encoder::TiffEncoder;

    /// Write a 10x10 stripped GeoTIFF with georeferencing tags, the way a
    /// plain (non-cloud-optimized) tile would be laid out.
    fn write_geotiff(path: &Path, west: f64, north: f64, pixel_size: f64) {
        let file = File::create(path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        let mut image = encoder.new_image::<Gray8>(10, 10).unwrap();

        let pixel_scale = [pixel_size, pixel_size, 0.0];
        let tiepoint = [0.0, 0.0, 0.0, west, north, 0.0];
        image
            .encoder()
            .write_tag(Tag::Unknown(MODEL_PIXEL_SCALE), &pixel_scale[..])
            .unwrap();
        image
            .encoder()
            .write_tag(Tag::Unknown(MODEL_TIEPOINT), &tiepoint[..])
            .unwrap();

        image.write_data(&[0u8; 100]).unwrap();
    }

    #[test]
    fn test_sniff_stripped_tiff_is_plain_geotiff() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.tif");
        write_geotiff(&path, -80.0, 40.0, 1.0);

        let media_type = sniff_media_type(path.to_str().unwrap()).unwrap();
        assert_eq!(media_type, MediaType::Geotiff);
    }

    #[test]
    fn test_sniff_unreadable_href_fails() {
        let err = sniff_media_type("/nonexistent/tile.tif").unwrap_err();
        match err {
            MetadataError::MediaTypeDetection { href, .. } => {
                assert_eq!(href, "/nonexistent/tile.tif");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_sniff_non_tiff_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("not_a_tiff.tif");
        std::fs::write(&path, b"plain text").unwrap();
        assert!(sniff_media_type(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_read_footprint() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tile.tif");
        write_geotiff(&path, -80.0, 40.0, 1.0);

        let bbox = read_footprint(path.to_str().unwrap()).unwrap();
        assert_eq!(bbox, [-80.0, 30.0, -70.0, 40.0]);
    }

    #[test]
    fn test_read_footprint_rejects_projected_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projected.tif");
        // LV95-like meter coordinates, far outside lon/lat ranges
        write_geotiff(&path, 2_600_000.0, 1_200_000.0, 10.0);

        assert!(read_footprint(path.to_str().unwrap()).is_none());
    }

    #[test]
    fn test_read_footprint_without_geotags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bare.tif");
        let file = File::create(&path).unwrap();
        let mut encoder = TiffEncoder::new(file).unwrap();
        encoder.write_image::<Gray8>(10, 10, &[0u8; 100]).unwrap();

        assert!(read_footprint(path.to_str().unwrap()).is_none());
    }

    #[test]
    fn test_resolve_explicit_wins() {
        let media_type = resolve_media_type(Some(MediaType::Cog), Some("/nonexistent.tif"));
        assert_eq!(media_type.unwrap(), MediaType::Cog);
    }

    #[test]
    fn test_resolve_requires_some_input() {
        let err = resolve_media_type(None, None).unwrap_err();
        assert!(matches!(err, MetadataError::MediaTypeUnresolvable));
    }
}
