//! STAC metadata generator for the GLAD Global Land Cover Land Use dataset.
//!
//! Generates collection metadata for the annual and change collection types
//! and item metadata for individual raster assets located via an href
//! template.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use glclu_metadata::{CollectionId, CollectionRegistry, DEFAULT_HREF_FORMAT};
use stac_types::MediaType;

#[derive(Parser, Debug)]
#[command(name = "glclu-stac")]
#[command(about = "Generate STAC metadata for the GLAD Global Land Use Land Cover dataset")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a STAC collection for the annual or change collection type
    CreateCollection {
        /// Destination path for the collection JSON
        destination: PathBuf,

        /// Type of collection to create
        #[arg(long = "type", value_enum)]
        collection_type: CollectionType,

        /// Media type for the collection assets
        #[arg(long)]
        media_type: Option<String>,

        /// Sample asset href used to determine the media type of the assets
        #[arg(long)]
        sample_asset_href: Option<String>,

        /// Href format used to parse asset locations
        #[arg(long, default_value = DEFAULT_HREF_FORMAT)]
        href_format: String,
    },

    /// Create a STAC item from an asset href
    CreateItem {
        /// Href of the raster asset to describe
        source: String,

        /// Destination path for the item JSON
        destination: PathBuf,

        /// Href format used to parse item fields out of the source href
        #[arg(long, default_value = DEFAULT_HREF_FORMAT)]
        href_format: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum CollectionType {
    Annual,
    Change,
}

impl From<CollectionType> for CollectionId {
    fn from(value: CollectionType) -> Self {
        match value {
            CollectionType::Annual => CollectionId::Annual,
            CollectionType::Change => CollectionId::Change,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::CreateCollection {
            destination,
            collection_type,
            media_type,
            sample_asset_href,
            href_format,
        } => create_collection(
            &destination,
            collection_type,
            media_type,
            sample_asset_href,
            &href_format,
        ),
        Command::CreateItem {
            source,
            destination,
            href_format,
        } => create_item(&source, &destination, &href_format),
    }
}

fn create_collection(
    destination: &Path,
    collection_type: CollectionType,
    media_type: Option<String>,
    sample_asset_href: Option<String>,
    href_format: &str,
) -> Result<()> {
    let registry = CollectionRegistry::with_href_template(href_format)?;

    let media_type = match (media_type, &sample_asset_href) {
        (Some(raw), _) => Some(raw.parse::<MediaType>().map_err(|e| anyhow!(e))?),
        (None, Some(_)) => None,
        (None, None) => {
            warn!(
                "No sample asset href or media type provided. Defaulting to {} media type",
                MediaType::Geotiff
            );
            Some(MediaType::Geotiff)
        }
    };

    let collection = registry.create_collection(
        collection_type.into(),
        media_type,
        sample_asset_href.as_deref(),
    )?;

    write_document(destination, &collection)?;
    info!(
        destination = %destination.display(),
        id = %collection.id,
        "Wrote collection metadata"
    );
    Ok(())
}

fn create_item(source: &str, destination: &Path, href_format: &str) -> Result<()> {
    let registry = CollectionRegistry::with_href_template(href_format)?;
    let item = registry.create_item(source)?;

    write_document(destination, &item)?;
    info!(
        destination = %destination.display(),
        id = %item.id,
        collection = %item.collection,
        "Wrote item metadata"
    );
    Ok(())
}

fn write_document<T: Serialize>(destination: &Path, document: &T) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
    }
    let json = serde_json::to_string_pretty(document)?;
    fs::write(destination, json + "\n")
        .with_context(|| format!("Failed to write {}", destination.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_type_maps_to_id() {
        assert_eq!(CollectionId::from(CollectionType::Annual), CollectionId::Annual);
        assert_eq!(CollectionId::from(CollectionType::Change), CollectionId::Change);
    }

    #[test]
    fn test_write_document_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("nested/collection.json");
        write_document(&destination, &serde_json::json!({"id": "test"})).unwrap();

        let written = fs::read_to_string(&destination).unwrap();
        assert!(written.contains("\"id\": \"test\""));
        assert!(written.ends_with('\n'));
    }

    #[test]
    fn test_cli_parses_create_item() {
        let args = Args::parse_from([
            "glclu-stac",
            "create-item",
            "test/v2/2000/40N_080W.tif",
            "out/item.json",
            "--href-format",
            "test/{version}/{year}/{loc}.tif",
        ]);
        match args.command {
            Command::CreateItem { source, href_format, .. } => {
                assert_eq!(source, "test/v2/2000/40N_080W.tif");
                assert_eq!(href_format, "test/{version}/{year}/{loc}.tif");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
