//! Contents.json data model for Apple's Asset Catalog format
//!
//! This module defines the data structures that mirror the parts of Apple's
//! Contents.json schema used by a macOS app-icon set: a top-level catalog
//! manifest carrying only `info`, and a per-iconset manifest enumerating
//! every generated image with its idiom, scale, and nominal size.

use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;

/// Device idiom for every entry in a macOS app-icon set.
pub const MAC_IDIOM: &str = "mac";

/// Author string Xcode writes into asset catalogs it manages.
pub const XCODE_AUTHOR: &str = "xcode";

/// Root structure of a Contents.json file
///
/// The top-level catalog manifest has no `images` array, so the field is
/// skipped when empty rather than serialized as `[]`.
#[derive(Serialize, Debug, Clone)]
pub struct ContentsFile {
    /// Image entries for the icon set; empty for the catalog-level manifest
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageEntry>,

    /// Versioning and authorship information
    pub info: Info,
}

/// Individual image entry within an app-icon set
#[derive(Serialize, Debug, Clone)]
pub struct ImageEntry {
    /// The filename of the generated PNG (e.g., "icon_32x32@2x.png")
    pub filename: String,

    /// The device type for the image; always "mac" here
    pub idiom: String,

    /// The display scale factor, "1x" or "2x"
    pub scale: String,

    /// The nominal size in points, not pixels (e.g., "32x32")
    pub size: String,
}

/// Versioning and authorship information for the asset catalog
#[derive(Serialize, Debug, Clone)]
pub struct Info {
    /// The application or tool that authored the asset catalog
    pub author: String,

    /// The format version of the asset catalog (always 1)
    pub version: u8,
}

impl ContentsFile {
    /// Creates an empty Contents.json structure with the specified author
    pub fn new(author: &str) -> Self {
        Self {
            images: Vec::new(),
            info: Info {
                author: author.to_string(),
                version: 1,
            },
        }
    }

    /// Adds an image entry to the contents file
    pub fn add_image(&mut self, image: ImageEntry) {
        self.images.push(image);
    }
}

impl ImageEntry {
    /// Creates a new image entry
    ///
    /// # Arguments
    /// * `filename` - The filename of the generated image
    /// * `idiom` - The device idiom (always [`MAC_IDIOM`] here)
    /// * `scale` - The scale factor, "1x" or "2x"
    /// * `size` - The nominal size string (e.g., "128x128")
    pub fn new(filename: String, idiom: String, scale: String, size: String) -> Self {
        Self {
            filename,
            idiom,
            scale,
            size,
        }
    }
}

impl Default for Info {
    fn default() -> Self {
        Self {
            author: XCODE_AUTHOR.to_string(),
            version: 1,
        }
    }
}

/// Writes a Contents.json file into the given directory
///
/// Serializes the manifest as pretty-printed JSON with a trailing newline,
/// overwriting any existing file.
///
/// # Errors
/// Returns an error if serialization or the filesystem write fails.
pub fn write_contents_json(dir: &Path, contents: &ContentsFile) -> Result<()> {
    let mut json = serde_json::to_string_pretty(contents).context("serialize Contents.json")?;
    json.push('\n');
    std::fs::write(dir.join("Contents.json"), json)
        .with_context(|| format!("write Contents.json in {}", dir.display()))
}
