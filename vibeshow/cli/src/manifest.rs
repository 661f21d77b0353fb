//! Slide directory on disk
//!
//! `generate` writes one image file per slide plus a `slides.json` manifest;
//! `play` reads them back into [`Slide`]s with inline data URIs.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use vibeshow_core::{ArtStyle, ImageRef, Slide};

/// Manifest file name inside a slide directory
pub const MANIFEST_FILE: &str = "slides.json";

/// Contents of `slides.json`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    pub title: String,
    pub style: ArtStyle,
    pub slides: Vec<ManifestEntry>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestEntry {
    pub id: String,
    pub prompt: String,
    pub file: String,
    pub mime_type: String,
}

/// Write every slide image and the manifest into `dir`
pub async fn write_slides(
    dir: &Path,
    title: &str,
    style: ArtStyle,
    slides: &[Slide],
) -> Result<Manifest> {
    tokio::fs::create_dir_all(dir)
        .await
        .with_context(|| format!("Failed to create output directory: {dir:?}"))?;

    let mut entries = Vec::with_capacity(slides.len());
    for slide in slides {
        let image = slide
            .inline_image()
            .with_context(|| format!("{} does not carry inline image data", slide.id))?;
        let bytes = image
            .decode()
            .with_context(|| format!("{} has a corrupt image payload", slide.id))?;

        let file = format!("{}.{}", slide.id, image.extension());
        let path = dir.join(&file);
        tokio::fs::write(&path, bytes)
            .await
            .with_context(|| format!("Failed to write {path:?}"))?;

        tracing::debug!(slide = %slide.id, path = ?path, "Wrote slide image");
        entries.push(ManifestEntry {
            id: slide.id.clone(),
            prompt: slide.prompt.clone(),
            file,
            mime_type: image.mime_type,
        });
    }

    let manifest = Manifest {
        title: title.to_string(),
        style,
        slides: entries,
    };
    let path = dir.join(MANIFEST_FILE);
    tokio::fs::write(&path, serde_json::to_vec_pretty(&manifest)?)
        .await
        .with_context(|| format!("Failed to write {path:?}"))?;

    Ok(manifest)
}

/// Load the manifest and slide images from `dir`
pub async fn read_slides(dir: &Path) -> Result<(Manifest, Vec<Slide>)> {
    let path = dir.join(MANIFEST_FILE);
    let raw = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {path:?}"))?;
    let manifest: Manifest =
        serde_json::from_slice(&raw).with_context(|| format!("Invalid manifest {path:?}"))?;

    let mut slides = Vec::with_capacity(manifest.slides.len());
    for entry in &manifest.slides {
        let image_path = dir.join(&entry.file);
        let bytes = tokio::fs::read(&image_path)
            .await
            .with_context(|| format!("Failed to read {image_path:?}"))?;
        let image = ImageRef::from_bytes(entry.mime_type.clone(), &bytes);
        slides.push(Slide {
            id: entry.id.clone(),
            image_url: image.to_data_uri(),
            prompt: entry.prompt.clone(),
        });
    }

    Ok((manifest, slides))
}
