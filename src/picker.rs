use crate::decoder::load_image;
use crate::error::{Result, ScannerError};
use async_trait::async_trait;
use image::DynamicImage;
use std::path::PathBuf;
use tracing::debug;

/// What the image picker returned
#[derive(Debug, Clone)]
pub enum PickedImage {
    Picked(DynamicImage),
    Cancelled,
}

/// System image picker returning a single still image
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn pick_image(&self) -> Result<PickedImage>;
}

/// Picks a fixed file from disk; no path behaves like a dismissed picker
#[derive(Debug, Clone, Default)]
pub struct FileImageSource {
    path: Option<PathBuf>,
}

impl FileImageSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// A source whose user always cancels
    pub fn cancelled() -> Self {
        Self { path: None }
    }
}

#[async_trait]
impl ImageSource for FileImageSource {
    async fn pick_image(&self) -> Result<PickedImage> {
        let Some(path) = self.path.clone() else {
            debug!("Image picker cancelled");
            return Ok(PickedImage::Cancelled);
        };

        let image = tokio::task::spawn_blocking(move || load_image(path))
            .await
            .map_err(|e| ScannerError::system(format!("Image loading task failed: {}", e)))??;

        debug!(width = image.width(), height = image.height(), "Image picked");
        Ok(PickedImage::Picked(image))
    }
}
