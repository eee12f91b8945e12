//! Vision path for image uploads
//!
//! Images have no text layer, so the generation service is asked to describe
//! them. The bytes are decoded first so corrupt uploads fail locally, and
//! oversized images are scaled down before upload.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};

use super::{DocumentFormat, ExtractionError, TextExtractor};
use crate::ai::{ContentPart, TextGenerator};
use crate::models::UploadedDocument;

/// Maximum image dimension (width or height)
const MAX_DIMENSION: u32 = 1600;

/// Image bytes ready to be sent inline
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// Describes images through a vision-capable text generator
pub struct ImageExtractor {
    generator: Arc<dyn TextGenerator>,
}

impl ImageExtractor {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl TextExtractor for ImageExtractor {
    fn format(&self) -> DocumentFormat {
        DocumentFormat::Image
    }

    /// Returns the generator's description verbatim. Not idempotent.
    async fn extract(&self, document: &UploadedDocument) -> Result<String, ExtractionError> {
        let prepared = prepare_image_for_vision(document.bytes())?;

        tracing::debug!(
            name = document.name(),
            mime = %prepared.mime_type,
            size = prepared.data.len(),
            "Requesting image description"
        );

        let parts = [ContentPart::InlineData {
            mime_type: prepared.mime_type,
            data: prepared.data,
        }];

        self.generator
            .generate(&parts)
            .await
            .map_err(|e| ExtractionError::failed(DocumentFormat::Image, e))
    }
}

/// Validate an image and prepare it for upload.
///
/// Images within `MAX_DIMENSION` are passed through untouched, labelled with
/// the format sniffed from their bytes. Larger ones are resized and
/// re-encoded as JPEG.
pub fn prepare_image_for_vision(image_data: &[u8]) -> Result<PreparedImage, ExtractionError> {
    let format = image::guess_format(image_data)
        .map_err(|e| ExtractionError::failed(DocumentFormat::Image, e))?;
    let img = image::load_from_memory_with_format(image_data, format)
        .map_err(|e| ExtractionError::failed(DocumentFormat::Image, e))?;

    let (width, height) = (img.width(), img.height());
    if width <= MAX_DIMENSION && height <= MAX_DIMENSION {
        return Ok(PreparedImage {
            mime_type: format.to_mime_type().to_string(),
            data: image_data.to_vec(),
        });
    }

    let resized = resize_to_limit(img);
    tracing::debug!(
        from = %format!("{}x{}", width, height),
        to = %format!("{}x{}", resized.width(), resized.height()),
        "Downscaled image for vision"
    );

    // JPEG has no alpha channel
    let rgb = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut buffer = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut buffer), ImageFormat::Jpeg)
        .map_err(|e| ExtractionError::failed(DocumentFormat::Image, e))?;

    Ok(PreparedImage {
        mime_type: "image/jpeg".to_string(),
        data: buffer,
    })
}

fn resize_to_limit(img: DynamicImage) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let scale = (MAX_DIMENSION as f32 / width.max(height) as f32).min(1.0);
    let new_width = ((width as f32 * scale) as u32).max(1);
    let new_height = ((height as f32 * scale) as u32).max(1);

    img.resize(new_width, new_height, image::imageops::FilterType::Lanczos3)
}
