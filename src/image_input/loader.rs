use crate::utils::error::ServiceError;
use crate::Result;
use base64::Engine;
use image::{DynamicImage, GenericImageView, ImageFormat};

pub struct ImageLoader;

impl ImageLoader {
    /// Load an image from a base64 string, tolerating a data-URL prefix
    /// (`data:image/xxx;base64,`).
    pub fn from_base64(base64_data: &str, max_bytes: usize) -> Result<DynamicImage> {
        let base64_clean = if base64_data.starts_with("data:") {
            base64_data.split(',').nth(1).unwrap_or(base64_data)
        } else {
            base64_data
        };

        let image_bytes = base64::engine::general_purpose::STANDARD.decode(base64_clean)?;

        Self::from_bytes(&image_bytes, max_bytes)
    }

    /// Load an image from raw upload bytes.
    pub fn from_bytes(bytes: &[u8], max_bytes: usize) -> Result<DynamicImage> {
        if bytes.len() > max_bytes {
            return Err(ServiceError::FileTooLarge(bytes.len(), max_bytes));
        }

        if let Ok(format) = image::guess_format(bytes) {
            if !Self::is_supported_format(format) {
                return Err(ServiceError::UnsupportedFormat(format!("{:?}", format)));
            }
        }

        let image = image::load_from_memory(bytes)?;
        Self::validate_dimensions(&image)?;

        Ok(image)
    }

    /// Only the formats the upload control offers.
    pub fn is_supported_format(format: ImageFormat) -> bool {
        matches!(format, ImageFormat::Png | ImageFormat::Jpeg)
    }

    fn validate_dimensions(image: &DynamicImage) -> Result<()> {
        let (width, height) = (image.width(), image.height());

        if width < 16 || height < 16 {
            return Err(ServiceError::InvalidInput(format!(
                "Image too small: {}x{}, minimum 16x16",
                width, height
            )));
        }

        if width > 8192 || height > 8192 {
            return Err(ServiceError::InvalidInput(format!(
                "Image too large: {}x{}, maximum 8192x8192",
                width, height
            )));
        }

        Ok(())
    }
}
