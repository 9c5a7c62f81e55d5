use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use photo_picker::metadata::strip_file_scheme;
use photo_picker::{DownscaleOptions, DownscaleService, MimeStrategy, RawMedia, ServiceError};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Reads width and height from the image header
pub fn image_dimensions(path: &Path) -> Result<(u32, u32), ServiceError> {
    image::image_dimensions(path)
        .map_err(|e| ServiceError::Other(format!("Failed to read image {}: {}", path.display(), e)))
}

/// Resize an image maintaining aspect ratio; `None` bounds are ignored
fn calculate_resize_dimensions(
    original_width: u32,
    original_height: u32,
    max_width: Option<u32>,
    max_height: Option<u32>,
) -> (u32, u32) {
    let max_width = max_width.unwrap_or(u32::MAX).max(1);
    let max_height = max_height.unwrap_or(u32::MAX).max(1);
    let ratio =
        (original_width as f32 / max_width as f32).max(original_height as f32 / max_height as f32);

    if ratio > 1.0 {
        let new_width = ((original_width as f32 / ratio) as u32).max(1);
        let new_height = ((original_height as f32 / ratio) as u32).max(1);
        (new_width, new_height)
    } else {
        (original_width, original_height)
    }
}

fn jpeg_quality(quality: f32) -> u8 {
    (quality * 100.0).round().clamp(1.0, 100.0) as u8
}

fn downscale_file(
    input: &Path,
    output_dir: &Path,
    options: &DownscaleOptions,
) -> Result<RawMedia, ServiceError> {
    let img = image::open(input).map_err(|e| {
        ServiceError::Other(format!("Failed to load image {}: {}", input.display(), e))
    })?;

    let (width, height) =
        calculate_resize_dimensions(img.width(), img.height(), options.max_width, options.max_height);
    let resized = if (width, height) == (img.width(), img.height()) {
        img
    } else {
        img.resize_exact(width, height, FilterType::Lanczos3)
    };

    std::fs::create_dir_all(output_dir)?;
    let file_name = format!("{}.jpg", uuid::Uuid::new_v4());
    let output_path = output_dir.join(&file_name);

    let mut writer = BufWriter::new(File::create(&output_path)?);
    JpegEncoder::new_with_quality(&mut writer, jpeg_quality(options.quality))
        .encode_image(&resized.to_rgb8())
        .map_err(|e| ServiceError::Other(format!("Failed to write image: {}", e)))?;

    log::debug!(
        "Downscaled {} to {}x{} at {:?}",
        input.display(),
        width,
        height,
        output_path
    );

    Ok(RawMedia {
        uri: format!("file://{}", output_path.to_string_lossy()),
        width,
        height,
        file_name: Some(file_name),
        mime_type: Some("image/jpeg".to_string()),
        is_stored: true,
    })
}

/// Re-encodes captures as JPEG into `output_dir`
#[derive(Debug, Clone)]
pub struct ImageDownscaler {
    output_dir: PathBuf,
}

impl ImageDownscaler {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl DownscaleService for ImageDownscaler {
    /// Uses spawn_blocking to avoid blocking the async runtime
    async fn downscale(
        &self,
        uri: &str,
        options: &DownscaleOptions,
    ) -> Result<RawMedia, ServiceError> {
        let input = PathBuf::from(strip_file_scheme(uri));
        let output_dir = self.output_dir.clone();
        let options = *options;

        tokio::task::spawn_blocking(move || downscale_file(&input, &output_dir, &options))
            .await
            .map_err(|e| ServiceError::Other(format!("Task join error: {}", e)))?
    }

    fn mime_strategy(&self) -> MimeStrategy {
        MimeStrategy::ReportedType
    }
}
