//! Avatar compression pipeline.
//!
//! A picked file goes through three stages, each with its own failure:
//! read (validate + load bytes), decode (bitmap), encode (48x48 JPEG data URI).
//! The encoder starts at quality 70 and steps down by 10 while the data URI is
//! longer than 2000 characters, stopping at 30 whether or not it fits.

use std::path::Path;

use base64::Engine as _;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageError, Rgb, RgbImage, RgbaImage};
use thiserror::Error;
use tracing::debug;

/// Side length of the square avatar canvas, in pixels.
pub const AVATAR_SIZE: u32 = 48;
/// Largest accepted source file (5 MiB).
pub const MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;
/// Target length of the encoded data URI.
pub const MAX_ENCODED_LEN: usize = 2000;

const INITIAL_QUALITY: u8 = 70;
const MIN_QUALITY: u8 = 30;
const QUALITY_STEP: u8 = 10;

const DATA_URI_PREFIX: &str = "data:image/jpeg;base64,";

#[derive(Debug, Error)]
pub enum AvatarError {
    #[error("Please select an image file")]
    UnsupportedFileType(String),

    #[error("Image file is too large. Please select a smaller image.")]
    FileTooLarge(u64),

    #[error("Failed to read file. Please try again.")]
    Read(#[from] std::io::Error),

    #[error("Failed to load image. Please try another file.")]
    Decode(#[source] ImageError),

    #[error("Failed to encode image.")]
    Encode(#[source] ImageError),

    #[error("Image processing was interrupted.")]
    Interrupted(#[from] tokio::task::JoinError),
}

/// A user-supplied file with its declared MIME type.
#[derive(Debug, Clone)]
pub struct RawImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl RawImage {
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn validate(&self) -> Result<(), AvatarError> {
        validate_upload(&self.mime_type, self.len())
    }
}

/// A 48x48 JPEG as a data URI, ready to embed in chat messages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedAvatar {
    data_uri: String,
    quality: u8,
}

impl EncodedAvatar {
    pub fn as_str(&self) -> &str {
        &self.data_uri
    }

    pub fn len(&self) -> usize {
        self.data_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data_uri.is_empty()
    }

    /// JPEG quality (percent) the final encoding used.
    pub fn quality(&self) -> u8 {
        self.quality
    }
}

fn check_mime_type(mime_type: &str) -> Result<(), AvatarError> {
    if mime_type.starts_with("image/") {
        Ok(())
    } else {
        Err(AvatarError::UnsupportedFileType(mime_type.to_string()))
    }
}

fn check_size(size: u64) -> Result<(), AvatarError> {
    if size > MAX_FILE_SIZE {
        Err(AvatarError::FileTooLarge(size))
    } else {
        Ok(())
    }
}

/// Checks run before any decoding work: MIME type first, then size.
pub fn validate_upload(mime_type: &str, size: u64) -> Result<(), AvatarError> {
    check_mime_type(mime_type)?;
    check_size(size)
}

/// Read stage. The file is only loaded once its type and size pass validation.
pub async fn read_image_file(path: &Path) -> Result<RawImage, AvatarError> {
    let mime_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();
    check_mime_type(&mime_type)?;

    let size = tokio::fs::metadata(path).await?.len();
    check_size(size)?;

    let bytes = tokio::fs::read(path).await?;
    Ok(RawImage { mime_type, bytes })
}

/// Decode stage, off the async worker.
pub async fn decode(bytes: Vec<u8>) -> Result<DynamicImage, AvatarError> {
    tokio::task::spawn_blocking(move || image::load_from_memory(&bytes))
        .await?
        .map_err(AvatarError::Decode)
}

/// Stretch the bitmap over the whole square canvas. Transparent areas end up
/// black, since JPEG has no alpha channel.
pub fn render_canvas(bitmap: &DynamicImage) -> RgbImage {
    let scaled = bitmap
        .resize_exact(AVATAR_SIZE, AVATAR_SIZE, FilterType::Triangle)
        .to_rgba8();
    RgbImage::from_fn(AVATAR_SIZE, AVATAR_SIZE, |x, y| {
        let [r, g, b, a] = scaled.get_pixel(x, y).0;
        let over_black = |c: u8| (u16::from(c) * u16::from(a) / 255) as u8;
        Rgb([over_black(r), over_black(g), over_black(b)])
    })
}

fn encode_jpeg_data_uri(canvas: &RgbImage, quality: u8) -> Result<String, AvatarError> {
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(canvas)
        .map_err(AvatarError::Encode)?;
    let b64 = base64::engine::general_purpose::STANDARD.encode(&jpeg);
    Ok(format!("{DATA_URI_PREFIX}{b64}"))
}

fn reduce_until_fits<F>(mut encode: F) -> Result<EncodedAvatar, AvatarError>
where
    F: FnMut(u8) -> Result<String, AvatarError>,
{
    let mut quality = INITIAL_QUALITY;
    let mut data_uri = encode(quality)?;
    while data_uri.len() > MAX_ENCODED_LEN && quality > MIN_QUALITY {
        quality -= QUALITY_STEP;
        data_uri = encode(quality)?;
    }
    Ok(EncodedAvatar { data_uri, quality })
}

/// Encode stage. Best effort: at the quality floor the result may still
/// exceed `MAX_ENCODED_LEN`.
pub fn encode_canvas(canvas: &RgbImage) -> Result<EncodedAvatar, AvatarError> {
    let avatar = reduce_until_fits(|quality| encode_jpeg_data_uri(canvas, quality))?;
    debug!(
        quality = avatar.quality,
        len = avatar.len(),
        fits = avatar.len() <= MAX_ENCODED_LEN,
        "avatar encoded"
    );
    Ok(avatar)
}

/// Validate, decode and encode an in-memory image.
pub async fn compress(raw: RawImage) -> Result<EncodedAvatar, AvatarError> {
    raw.validate()?;
    let bitmap = decode(raw.bytes).await?;
    encode_canvas(&render_canvas(&bitmap))
}

/// Full pipeline for a file the user picked.
pub async fn compress_file(path: &Path) -> Result<EncodedAvatar, AvatarError> {
    let raw = read_image_file(path).await?;
    compress(raw).await
}

/// Decode a base64 image data URI back into pixels, e.g. for display.
pub fn decode_data_uri(uri: &str) -> Option<RgbaImage> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    if !meta.ends_with(";base64") {
        return None;
    }
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload)
        .ok()?;
    image::load_from_memory(&bytes).ok().map(|img| img.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::{Cursor, Write};

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 128]))
    }

    #[test]
    fn test_validation_order_and_limits() {
        assert!(validate_upload("image/png", MAX_FILE_SIZE).is_ok());
        assert!(matches!(
            validate_upload("image/png", MAX_FILE_SIZE + 1),
            Err(AvatarError::FileTooLarge(_))
        ));
        // Type is checked before size
        assert!(matches!(
            validate_upload("application/pdf", MAX_FILE_SIZE * 2),
            Err(AvatarError::UnsupportedFileType(t)) if t == "application/pdf"
        ));
    }

    #[tokio::test]
    async fn test_unsupported_type_rejected_before_decode() {
        let raw = RawImage::new("text/plain", b"definitely not pixels".to_vec());
        assert!(matches!(
            compress(raw).await,
            Err(AvatarError::UnsupportedFileType(_))
        ));
    }

    #[tokio::test]
    async fn test_oversized_png_rejected_before_decode() {
        // Zero bytes would fail to decode, so FileTooLarge proves decode never ran
        let raw = RawImage::new("image/png", vec![0u8; 6 * 1024 * 1024]);
        match compress(raw).await {
            Err(AvatarError::FileTooLarge(size)) => assert_eq!(size, 6 * 1024 * 1024),
            other => panic!("expected FileTooLarge, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_corrupt_image_is_decode_error() {
        let raw = RawImage::new("image/png", b"\x89PNG garbage".to_vec());
        assert!(matches!(compress(raw).await, Err(AvatarError::Decode(_))));
    }

    #[tokio::test]
    async fn test_output_is_48x48_jpeg_data_uri() {
        let raw = RawImage::new("image/png", png_bytes(&gradient(200, 100)));
        let avatar = compress(raw).await.unwrap();

        assert!(avatar.as_str().starts_with("data:image/jpeg;base64,"));
        assert!([70, 60, 50, 40, 30].contains(&avatar.quality()));
        assert!(avatar.len() <= MAX_ENCODED_LEN || avatar.quality() == 30);

        let pixels = decode_data_uri(avatar.as_str()).unwrap();
        assert_eq!(pixels.dimensions(), (AVATAR_SIZE, AVATAR_SIZE));
    }

    #[tokio::test]
    async fn test_flat_image_fits_at_first_quality() {
        let flat = RgbImage::from_pixel(64, 64, Rgb([200, 40, 40]));
        let avatar = compress(RawImage::new("image/png", png_bytes(&flat)))
            .await
            .unwrap();
        assert_eq!(avatar.quality(), 70);
        assert!(avatar.len() <= MAX_ENCODED_LEN);
    }

    #[test]
    fn test_quality_steps_stop_at_floor() {
        let mut sampled = Vec::new();
        let avatar = reduce_until_fits(|q| {
            sampled.push(q);
            Ok("x".repeat(MAX_ENCODED_LEN + 1))
        })
        .unwrap();
        assert_eq!(sampled, vec![70, 60, 50, 40, 30]);
        // Floor reached without meeting the budget: returned anyway
        assert_eq!(avatar.quality(), 30);
        assert_eq!(avatar.len(), MAX_ENCODED_LEN + 1);
    }

    #[test]
    fn test_quality_stops_once_it_fits() {
        let mut sampled = Vec::new();
        let avatar = reduce_until_fits(|q| {
            sampled.push(q);
            let len = if q <= 50 { MAX_ENCODED_LEN } else { MAX_ENCODED_LEN + 500 };
            Ok("x".repeat(len))
        })
        .unwrap();
        assert_eq!(sampled, vec![70, 60, 50]);
        assert_eq!(avatar.quality(), 50);
    }

    #[test]
    fn test_canvas_stretches_and_flattens_alpha() {
        let transparent = RgbaImage::from_pixel(10, 30, Rgba([255, 255, 255, 0]));
        let canvas = render_canvas(&DynamicImage::ImageRgba8(transparent));
        assert_eq!(canvas.dimensions(), (48, 48));
        assert!(canvas.pixels().all(|p| p.0 == [0, 0, 0]));
    }

    #[tokio::test]
    async fn test_compress_file_reads_picked_image() {
        let mut file = tempfile::Builder::new().suffix(".png").tempfile().unwrap();
        file.write_all(&png_bytes(&gradient(120, 120))).unwrap();

        let avatar = compress_file(file.path()).await.unwrap();
        assert!(avatar.as_str().starts_with(DATA_URI_PREFIX));
    }

    #[tokio::test]
    async fn test_compress_file_rejects_non_image_extension() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        file.write_all(b"hello").unwrap();
        assert!(matches!(
            compress_file(file.path()).await,
            Err(AvatarError::UnsupportedFileType(t)) if t == "text/plain"
        ));
    }

    #[tokio::test]
    async fn test_missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gone.png");
        assert!(matches!(
            compress_file(&path).await,
            Err(AvatarError::Read(_))
        ));
    }

    #[test]
    fn test_decode_data_uri_rejects_non_base64() {
        assert!(decode_data_uri("data:image/jpeg,plain").is_none());
        assert!(decode_data_uri("not a uri").is_none());
    }
}
