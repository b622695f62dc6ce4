//! Image decoding via the [image] crate.
//!
//! Formats are detected from the content, not the file extension. PNG and
//! JPEG decoders are compiled in.
//!
//! [image]: https://docs.rs/image

use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use image::{ImageFormat, ImageReader};

use crate::error::TextureError;
use crate::pixels::PixelSource;

/// A decoded image plus the format it was decoded from.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Decoded pixels, tagged by layout.
    pub pixels: PixelSource,
    /// Detected container format.
    pub format: ImageFormat,
}

impl From<DecodedImage> for PixelSource {
    fn from(decoded: DecodedImage) -> Self {
        decoded.pixels
    }
}

/// Lowercase name of a detected format, `unknown` if none was detected.
fn format_name(format: Option<ImageFormat>) -> String {
    format.map_or_else(|| "unknown".to_owned(), |f| format!("{f:?}").to_lowercase())
}

/// Open and decode the image file at `path`.
///
/// # Errors
///
/// Returns [`TextureError::Open`] if the file cannot be read and
/// [`TextureError::Decode`] if its contents are not a supported image.
pub fn decode_file(path: &Path) -> Result<DecodedImage, TextureError> {
    let open_error = |source| TextureError::Open {
        path: path.to_path_buf(),
        source,
    };
    let reader = ImageReader::open(path)
        .map_err(open_error)?
        .with_guessed_format()
        .map_err(open_error)?;

    decode_reader(reader).map_err(|(format, source)| TextureError::Decode {
        format,
        path: path.to_path_buf(),
        source,
    })
}

/// Decode an image held in memory.
///
/// # Errors
///
/// Returns [`TextureError::DecodeBytes`] if `bytes` is not a supported image.
pub fn decode_bytes(bytes: &[u8]) -> Result<DecodedImage, TextureError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|err| TextureError::DecodeBytes {
            format: format_name(None),
            source: image::ImageError::IoError(err),
        })?;

    decode_reader(reader).map_err(|(format, source)| TextureError::DecodeBytes { format, source })
}

fn decode_reader<R: BufRead + Seek>(
    reader: ImageReader<R>,
) -> Result<DecodedImage, (String, image::ImageError)> {
    let detected = reader.format();
    let Some(format) = detected else {
        let source = image::ImageError::Unsupported(
            image::error::UnsupportedError::from_format_and_kind(
                image::error::ImageFormatHint::Unknown,
                image::error::UnsupportedErrorKind::Format(image::error::ImageFormatHint::Unknown),
            ),
        );
        return Err((format_name(None), source));
    };

    match reader.decode() {
        Ok(image) => Ok(DecodedImage {
            pixels: image.into(),
            format,
        }),
        Err(source) => Err((format_name(detected), source)),
    }
}
