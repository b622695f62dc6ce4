//! Error type for texture creation.

use std::path::PathBuf;

use thiserror::Error;

/// Texture creation error.
#[derive(Error, Debug)]
pub enum TextureError {
    /// The image file could not be opened or read.
    #[error("failed to open texture file '{}': {source}", path.display())]
    Open {
        /// File that was requested.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The image file was read but could not be decoded.
    #[error("failed to decode <{format}> image '{}': {source}", path.display())]
    Decode {
        /// Detected format name, `unknown` if detection failed.
        format: String,
        /// File that was requested.
        path: PathBuf,
        /// Underlying decoder failure.
        #[source]
        source: image::ImageError,
    },
    /// An in-memory byte stream could not be decoded.
    #[error("failed to decode <{format}> image from memory: {source}")]
    DecodeBytes {
        /// Detected format name, `unknown` if detection failed.
        format: String,
        /// Underlying decoder failure.
        #[source]
        source: image::ImageError,
    },
    /// Pixel rows are laid out in a way the upload path cannot read.
    #[error(
        "unsupported stride: {stride} bytes per row for {width} pixels of {channels} byte(s) \
         over {len} bytes of data"
    )]
    UnsupportedStride {
        /// Row stride in bytes.
        stride: usize,
        /// Row width in pixels.
        width: u32,
        /// Bytes per pixel.
        channels: usize,
        /// Length of the pixel data.
        len: usize,
    },
    /// Width or height was zero.
    #[error("texture dimensions must be positive, got {width}x{height}")]
    EmptyDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// Width or height does not fit the device's signed size type.
    #[error("texture dimension {0} exceeds i32::MAX")]
    DimensionTooLarge(u32),
    /// The client-side pixel buffer for the requested size cannot be
    /// allocated.
    #[error("cannot allocate a {width}x{height} pixel buffer of {bytes_per_pixel} byte(s) per pixel")]
    BufferTooLarge {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
        /// Bytes per pixel.
        bytes_per_pixel: usize,
    },
    /// The device refused to allocate a texture name.
    #[error("failed to allocate texture: {0}")]
    Allocation(String),
}
