//! Decoded pixel layouts and the upload-ready [`PixelBuffer`].

use image::{DynamicImage, ImageBuffer, Luma, RgbaImage};

use crate::error::TextureError;

/// A decoded image, tagged by the layout that decides its upload path.
#[derive(Debug, Clone)]
pub enum PixelSource {
    /// 16-bit grayscale, narrowed to 8 bits and uploaded as one channel.
    Gray16(ImageBuffer<Luma<u16>, Vec<u16>>),
    /// Non-premultiplied 8-bit RGBA, uploaded as-is.
    Rgba8(RgbaImage),
    /// Any other layout, converted to 8-bit RGBA before upload.
    Other(DynamicImage),
}

impl From<DynamicImage> for PixelSource {
    fn from(image: DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma16(buffer) => Self::Gray16(buffer),
            DynamicImage::ImageRgba8(buffer) => Self::Rgba8(buffer),
            other => Self::Other(other),
        }
    }
}

impl From<RgbaImage> for PixelSource {
    fn from(buffer: RgbaImage) -> Self {
        Self::Rgba8(buffer)
    }
}

impl PixelSource {
    /// Width and height in pixels.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            Self::Gray16(buffer) => buffer.dimensions(),
            Self::Rgba8(buffer) => buffer.dimensions(),
            Self::Other(image) => (image.width(), image.height()),
        }
    }

    /// Short name of the layout, for diagnostics.
    #[must_use]
    pub fn layout_name(&self) -> &'static str {
        match self {
            Self::Gray16(_) => "gray16",
            Self::Rgba8(_) => "rgba8",
            Self::Other(_) => "other",
        }
    }

    /// Convert into an 8-bit buffer in the layout the device will receive.
    #[must_use]
    pub fn into_pixel_buffer(self) -> PixelBuffer {
        match self {
            Self::Gray16(buffer) => {
                // Keep the high byte of each sample; no rounding.
                let (width, height) = buffer.dimensions();
                let gray = buffer.pixels().map(|p| p.0[0].to_be_bytes()[0]).collect();
                PixelBuffer::tight(width, height, Channels::One, gray)
            }
            Self::Rgba8(buffer) => {
                let (width, height) = buffer.dimensions();
                PixelBuffer::tight(width, height, Channels::Four, buffer.into_raw())
            }
            // Straight (non-premultiplied) alpha, like the `Rgba8` path.
            Self::Other(image) => {
                let rgba = image.into_rgba8();
                let (width, height) = rgba.dimensions();
                PixelBuffer::tight(width, height, Channels::Four, rgba.into_raw())
            }
        }
    }
}

/// Number of 8-bit samples per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channels {
    /// Single-channel (red) data.
    One,
    /// Four-channel RGBA data.
    Four,
}

impl Channels {
    /// Bytes per pixel.
    #[must_use]
    pub fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Four => 4,
        }
    }

    /// `(internal format, source format)` for `tex_image_2d`.
    #[must_use]
    #[expect(clippy::cast_possible_wrap)]
    pub fn gl_formats(self) -> (i32, u32) {
        match self {
            Self::One => (glow::R8 as i32, glow::RED),
            Self::Four => (glow::RGBA8 as i32, glow::RGBA),
        }
    }

    /// Largest `GL_UNPACK_ALIGNMENT` that tightly packed rows always satisfy.
    #[must_use]
    pub fn unpack_alignment(self) -> i32 {
        match self {
            Self::One => 1,
            Self::Four => 4,
        }
    }
}

/// Row-major 8-bit pixel data with an explicit row stride.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    channels: Channels,
    stride: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// A buffer whose rows follow each other with no padding.
    #[must_use]
    pub fn tight(width: u32, height: u32, channels: Channels, data: Vec<u8>) -> Self {
        let stride = width as usize * channels.bytes();
        Self::with_stride(width, height, channels, stride, data)
    }

    /// A buffer whose rows start `stride` bytes apart.
    #[must_use]
    pub fn with_stride(
        width: u32,
        height: u32,
        channels: Channels,
        stride: usize,
        data: Vec<u8>,
    ) -> Self {
        Self {
            width,
            height,
            channels,
            stride,
            data,
        }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Samples per pixel.
    #[must_use]
    pub fn channels(&self) -> Channels {
        self.channels
    }

    /// Bytes between the starts of consecutive rows.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Length of one row without padding.
    #[must_use]
    pub fn row_len(&self) -> usize {
        self.width as usize * self.channels.bytes()
    }

    /// Returns `true` if rows carry padding that must be stripped before
    /// upload.
    #[must_use]
    pub fn is_padded(&self) -> bool {
        self.stride > self.row_len()
    }

    /// Consume the buffer and return exactly `row_len * height` bytes of
    /// tightly packed rows, repacking padded rows if needed.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::UnsupportedStride`] if the stride is shorter
    /// than a row or the data cannot hold `height` rows at that stride.
    pub fn into_tight(self) -> Result<Vec<u8>, TextureError> {
        let row_len = self.row_len();
        let rows = self.height as usize;
        let required = match rows {
            0 => Some(0),
            _ => self
                .stride
                .checked_mul(rows - 1)
                .and_then(|n| n.checked_add(row_len)),
        };

        match required {
            Some(required) if self.stride >= row_len && self.data.len() >= required => {}
            _ => {
                return Err(TextureError::UnsupportedStride {
                    stride: self.stride,
                    width: self.width,
                    channels: self.channels.bytes(),
                    len: self.data.len(),
                })
            }
        }

        if self.stride == row_len {
            let mut data = self.data;
            data.truncate(row_len * rows);
            return Ok(data);
        }

        let mut packed = Vec::with_capacity(row_len * rows);
        for row in self.data.chunks(self.stride).take(rows) {
            packed.extend_from_slice(&row[..row_len]);
        }
        Ok(packed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{GrayImage, Rgba};

    #[test]
    fn dynamic_image_layouts_are_tagged() {
        let gray16 = DynamicImage::ImageLuma16(ImageBuffer::new(2, 3));
        assert!(matches!(PixelSource::from(gray16), PixelSource::Gray16(_)));

        let rgba = DynamicImage::ImageRgba8(RgbaImage::new(2, 3));
        assert!(matches!(PixelSource::from(rgba), PixelSource::Rgba8(_)));

        let rgb = DynamicImage::ImageRgb8(image::RgbImage::new(2, 3));
        let source = PixelSource::from(rgb);
        assert!(matches!(source, PixelSource::Other(_)));
        assert_eq!(source.dimensions(), (2, 3));
        assert_eq!(source.layout_name(), "other");
    }

    #[test]
    fn gray16_narrows_to_one_channel() {
        let mut buffer: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(3, 1);
        buffer.put_pixel(0, 0, Luma([0]));
        buffer.put_pixel(1, 0, Luma([u16::MAX]));
        buffer.put_pixel(2, 0, Luma([u16::MAX]));

        let pixels = PixelSource::Gray16(buffer).into_pixel_buffer();
        assert_eq!(pixels.channels(), Channels::One);
        assert_eq!(pixels.stride(), 3);
        assert_eq!(pixels.into_tight().unwrap(), vec![0, 255, 255]);
    }

    #[test]
    fn gray16_keeps_high_byte_without_rounding() {
        let mut buffer: ImageBuffer<Luma<u16>, Vec<u16>> = ImageBuffer::new(3, 1);
        buffer.put_pixel(0, 0, Luma([0x80FF]));
        buffer.put_pixel(1, 0, Luma([0x00FF]));
        buffer.put_pixel(2, 0, Luma([0x1234]));

        let pixels = PixelSource::Gray16(buffer).into_pixel_buffer();
        assert_eq!(pixels.into_tight().unwrap(), vec![0x80, 0x00, 0x12]);
    }

    #[test]
    fn translucent_other_layout_keeps_straight_alpha() {
        let mut luma_alpha = image::GrayAlphaImage::new(1, 1);
        luma_alpha.put_pixel(0, 0, image::LumaA([200, 64]));

        let pixels = PixelSource::from(DynamicImage::ImageLumaA8(luma_alpha)).into_pixel_buffer();
        assert_eq!(pixels.channels(), Channels::Four);
        assert_eq!(pixels.into_tight().unwrap(), vec![200, 200, 200, 64]);
    }

    #[test]
    fn rgba8_passes_through_unchanged() {
        let mut buffer = RgbaImage::new(2, 1);
        buffer.put_pixel(0, 0, Rgba([1, 2, 3, 4]));
        buffer.put_pixel(1, 0, Rgba([5, 6, 7, 8]));

        let pixels = PixelSource::from(buffer).into_pixel_buffer();
        assert_eq!(pixels.channels(), Channels::Four);
        assert_eq!(pixels.into_tight().unwrap(), vec![1, 2, 3, 4, 5, 6, 7, 8]);
    }

    #[test]
    fn other_layouts_convert_to_opaque_rgba() {
        let mut gray = GrayImage::new(1, 1);
        gray.put_pixel(0, 0, Luma([200]));

        let pixels = PixelSource::from(DynamicImage::ImageLuma8(gray)).into_pixel_buffer();
        assert_eq!(pixels.channels(), Channels::Four);
        assert_eq!(pixels.into_tight().unwrap(), vec![200, 200, 200, 255]);
    }

    #[test]
    fn padded_rows_are_repacked() {
        // Two rows of 3 gray pixels, padded to 4 bytes each.
        let data = vec![1, 2, 3, 0xEE, 4, 5, 6, 0xEE];
        let buffer = PixelBuffer::with_stride(3, 2, Channels::One, 4, data);
        assert!(buffer.is_padded());
        assert_eq!(buffer.into_tight().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn final_row_may_omit_padding() {
        let data = vec![1, 2, 3, 0xEE, 4, 5, 6];
        let buffer = PixelBuffer::with_stride(3, 2, Channels::One, 4, data);
        assert_eq!(buffer.into_tight().unwrap(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn stride_shorter_than_row_is_rejected() {
        let buffer = PixelBuffer::with_stride(4, 1, Channels::Four, 8, vec![0; 16]);
        let err = buffer.into_tight().unwrap_err();
        assert!(matches!(
            err,
            TextureError::UnsupportedStride {
                stride: 8,
                width: 4,
                channels: 4,
                len: 16,
            }
        ));
    }

    #[test]
    fn short_data_is_rejected() {
        let buffer = PixelBuffer::tight(2, 2, Channels::Four, vec![0; 15]);
        assert!(matches!(
            buffer.into_tight(),
            Err(TextureError::UnsupportedStride { .. })
        ));
    }

    #[test]
    fn tight_buffer_drops_trailing_bytes() {
        let buffer = PixelBuffer::tight(1, 1, Channels::One, vec![9, 1, 1]);
        assert_eq!(buffer.into_tight().unwrap(), vec![9]);
    }
}
