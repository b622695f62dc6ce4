//! GPU texture creation, binding and release.
//!
//! Every operation takes the [`GraphicsDevice`] explicitly. Creation leaves
//! the 2D binding of texture unit 0 cleared, and any failure after the handle
//! was allocated releases it again.

use std::fmt;
use std::path::Path;

use crate::decode;
use crate::device::{GraphicsDevice, TexImage2d};
use crate::error::TextureError;
use crate::pixels::{Channels, PixelBuffer, PixelSource};

/// Convert a `u32` dimension to the `i32` GL expects.
fn gl_size(value: u32) -> Result<i32, TextureError> {
    i32::try_from(value).map_err(|_| TextureError::DimensionTooLarge(value))
}

/// Reject empty or oversized dimensions, returning them as GL sizes.
fn checked_size(width: u32, height: u32) -> Result<(i32, i32), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::EmptyDimensions { width, height });
    }
    Ok((gl_size(width)?, gl_size(height)?))
}

/// Allocate a zero-filled `width * height` buffer without panicking on
/// overflow or allocation failure.
fn zeroed_buffer(width: u32, height: u32, channels: Channels) -> Result<Vec<u8>, TextureError> {
    let too_large = || TextureError::BufferTooLarge {
        width,
        height,
        bytes_per_pixel: channels.bytes(),
    };
    let len = usize::try_from(width)
        .ok()
        .zip(usize::try_from(height).ok())
        .and_then(|(w, h)| w.checked_mul(h))
        .and_then(|n| n.checked_mul(channels.bytes()))
        .ok_or_else(too_large)?;

    let mut buffer = Vec::new();
    buffer.try_reserve_exact(len).map_err(|_| too_large())?;
    buffer.resize(len, 0);
    Ok(buffer)
}

/// Log a creation failure and hand it back.
fn report(err: TextureError) -> TextureError {
    log::error!("Error creating texture: {err}");
    err
}

/// A 2D texture resident on a graphics device.
///
/// The handle is not released on drop; call [`Texture::destroy`] or wrap the
/// texture in a [`ScopedTexture`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture<T> {
    id: T,
    width: u32,
    height: u32,
}

impl<T: Copy + fmt::Debug + PartialEq> Texture<T> {
    /// Load an image file and upload it.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::Open`] or [`TextureError::Decode`] if the file
    /// cannot be loaded, plus any error of [`Texture::from_image`].
    pub fn from_file<D>(device: &D, path: impl AsRef<Path>) -> Result<Self, TextureError>
    where
        D: GraphicsDevice<Texture = T>,
    {
        let decoded = decode::decode_file(path.as_ref()).map_err(report)?;
        Self::from_image(device, decoded)
    }

    /// Decode an in-memory image and upload it.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::DecodeBytes`] if the bytes cannot be decoded,
    /// plus any error of [`Texture::from_image`].
    pub fn from_bytes<D>(device: &D, bytes: &[u8]) -> Result<Self, TextureError>
    where
        D: GraphicsDevice<Texture = T>,
    {
        let decoded = decode::decode_bytes(bytes).map_err(report)?;
        Self::from_image(device, decoded)
    }

    /// Upload a decoded image.
    ///
    /// 16-bit grayscale becomes a single-channel `R8` texture, non-premultiplied
    /// RGBA is uploaded as-is, and every other layout is converted to RGBA
    /// first. Filtering is linear and wrapping clamps to the edge.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::EmptyDimensions`] or
    /// [`TextureError::DimensionTooLarge`] for unusable sizes and
    /// [`TextureError::Allocation`] if the device has no texture names left.
    pub fn from_image<D>(device: &D, image: impl Into<PixelSource>) -> Result<Self, TextureError>
    where
        D: GraphicsDevice<Texture = T>,
    {
        let source = image.into();
        let layout = source.layout_name();
        let (width, height) = source.dimensions();
        checked_size(width, height).map_err(report)?;

        let texture = Self::from_pixels(device, source.into_pixel_buffer())?;
        log::debug!("Uploaded {width}x{height} {layout} texture {:?}", texture.id);
        Ok(texture)
    }

    /// Upload caller-owned pixel rows.
    ///
    /// Padded rows are repacked before upload.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::UnsupportedStride`] if the buffer's stride
    /// cannot describe its rows, plus the size and allocation errors of
    /// [`Texture::from_image`]. The allocated handle is released on failure.
    pub fn from_pixels<D>(device: &D, pixels: PixelBuffer) -> Result<Self, TextureError>
    where
        D: GraphicsDevice<Texture = T>,
    {
        let (width, height) = (pixels.width(), pixels.height());
        let (gl_width, gl_height) = checked_size(width, height).map_err(report)?;
        let channels = pixels.channels();
        let padded = pixels.is_padded();

        let scoped = ScopedTexture::allocate(device, width, height).map_err(report)?;
        let texture = scoped.texture();
        configure(device, texture.id);

        let result = pixels.into_tight().map(|data| {
            if padded {
                log::warn!("Repacked padded rows for {width}x{height} texture upload");
            }
            upload(device, channels, gl_width, gl_height, &data);
        });
        device.bind_texture(None);

        result.map_err(report)?;
        Ok(scoped.into_inner())
    }

    /// Create a zero-filled texture, e.g. as a render target.
    ///
    /// `pixel_format` is used as both the internal and the source format
    /// (`glow::RGBA`, `glow::RED`, ...). Device-side errors for unsuitable
    /// formats are not observed.
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::EmptyDimensions`],
    /// [`TextureError::DimensionTooLarge`], [`TextureError::BufferTooLarge`]
    /// if the zeroed pixels cannot be allocated, or
    /// [`TextureError::Allocation`].
    pub fn empty<D>(
        device: &D,
        width: u32,
        height: u32,
        pixel_format: u32,
    ) -> Result<Self, TextureError>
    where
        D: GraphicsDevice<Texture = T>,
    {
        let (gl_width, gl_height) = checked_size(width, height).map_err(report)?;
        let zeroed = zeroed_buffer(width, height, Channels::Four).map_err(report)?;

        let scoped = ScopedTexture::allocate(device, width, height).map_err(report)?;
        let texture = scoped.texture();
        configure(device, texture.id);

        // GL format enums are small enough that the cast is always safe.
        #[expect(clippy::cast_possible_wrap)]
        let internal_format = pixel_format as i32;
        device.unpack_alignment(Channels::Four.unpack_alignment());
        device.tex_image_2d(&TexImage2d {
            internal_format,
            width: gl_width,
            height: gl_height,
            format: pixel_format,
            ty: glow::UNSIGNED_BYTE,
            pixels: &zeroed,
        });
        device.bind_texture(None);

        Ok(scoped.into_inner())
    }

    /// Bind to the 2D target of the active texture unit.
    pub fn bind<D>(&self, device: &D)
    where
        D: GraphicsDevice<Texture = T>,
    {
        device.bind_texture(Some(self.id));
    }

    /// Activate texture unit `unit` and bind to its 2D target.
    pub fn bind_to_unit<D>(&self, device: &D, unit: u32)
    where
        D: GraphicsDevice<Texture = T>,
    {
        device.active_texture(unit);
        device.bind_texture(Some(self.id));
    }

    /// Clear the 2D binding of the active texture unit.
    pub fn unbind<D>(&self, device: &D)
    where
        D: GraphicsDevice<Texture = T>,
    {
        device.bind_texture(None);
    }

    /// The device handle of this texture.
    #[must_use]
    pub fn id(&self) -> T {
        self.id
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

    /// `(width, height)` in pixels.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Release the device handle.
    pub fn destroy<D>(self, device: &D)
    where
        D: GraphicsDevice<Texture = T>,
    {
        device.delete_texture(self.id);
    }

    /// Tie the texture's lifetime to a scope on `device`.
    #[must_use]
    pub fn scoped<D>(self, device: &D) -> ScopedTexture<'_, D>
    where
        D: GraphicsDevice<Texture = T>,
    {
        ScopedTexture {
            device,
            texture: self,
            armed: true,
        }
    }
}

/// Bind `id` on unit 0 and apply the fixed sampler policy.
fn configure<D: GraphicsDevice>(device: &D, id: D::Texture) {
    // GL constant values are small enough that the cast is always safe.
    #[expect(clippy::cast_possible_wrap)]
    let params = [
        (glow::TEXTURE_MIN_FILTER, glow::LINEAR as i32),
        (glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32),
        (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE as i32),
        (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE as i32),
    ];

    device.active_texture(0);
    device.bind_texture(Some(id));
    for (parameter, value) in params {
        device.tex_parameter(parameter, value);
    }
}

fn upload<D: GraphicsDevice>(device: &D, channels: Channels, width: i32, height: i32, data: &[u8]) {
    let (internal_format, format) = channels.gl_formats();
    device.unpack_alignment(channels.unpack_alignment());
    device.tex_image_2d(&TexImage2d {
        internal_format,
        width,
        height,
        format,
        ty: glow::UNSIGNED_BYTE,
        pixels: data,
    });
}

/// A texture that is released when dropped.
///
/// Call [`ScopedTexture::into_inner`] to keep the handle alive past the
/// scope.
pub struct ScopedTexture<'d, D: GraphicsDevice> {
    device: &'d D,
    texture: Texture<D::Texture>,
    armed: bool,
}

impl<'d, D: GraphicsDevice> ScopedTexture<'d, D> {
    fn allocate(device: &'d D, width: u32, height: u32) -> Result<Self, TextureError> {
        let id = device.create_texture().map_err(TextureError::Allocation)?;
        Ok(Texture { id, width, height }.scoped(device))
    }

    /// The guarded texture.
    #[must_use]
    pub fn texture(&self) -> Texture<D::Texture> {
        self.texture
    }

    /// Disarm the guard and return the texture without releasing it.
    #[must_use]
    pub fn into_inner(mut self) -> Texture<D::Texture> {
        self.armed = false;
        self.texture
    }
}

impl<D: GraphicsDevice> Drop for ScopedTexture<'_, D> {
    fn drop(&mut self) {
        if self.armed {
            log::debug!("Releasing texture {:?}", self.texture.id);
            self.device.delete_texture(self.texture.id);
        }
    }
}

impl<D: GraphicsDevice> fmt::Debug for ScopedTexture<'_, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedTexture")
            .field("texture", &self.texture)
            .field("armed", &self.armed)
            .finish_non_exhaustive()
    }
}
