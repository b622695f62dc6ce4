//! The graphics device seam used by the texture pipeline.
//!
//! [`GraphicsDevice`] is the small slice of the GL API that texture creation
//! needs. [`GlowDevice`] forwards it to a [`glow::Context`]; tests substitute
//! a recording fake.

use std::fmt;
use std::sync::Arc;

use glow::{HasContext, PixelUnpackData};

/// Arguments to a 2D texture upload (`glTexImage2D` on `GL_TEXTURE_2D`,
/// mip level 0, no border).
#[derive(Debug, Clone, Copy)]
pub struct TexImage2d<'a> {
    /// Internal format, e.g. `glow::RGBA8 as i32`.
    pub internal_format: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
    /// Source pixel format, e.g. `glow::RGBA`.
    pub format: u32,
    /// Source element type, e.g. `glow::UNSIGNED_BYTE`.
    pub ty: u32,
    /// Tightly packed source rows.
    pub pixels: &'a [u8],
}

/// Texture-related capabilities of a graphics device.
///
/// Every method acts on the `GL_TEXTURE_2D` target of the device's currently
/// active texture unit, mirroring the GL state machine.
pub trait GraphicsDevice {
    /// Opaque texture handle issued by the device.
    type Texture: Copy + fmt::Debug + PartialEq;

    /// Allocate a new texture name.
    ///
    /// # Errors
    ///
    /// Returns the device's description of the failure.
    fn create_texture(&self) -> Result<Self::Texture, String>;

    /// Make `unit` (an index, not `GL_TEXTURE0 + index`) the active unit.
    fn active_texture(&self, unit: u32);

    /// Bind `texture` to the 2D target, or clear the binding with `None`.
    fn bind_texture(&self, texture: Option<Self::Texture>);

    /// Set an integer sampler parameter on the bound texture.
    fn tex_parameter(&self, parameter: u32, value: i32);

    /// Set the row alignment used when reading client pixel data.
    fn unpack_alignment(&self, alignment: i32);

    /// Upload level 0 of the bound texture.
    fn tex_image_2d(&self, image: &TexImage2d<'_>);

    /// Release a texture name.
    fn delete_texture(&self, texture: Self::Texture);
}

/// [`GraphicsDevice`] backed by an OpenGL context via [glow].
///
/// [glow]: https://docs.rs/glow
#[derive(Clone)]
pub struct GlowDevice {
    gl: Arc<glow::Context>,
}

impl GlowDevice {
    /// Wrap a GL context.
    ///
    /// # Safety
    ///
    /// `gl` must be a valid context that is current on the thread making every
    /// subsequent call through this device.
    #[must_use]
    pub unsafe fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }

    /// Returns the wrapped context.
    #[must_use]
    pub fn gl(&self) -> &glow::Context {
        &self.gl
    }
}

impl fmt::Debug for GlowDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GlowDevice").finish_non_exhaustive()
    }
}

// SAFETY (all methods): `GlowDevice::new` requires the context to be current
// on the calling thread for the lifetime of the device.
impl GraphicsDevice for GlowDevice {
    type Texture = glow::Texture;

    fn create_texture(&self) -> Result<glow::Texture, String> {
        unsafe { self.gl.create_texture() }
    }

    fn active_texture(&self, unit: u32) {
        unsafe { self.gl.active_texture(glow::TEXTURE0 + unit) };
    }

    fn bind_texture(&self, texture: Option<glow::Texture>) {
        unsafe { self.gl.bind_texture(glow::TEXTURE_2D, texture) };
    }

    fn tex_parameter(&self, parameter: u32, value: i32) {
        unsafe { self.gl.tex_parameter_i32(glow::TEXTURE_2D, parameter, value) };
    }

    fn unpack_alignment(&self, alignment: i32) {
        unsafe { self.gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, alignment) };
    }

    fn tex_image_2d(&self, image: &TexImage2d<'_>) {
        unsafe {
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                image.internal_format,
                image.width,
                image.height,
                0,
                image.format,
                image.ty,
                PixelUnpackData::Slice(Some(image.pixels)),
            );
        }
    }

    fn delete_texture(&self, texture: glow::Texture) {
        unsafe { self.gl.delete_texture(texture) };
    }
}
