//! OpenGL helper utilities built on [glow].
//!
//! - [`Texture`] decodes PNG/JPEG images with the [image] crate and uploads
//!   them as sampled 2D textures (linear filtering, clamp-to-edge wrapping).
//!   16-bit grayscale becomes a single-channel texture, non-premultiplied
//!   RGBA is uploaded without a copy, and every other layout is converted to
//!   RGBA first.
//! - [`geometry`] approximates circles with regular polygons, computes
//!   bounding boxes, and fills polygons into triangle meshes via [lyon].
//! - [`matrix`] narrows `f64` matrices to the `f32` that GL uniforms take.
//!
//! # Devices
//!
//! Texture operations take a [`GraphicsDevice`] explicitly instead of
//! relying on whichever context happens to be current. [`GlowDevice`] is the
//! OpenGL implementation; its constructor is `unsafe` because the wrapped
//! context must stay current on the calling thread.
//!
//! ```no_run
//! # use std::sync::Arc;
//! # fn example(gl: Arc<glow::Context>) -> Result<(), gl_utils::TextureError> {
//! use gl_utils::{GlowDevice, Texture};
//!
//! let device = unsafe { GlowDevice::new(gl) };
//! let texture = Texture::from_file(&device, "assets/logo.png")?;
//! texture.bind(&device);
//! // ... draw ...
//! texture.unbind(&device);
//! texture.destroy(&device);
//! # Ok(())
//! # }
//! ```
//!
//! # Errors
//!
//! Texture failures are logged through the [log] facade and returned as
//! [`TextureError`]; hosts typically skip the asset. Nothing panics.
//!
//! [glow]: https://docs.rs/glow
//! [image]: https://docs.rs/image
//! [lyon]: https://docs.rs/lyon
//! [log]: https://docs.rs/log

pub mod decode;
mod device;
mod error;
pub mod geometry;
pub mod matrix;
mod pixels;
mod texture;

pub use device::{GlowDevice, GraphicsDevice, TexImage2d};
pub use error::TextureError;
pub use geometry::{bounding_box, circle_to_polygon, BoundingBox, GeometryError};
pub use matrix::downcast_mat4;
pub use pixels::{Channels, PixelBuffer, PixelSource};
pub use texture::{ScopedTexture, Texture};
