//! 2D geometry helpers: circle approximation, bounding boxes, and polygon
//! fill meshes.

use bytemuck::{Pod, Zeroable};
use glam::{Mat2, Vec2};
use lyon::math::point;
use lyon::path::Path as LyonPath;
use lyon::tessellation::{
    BuffersBuilder, FillOptions, FillRule, FillTessellator, FillVertex, VertexBuffers,
};
use thiserror::Error;

/// Invalid arguments passed to a geometry helper.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeometryError {
    /// The circle radius was zero, negative or NaN.
    #[error("invalid argument: radius must be > 0, got {0}")]
    NonPositiveRadius(f32),
    /// Fewer than three segments cannot enclose an area.
    #[error("invalid argument: segment count must be >= 3, got {0}")]
    TooFewSegments(usize),
}

/// Approximate a circle with a regular polygon of `segments` vertices.
///
/// The first vertex sits at `start_angle` radians from the positive X axis and
/// the rest follow counter-clockwise. Each vertex is obtained by applying the
/// same rotation to the previous one, so floating-point drift accumulates
/// over very large segment counts.
///
/// # Errors
///
/// Returns [`GeometryError::NonPositiveRadius`] if `radius <= 0` and
/// [`GeometryError::TooFewSegments`] if `segments < 3`.
pub fn circle_to_polygon(
    center: Vec2,
    radius: f32,
    segments: usize,
    start_angle: f32,
) -> Result<Vec<Vec2>, GeometryError> {
    if radius.is_nan() || radius <= 0.0 {
        return Err(GeometryError::NonPositiveRadius(radius));
    }
    if segments < 3 {
        return Err(GeometryError::TooFewSegments(segments));
    }

    // The step is computed in f64 and narrowed once.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let step = (std::f64::consts::TAU / segments as f64) as f32;
    let rotation = Mat2::from_angle(step);

    let mut offset = Mat2::from_angle(start_angle) * Vec2::new(radius, 0.0);
    let mut vertices = Vec::with_capacity(segments);
    for _ in 0..segments {
        vertices.push(center + offset);
        offset = rotation * offset;
    }
    Ok(vertices)
}

/// Axis-aligned box bounding a set of 2D points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Smallest X and Y over all points.
    pub min: Vec2,
    /// Largest X and Y over all points.
    pub max: Vec2,
}

impl BoundingBox {
    /// The box returned for an empty point set: `min` is `f32::MAX` on both
    /// axes and `max` is `-f32::MAX`, so any real point extends it.
    pub const EMPTY: Self = Self {
        min: Vec2::splat(f32::MAX),
        max: Vec2::splat(-f32::MAX),
    };

    /// Returns `true` for the degenerate box of an empty point set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Width and height of the box. Zero for an empty box.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        if self.is_empty() {
            Vec2::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Midpoint of the box, or `None` for an empty box.
    #[must_use]
    pub fn center(&self) -> Option<Vec2> {
        (!self.is_empty()).then(|| (self.min + self.max) * 0.5)
    }
}

/// Compute the bounding box of `points` in a single pass.
///
/// An empty slice yields [`BoundingBox::EMPTY`]; check
/// [`BoundingBox::is_empty`] before using the corners.
#[must_use]
pub fn bounding_box(points: &[Vec2]) -> BoundingBox {
    points.iter().fold(BoundingBox::EMPTY, |bounds, p| BoundingBox {
        min: bounds.min.min(*p),
        max: bounds.max.max(*p),
    })
}

/// A polygon vertex, ready for a GPU vertex buffer.
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct Vertex {
    /// Position in the polygon's coordinate space.
    pub position: [f32; 2],
}

/// A filled polygon stored as indexed triangle data.
///
/// Drawn with `glDrawElements(GL_TRIANGLES, ...)`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonMesh {
    /// Unique vertices of the triangulation.
    pub vertices: Vec<Vertex>,
    /// Triangle list, three indices per triangle.
    pub indices: Vec<u32>,
}

impl PolygonMesh {
    /// Vertex data as raw bytes for `buffer_data_u8_slice`.
    #[must_use]
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as raw bytes for an element buffer.
    #[must_use]
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Fill the closed polygon described by `points` into a triangle mesh.
///
/// Returns `None` for fewer than three points or when tessellation produces
/// no triangles (for example, all points collinear).
#[must_use]
pub fn polygon_mesh(points: &[Vec2]) -> Option<PolygonMesh> {
    let (first, rest) = points.split_first()?;
    if rest.len() < 2 {
        return None;
    }

    let mut builder = LyonPath::builder();
    builder.begin(point(first.x, first.y));
    for p in rest {
        builder.line_to(point(p.x, p.y));
    }
    builder.close();
    let path = builder.build();

    let mut geometry: VertexBuffers<Vertex, u32> = VertexBuffers::new();
    let mut tessellator = FillTessellator::new();
    let result = tessellator.tessellate_path(
        &path,
        &FillOptions::tolerance(0.01).with_fill_rule(FillRule::NonZero),
        &mut BuffersBuilder::new(&mut geometry, |vertex: FillVertex| Vertex {
            position: vertex.position().to_array(),
        }),
    );

    match result {
        Ok(()) if !geometry.indices.is_empty() => Some(PolygonMesh {
            vertices: geometry.vertices,
            indices: geometry.indices,
        }),
        Ok(()) => None,
        Err(err) => {
            log::warn!("polygon tessellation failed: {err:?}");
            None
        }
    }
}
