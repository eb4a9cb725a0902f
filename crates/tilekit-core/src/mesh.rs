//! Sprite -> vertex stream compositing.
//!
//! Every piece becomes a quad made of two triangles (6 vertices, no index buffer):
//!
//! ```text
//!  3,6 ____ 5          uv: V is flipped against tile Y, so the
//!     |\   |               top texture row lands on the top edge
//!     | \  |
//!     |  \ |
//!     |___\|
//!    1     2,4
//! ```
//!
//! Heights come from a per-axis linear "slope": the X and Y contributions are clamped
//! independently and summed, which tilts a flat tile layer without any perspective.

use crate::model::{Piece, Sprite};
use crate::provider::MeshSink;
use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Scalars per vertex: position xyz + uv.
pub const FLOATS_PER_VERTEX: usize = 5;
/// Two triangles per piece.
pub const VERTICES_PER_PIECE: usize = 6;

/// Per-vertex data handed to the GPU layer.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub uv: [f32; 2],
}

/// Height mapping applied while adding a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Slope {
    /// Z units per destination Y unit.
    #[serde(default)]
    pub vertical: f32,
    /// Z units per destination X unit.
    #[serde(default)]
    pub horizontal: f32,
    #[serde(default = "neg_inf", skip_serializing_if = "is_neg_inf")]
    pub z_min: f32,
    #[serde(default = "pos_inf", skip_serializing_if = "is_pos_inf")]
    pub z_max: f32,
}

impl Default for Slope {
    fn default() -> Self {
        Self {
            vertical: 0.0,
            horizontal: 0.0,
            z_min: f32::NEG_INFINITY,
            z_max: f32::INFINITY,
        }
    }
}

impl Slope {
    pub fn new(vertical: f32, horizontal: f32) -> Self {
        Self {
            vertical,
            horizontal,
            ..Default::default()
        }
    }

    pub fn clamped(mut self, z_min: f32, z_max: f32) -> Self {
        self.z_min = z_min;
        self.z_max = z_max;
        self
    }

    /// Rejects slopes that would put non-finite heights into a mesh.
    ///
    /// Returns an error if:
    /// - A slope factor is NaN or infinite
    /// - A z bound is NaN, or `z_min > z_max`
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpriteError;

        if !self.vertical.is_finite() || !self.horizontal.is_finite() {
            return Err(SpriteError::InvalidConfig(format!(
                "slope factors must be finite, got vertical={} horizontal={}",
                self.vertical, self.horizontal
            )));
        }
        if self.z_min.is_nan() || self.z_max.is_nan() {
            return Err(SpriteError::InvalidConfig("z bounds must not be NaN".to_string()));
        }
        if self.z_min > self.z_max {
            return Err(SpriteError::InvalidConfig(format!(
                "z_min ({}) exceeds z_max ({})",
                self.z_min, self.z_max
            )));
        }
        Ok(())
    }

    // max/min rather than f32::clamp: no panic on inverted or NaN bounds.
    fn clamp(&self, z: f32) -> f32 {
        z.max(self.z_min).min(self.z_max)
    }

    fn z_x(&self, x: f32) -> f32 {
        self.clamp(x * self.horizontal)
    }

    fn z_y(&self, y: f32) -> f32 {
        self.clamp(y * self.vertical)
    }
}

fn neg_inf() -> f32 {
    f32::NEG_INFINITY
}
fn pos_inf() -> f32 {
    f32::INFINITY
}
fn is_neg_inf(v: &f32) -> bool {
    *v == f32::NEG_INFINITY
}
fn is_pos_inf(v: &f32) -> bool {
    *v == f32::INFINITY
}

/// Finished vertex stream, owned by the caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    vertices: Vec<MeshVertex>,
}

impl Mesh {
    pub fn vertices(&self) -> &[MeshVertex] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn piece_count(&self) -> usize {
        self.vertices.len() / VERTICES_PER_PIECE
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Flat `[x, y, z, u, v, ...]` view.
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn into_vertices(self) -> Vec<MeshVertex> {
        self.vertices
    }
}

/// Accumulates sprites into one vertex stream.
///
/// Single-writer: one builder per thread. `finish` hands the buffer out and leaves the
/// builder empty and reusable.
#[derive(Debug, Clone)]
pub struct MeshBuilder {
    staging: Vec<MeshVertex>,
    capacity: usize,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MeshBuilder {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Builder whose staging buffer reserves `vertices` up front (and again after each finish).
    pub fn with_capacity(vertices: usize) -> Self {
        Self {
            staging: Vec::with_capacity(vertices),
            capacity: vertices,
        }
    }

    pub fn pending_vertices(&self) -> usize {
        self.staging.len()
    }

    pub fn is_empty(&self) -> bool {
        self.staging.is_empty()
    }

    /// Adds a sprite placed at `offset` (tile units), flat.
    pub fn add_sprite(&mut self, sprite: &Sprite, offset: Vec3) {
        self.add_sprite_sloped(sprite, offset, Slope::default());
    }

    /// Adds a sprite placed at `offset` (tile units) with a height slope.
    pub fn add_sprite_sloped(&mut self, sprite: &Sprite, offset: Vec3, slope: Slope) {
        trace!(
            pieces = sprite.pieces.len(),
            texture = sprite.texture.0,
            "add sprite"
        );
        self.staging
            .reserve(sprite.pieces.len() * VERTICES_PER_PIECE);
        for piece in &sprite.pieces {
            self.push_piece(piece, offset, &slope);
        }
    }

    fn push_piece(&mut self, piece: &Piece, offset: Vec3, slope: &Slope) {
        let dst = piece.destination;
        let uv = piece.source;
        let (x0, y0) = (dst.start.x + offset.x, dst.start.y + offset.y);
        let (x1, y1) = (dst.end.x + offset.x, dst.end.y + offset.y);
        let (zx0, zx1) = (slope.z_x(dst.start.x), slope.z_x(dst.end.x));
        let (zy0, zy1) = (slope.z_y(dst.start.y), slope.z_y(dst.end.y));
        let z = |zx: f32, zy: f32| zx + zy + offset.z;

        let bottom_left = MeshVertex {
            position: [x0, y0, z(zx0, zy0)],
            uv: [uv.start.x, uv.end.y],
        };
        let bottom_right = MeshVertex {
            position: [x1, y0, z(zx1, zy0)],
            uv: [uv.end.x, uv.end.y],
        };
        let top_left = MeshVertex {
            position: [x0, y1, z(zx0, zy1)],
            uv: [uv.start.x, uv.start.y],
        };
        let top_right = MeshVertex {
            position: [x1, y1, z(zx1, zy1)],
            uv: [uv.end.x, uv.start.y],
        };
        self.staging.extend_from_slice(&[
            bottom_left,
            bottom_right,
            top_left,
            bottom_right,
            top_right,
            top_left,
        ]);
    }

    /// Returns the accumulated mesh and resets staging to a fresh, empty buffer.
    pub fn finish(&mut self) -> Mesh {
        let vertices = std::mem::replace(&mut self.staging, Vec::with_capacity(self.capacity));
        debug!(vertices = vertices.len(), "mesh finished");
        Mesh { vertices }
    }

    /// Finishes the mesh and hands it straight to `sink`.
    pub fn finish_into<S: MeshSink>(&mut self, sink: &mut S) -> Result<S::Handle, S::Error> {
        sink.upload(self.finish())
    }
}
