//! Core library for turning tile atlas regions into renderable meshes.
//!
//! - Solvers: normal, 8/4-directional frame atlases, RPGMaker A2 ground and A4 wall autotiles
//! - Mesh: `MeshBuilder` batches sprites into a flat `[x, y, z, u, v]` triangle stream with optional slope
//! - Pipeline: `build_scene` takes a serde-described scene and returns one mesh per layer
//! - Data model is serde-serializable; JSON exporters live in `export`.
//!
//! Quick example:
//! ```ignore
//! use glam::{Vec2, Vec3};
//! use tilekit_core::prelude::*;
//! # fn main() -> tilekit_core::Result<()> {
//! let chunk = TextureChunk::full(TextureId(0));
//! let sprite = solve_8_directional(&chunk, Direction::UP_LEFT, Vec2::ONE)?;
//! let mut builder = MeshBuilder::new();
//! builder.add_sprite(&sprite, Vec3::new(3.0, 2.0, 0.0));
//! let mesh = builder.finish();
//! println!("vertices: {}", mesh.vertex_count());
//! # Ok(()) }
//! ```

pub mod config;
pub mod direction;
pub mod error;
pub mod export;
pub mod mesh;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod solvers;

pub use config::*;
pub use direction::*;
pub use error::*;
pub use export::*;
pub use mesh::*;
pub use model::*;
pub use pipeline::*;
pub use provider::*;
pub use solvers::*;

/// Convenience prelude for common types and functions.
/// Importing `tilekit_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{CardinalPriority, FrameLayout, SolverConfig, SolverConfigBuilder};
    pub use crate::direction::Direction;
    pub use crate::mesh::{Mesh, MeshBuilder, MeshVertex, Slope};
    pub use crate::model::{
        Piece, PixelRect, Rect2D, Sprite, TextureChunk, TextureId, Tile4Connections,
        Tile8Connections,
    };
    pub use crate::pipeline::{Scene, SceneOutput, SceneStats};
    pub use crate::provider::{MeshSink, MeshStore, TextureRegistry};
    pub use crate::solvers::{
        TileSolver, solve_4_directional, solve_8_directional, solve_normal, solve_rpgmaker_a2,
        solve_rpgmaker_a4_wall,
    };
    pub use crate::{Result, SpriteError, build_scene};
}
