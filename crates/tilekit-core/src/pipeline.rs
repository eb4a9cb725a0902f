use crate::config::SolverConfig;
use crate::error::{Result, SpriteError};
use crate::mesh::{Mesh, MeshBuilder, Slope};
use crate::model::Rect2D;
use crate::provider::{ChunkDesc, MeshSink, TextureDesc, TextureRegistry};
use crate::solvers::TileSolver;
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// One placed tile: which atlas region, how to solve it, and where it goes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TileDesc {
    pub texture: String,
    #[serde(default)]
    pub chunk: ChunkDesc,
    pub solver: TileSolver,
    /// Placement in tile units.
    #[serde(default)]
    pub offset: Vec3,
    /// Overrides `config.mesh.default_slope`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope: Option<Slope>,
}

/// A named group of tiles that becomes one mesh.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LayerDesc {
    pub name: String,
    #[serde(default)]
    pub tiles: Vec<TileDesc>,
}

/// Scene description: atlases, configuration, and layers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Scene {
    #[serde(default)]
    pub config: SolverConfig,
    #[serde(default)]
    pub textures: Vec<TextureDesc>,
    #[serde(default)]
    pub layers: Vec<LayerDesc>,
}

impl Scene {
    pub fn from_json(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn registry(&self) -> TextureRegistry {
        let mut reg = TextureRegistry::new();
        for tex in &self.textures {
            reg.register(tex.clone());
        }
        reg
    }
}

/// Mesh of one layer plus bookkeeping.
#[derive(Debug, Clone)]
pub struct LayerMesh {
    pub name: String,
    pub mesh: Mesh,
    pub tiles: usize,
    /// Union of every tile's sprite bounds, offset applied.
    pub bounds: Rect2D,
}

/// Output of a scene build: one mesh per layer, in scene order.
#[derive(Debug, Clone, Default)]
pub struct SceneOutput {
    pub layers: Vec<LayerMesh>,
}

/// Statistics about a built scene.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneStats {
    pub num_layers: usize,
    pub num_tiles: usize,
    pub num_pieces: usize,
    pub num_vertices: usize,
    /// Union of all layer bounds; `None` when no layer has tiles.
    pub bounds: Option<Rect2D>,
}

impl SceneOutput {
    /// Computes statistics for this output.
    pub fn stats(&self) -> SceneStats {
        let mut bounds: Option<Rect2D> = None;
        for layer in self.layers.iter().filter(|l| l.tiles > 0) {
            bounds = Some(match bounds {
                Some(b) => b.union(&layer.bounds),
                None => layer.bounds,
            });
        }
        SceneStats {
            num_layers: self.layers.len(),
            num_tiles: self.layers.iter().map(|l| l.tiles).sum(),
            num_pieces: self.layers.iter().map(|l| l.mesh.piece_count()).sum(),
            num_vertices: self.layers.iter().map(|l| l.mesh.vertex_count()).sum(),
            bounds,
        }
    }

    /// Hands every layer mesh to `sink`, returning `(layer name, handle)` pairs.
    pub fn upload_all<S: MeshSink>(
        self,
        sink: &mut S,
    ) -> std::result::Result<Vec<(String, S::Handle)>, S::Error> {
        self.layers
            .into_iter()
            .map(|l| Ok((l.name, sink.upload(l.mesh)?)))
            .collect()
    }
}

impl SceneStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        let bounds = match self.bounds {
            Some(b) => format!(
                "({:.2}, {:.2})..({:.2}, {:.2})",
                b.start.x, b.start.y, b.end.x, b.end.y
            ),
            None => "empty".to_string(),
        };
        format!(
            "Layers: {}, Tiles: {}, Pieces: {}, Vertices: {}, Bounds: {}",
            self.num_layers, self.num_tiles, self.num_pieces, self.num_vertices, bounds,
        )
    }
}

#[instrument(skip_all)]
/// Solves every tile of every layer and builds one mesh per layer.
///
/// Notes:
/// - Layer order is preserved, also on the parallel path.
/// - A failing tile aborts the build with `SpriteError::Tile` naming the layer and index.
pub fn build_scene(scene: &Scene) -> Result<SceneOutput> {
    scene.config.validate()?;
    if scene.layers.is_empty() {
        return Err(SpriteError::Empty);
    }
    let registry = scene.registry();
    let cfg = &scene.config;
    let start = Instant::now();

    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            let layers = scene
                .layers
                .par_iter()
                .map(|layer| build_layer(&registry, layer, cfg))
                .collect::<Result<Vec<_>>>()?;
            debug!(layers = layers.len(), elapsed = ?start.elapsed(), "scene built (parallel)");
            return Ok(SceneOutput { layers });
        }
    }

    let layers = scene
        .layers
        .iter()
        .map(|layer| build_layer(&registry, layer, cfg))
        .collect::<Result<Vec<_>>>()?;
    debug!(layers = layers.len(), elapsed = ?start.elapsed(), "scene built");
    Ok(SceneOutput { layers })
}

/// Builds a single layer with its own builder.
pub fn build_layer(
    registry: &TextureRegistry,
    layer: &LayerDesc,
    cfg: &SolverConfig,
) -> Result<LayerMesh> {
    let mut builder = MeshBuilder::with_capacity(cfg.mesh.initial_capacity);
    let mut bounds = Rect2D::default();
    for (index, tile) in layer.tiles.iter().enumerate() {
        let wrap = |e: SpriteError| SpriteError::Tile {
            layer: layer.name.clone(),
            index,
            source: Box::new(e),
        };
        let chunk = registry.chunk(&tile.texture, &tile.chunk).map_err(wrap)?;
        let sprite = tile.solver.solve(&chunk, cfg).map_err(wrap)?;
        let slope = match tile.slope {
            Some(own) => {
                own.validate().map_err(wrap)?;
                own
            }
            None => cfg.mesh.default_slope,
        };
        builder.add_sprite_sloped(&sprite, tile.offset, slope);
        let placed = sprite.bounds().translated(tile.offset.truncate());
        bounds = if index == 0 {
            placed
        } else {
            bounds.union(&placed)
        };
    }
    Ok(LayerMesh {
        name: layer.name.clone(),
        mesh: builder.finish(),
        tiles: layer.tiles.len(),
        bounds,
    })
}
