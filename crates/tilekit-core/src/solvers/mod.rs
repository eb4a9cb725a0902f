use crate::config::SolverConfig;
use crate::direction::Direction;
use crate::error::Result;
use crate::model::{Sprite, TextureChunk, Tile4Connections, Tile8Connections};
use glam::Vec2;
use serde::{Deserialize, Serialize};

pub mod autotile;
pub mod directional;
pub mod normal;

pub use autotile::{
    AutotileScheme, RpgMakerA2, RpgMakerA4Wall, solve_autotile, solve_rpgmaker_a2,
    solve_rpgmaker_a4_wall,
};
pub use directional::{
    solve_4_directional, solve_4_directional_with, solve_8_directional,
    solve_8_directional_with,
};
pub use normal::solve_normal;

/// Declarative choice of solver plus its per-tile context.
///
/// Solvers are pure: the same chunk and context always produce the same sprite, and the
/// chunk is never modified.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileSolver {
    Normal {
        #[serde(default = "one_tile")]
        target_size: Vec2,
    },
    Directional8 {
        direction: Direction,
        #[serde(default = "one_tile")]
        target_size: Vec2,
    },
    Directional4 {
        direction: Direction,
        #[serde(default = "one_tile")]
        target_size: Vec2,
    },
    RpgmakerA2 {
        #[serde(default)]
        connections: Tile8Connections,
    },
    RpgmakerA4Wall {
        #[serde(default)]
        connections: Tile4Connections,
    },
}

fn one_tile() -> Vec2 {
    Vec2::ONE
}

impl TileSolver {
    pub fn solve(&self, chunk: &TextureChunk, cfg: &SolverConfig) -> Result<Sprite> {
        match self {
            TileSolver::Normal { target_size } => Ok(solve_normal(chunk, *target_size)),
            TileSolver::Directional8 {
                direction,
                target_size,
            } => solve_8_directional_with(chunk, *direction, *target_size, cfg),
            TileSolver::Directional4 {
                direction,
                target_size,
            } => solve_4_directional_with(chunk, *direction, *target_size, cfg),
            TileSolver::RpgmakerA2 { connections } => solve_rpgmaker_a2(chunk, connections),
            TileSolver::RpgmakerA4Wall { connections } => {
                solve_rpgmaker_a4_wall(chunk, connections)
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TileSolver::Normal { .. } => "normal",
            TileSolver::Directional8 { .. } => "directional8",
            TileSolver::Directional4 { .. } => "directional4",
            TileSolver::RpgmakerA2 { .. } => "rpgmaker_a2",
            TileSolver::RpgmakerA4Wall { .. } => "rpgmaker_a4_wall",
        }
    }
}
