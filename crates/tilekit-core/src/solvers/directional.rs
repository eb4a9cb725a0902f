use crate::config::{FrameLayout, SolverConfig};
use crate::direction::Direction;
use crate::error::{Result, SpriteError};
use crate::model::{Piece, Rect2D, Sprite, TextureChunk};
use glam::Vec2;
use tracing::trace;

/// Solves an 8-directional atlas (frames: down, down_right, right, up_right, up, up_left,
/// left, down_left) with the axis auto-detected.
pub fn solve_8_directional(
    chunk: &TextureChunk,
    dir: Direction,
    target_size: Vec2,
) -> Result<Sprite> {
    solve_8_directional_with(chunk, dir, target_size, &SolverConfig::default())
}

pub fn solve_8_directional_with(
    chunk: &TextureChunk,
    dir: Direction,
    target_size: Vec2,
    cfg: &SolverConfig,
) -> Result<Sprite> {
    let index = dir.canonical_index()?;
    frame_sprite(chunk, index, 8, target_size, cfg.layout)
}

/// Solves a 4-directional atlas (frames: down, right, up, left) with the axis
/// auto-detected. Diagonals collapse to their vertical component.
pub fn solve_4_directional(
    chunk: &TextureChunk,
    dir: Direction,
    target_size: Vec2,
) -> Result<Sprite> {
    solve_4_directional_with(chunk, dir, target_size, &SolverConfig::default())
}

pub fn solve_4_directional_with(
    chunk: &TextureChunk,
    dir: Direction,
    target_size: Vec2,
    cfg: &SolverConfig,
) -> Result<Sprite> {
    let index = dir.cardinal_index(cfg.priority)?;
    if dir.is_diagonal() {
        trace!(%dir, frame = index, "diagonal reduced to cardinal");
    }
    frame_sprite(chunk, index, 4, target_size, cfg.layout)
}

/// Resolves `Auto` against the chunk's extent; ties go horizontal.
pub fn resolve_layout(rect: &Rect2D, layout: FrameLayout) -> FrameLayout {
    match layout {
        FrameLayout::Auto => {
            if rect.width().abs() >= rect.height().abs() {
                FrameLayout::Horizontal
            } else {
                FrameLayout::Vertical
            }
        }
        forced => forced,
    }
}

/// The `index`-th of `count` equal slices of `rect` along `layout`.
pub fn frame_rect(rect: &Rect2D, index: usize, count: usize, layout: FrameLayout) -> Rect2D {
    let (t0, t1) = (index as f32 / count as f32, (index + 1) as f32 / count as f32);
    let unit = match resolve_layout(rect, layout) {
        FrameLayout::Vertical => Rect2D::from_coords(0.0, t0, 1.0, t1),
        _ => Rect2D::from_coords(t0, 0.0, t1, 1.0),
    };
    rect.sub_rect(&unit)
}

fn frame_sprite(
    chunk: &TextureChunk,
    index: usize,
    count: usize,
    target_size: Vec2,
    layout: FrameLayout,
) -> Result<Sprite> {
    if chunk.is_degenerate() {
        return Err(SpriteError::DegenerateGeometry(format!(
            "cannot split chunk {:?} into {} frames",
            chunk.rect, count
        )));
    }
    Ok(Sprite::with_pieces(
        chunk.texture,
        vec![Piece {
            source: frame_rect(&chunk.rect, index, count, layout),
            destination: Rect2D::from_size(target_size),
        }],
    ))
}
