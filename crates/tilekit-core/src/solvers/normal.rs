use crate::model::{Piece, Rect2D, Sprite, TextureChunk};
use glam::Vec2;

/// Copies the chunk as-is: one piece from the whole chunk to `{(0,0), target_size}`.
pub fn solve_normal(chunk: &TextureChunk, target_size: Vec2) -> Sprite {
    Sprite::with_pieces(
        chunk.texture,
        vec![Piece {
            source: chunk.rect,
            destination: Rect2D::from_size(target_size),
        }],
    )
}
