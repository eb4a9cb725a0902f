//! Minitile autotiles.
//!
//! A tile is assembled from four quarters ("minitiles"). For each quadrant the solver packs
//! the relevant neighbor flags as `corner << 2 | vertical << 1 | horizontal`, asks the
//! scheme for a layout index, and copies that minitile cell out of the chunk.
//!
//! The chunk is treated as a grid of minitiles (`AutotileScheme::GRID`); cell `(cx, cy)`
//! covers `[cx/cols, (cx+1)/cols] x [cy/rows, (cy+1)/rows]` of the chunk rect.

use crate::error::{Result, SpriteError};
use crate::model::{Piece, Quadrant, QuadrantLinks, Rect2D, Sprite, TextureChunk};
use crate::model::{Tile4Connections, Tile8Connections};

/// A lookup-table driven autotile layout.
pub trait AutotileScheme {
    /// Minitile columns and rows covering the chunk.
    const GRID: (u32, u32);
    /// Variants available per quadrant.
    const VARIANTS: usize;

    /// Variant chosen for a packed `corner|vertical|horizontal` triple.
    fn variant(packed: u8) -> usize;

    /// Minitile cell (column, row) of a layout index, or `None` if out of range.
    fn cell(layout_index: usize) -> Option<(u32, u32)>;

    /// `quadrant * VARIANTS + variant(packed)`.
    fn layout_index(quadrant: Quadrant, packed: u8) -> usize {
        quadrant.index() * Self::VARIANTS + Self::variant(packed)
    }

    /// Unit-space rect of a layout index inside the chunk.
    fn unit_rect(layout_index: usize) -> Option<Rect2D> {
        let (cols, rows) = Self::GRID;
        let (cx, cy) = Self::cell(layout_index)?;
        let (w, h) = (1.0 / cols as f32, 1.0 / rows as f32);
        let (x, y) = (cx as f32 * w, cy as f32 * h);
        Some(Rect2D::from_coords(x, y, x + w, y + h))
    }
}

/// RPGMaker A2 ground autotile, with the inner-corner tile laid out on the first minitile
/// row. The chunk is 2x3 tiles, i.e. 4x6 minitiles.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpgMakerA2;

impl RpgMakerA2 {
    /// Per quadrant (A=top-left, B=top-right, C=bottom-left, D=bottom-right), variants
    /// 0..5: inner corner, isolated, filled, horizontal edge, vertical edge.
    #[rustfmt::skip]
    pub const LAYOUT: [(u32, u32); 20] = [
        /* A */ (2, 0), (0, 2), (2, 4), (2, 2), (0, 4),
        /* B */ (3, 0), (3, 2), (1, 4), (1, 2), (3, 4),
        /* C */ (2, 1), (0, 5), (2, 3), (2, 5), (0, 3),
        /* D */ (3, 1), (3, 5), (1, 3), (1, 5), (3, 3),
    ];

    /// Indexed by packed bits.
    pub const VARIANT_TABLE: [usize; 8] = [
        1, // 000 isolated
        3, // 001 horizontal neighbor only
        4, // 010 vertical neighbor only
        0, // 011 both cardinals, corner open
        1, // 100 corner alone doesn't count
        3, // 101
        4, // 110
        2, // 111 filled
    ];
}

impl AutotileScheme for RpgMakerA2 {
    const GRID: (u32, u32) = (4, 6);
    const VARIANTS: usize = 5;

    fn variant(packed: u8) -> usize {
        Self::VARIANT_TABLE[(packed & 0b111) as usize]
    }

    fn cell(layout_index: usize) -> Option<(u32, u32)> {
        Self::LAYOUT.get(layout_index).copied()
    }
}

/// RPGMaker A4 wall autotile: a 2x2-tile (4x4 minitile) block driven by cardinal
/// neighbors only. Inner corners can't be expressed and render as the filled cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct RpgMakerA4Wall;

impl RpgMakerA4Wall {
    /// Per quadrant, variants 0..4: isolated, horizontal edge, vertical edge, filled.
    #[rustfmt::skip]
    pub const LAYOUT: [(u32, u32); 16] = [
        /* TL */ (0, 0), (2, 0), (0, 2), (2, 2),
        /* TR */ (3, 0), (1, 0), (3, 2), (1, 2),
        /* BL */ (0, 3), (2, 3), (0, 1), (2, 1),
        /* BR */ (3, 3), (1, 3), (3, 1), (1, 1),
    ];
}

impl AutotileScheme for RpgMakerA4Wall {
    const GRID: (u32, u32) = (4, 4);
    const VARIANTS: usize = 4;

    fn variant(packed: u8) -> usize {
        (packed & 0b011) as usize
    }

    fn cell(layout_index: usize) -> Option<(u32, u32)> {
        Self::LAYOUT.get(layout_index).copied()
    }
}

/// Builds the four quadrant pieces (TL, TR, BL, BR) of an autotile.
pub fn solve_autotile<S: AutotileScheme>(
    chunk: &TextureChunk,
    links: [QuadrantLinks; 4],
) -> Result<Sprite> {
    if chunk.is_degenerate() {
        return Err(SpriteError::DegenerateGeometry(format!(
            "cannot split chunk {:?} into a {}x{} minitile grid",
            chunk.rect,
            S::GRID.0,
            S::GRID.1
        )));
    }
    let mut sprite = Sprite::new(chunk.texture);
    sprite.pieces.reserve(4);
    for q in Quadrant::ALL {
        let index = S::layout_index(q, links[q.index()].packed());
        let unit = S::unit_rect(index).ok_or_else(|| {
            SpriteError::InvalidConfig(format!("layout index {} has no minitile cell", index))
        })?;
        sprite.pieces.push(Piece {
            source: chunk.rect.sub_rect(&unit),
            destination: q.destination(),
        });
    }
    Ok(sprite)
}

/// Solves an RPGMaker A2 autotile from the 8 neighbor connections.
pub fn solve_rpgmaker_a2(chunk: &TextureChunk, connections: &Tile8Connections) -> Result<Sprite> {
    solve_autotile::<RpgMakerA2>(chunk, Quadrant::ALL.map(|q| connections.quadrant_links(q)))
}

/// Solves an RPGMaker A4 wall autotile from the 4 cardinal connections. Convex shapes only:
/// an inner corner yields a broken-looking tile, not an error.
pub fn solve_rpgmaker_a4_wall(
    chunk: &TextureChunk,
    connections: &Tile4Connections,
) -> Result<Sprite> {
    solve_autotile::<RpgMakerA4Wall>(chunk, Quadrant::ALL.map(|q| connections.quadrant_links(q)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a2_variant_table_matches_packed_bits() {
        let expect = [
            (0b011, 0),
            (0b000, 1),
            (0b100, 1),
            (0b111, 2),
            (0b001, 3),
            (0b101, 3),
            (0b010, 4),
            (0b110, 4),
        ];
        for (packed, variant) in expect {
            assert_eq!(RpgMakerA2::variant(packed), variant, "packed {:03b}", packed);
        }
    }

    #[test]
    fn layout_cells_stay_inside_grid() {
        for i in 0..20 {
            let (x, y) = RpgMakerA2::cell(i).unwrap();
            assert!(x < 4 && y < 6);
        }
        for i in 0..16 {
            let (x, y) = RpgMakerA4Wall::cell(i).unwrap();
            assert!(x < 4 && y < 4);
        }
        assert!(RpgMakerA2::cell(20).is_none());
    }

    #[test]
    fn wall_layout_uses_every_cell_once() {
        let mut seen = std::collections::HashSet::new();
        for cell in RpgMakerA4Wall::LAYOUT {
            assert!(seen.insert(cell));
        }
        assert_eq!(seen.len(), 16);
    }
}
