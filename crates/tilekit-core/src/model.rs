use crate::direction::Direction;
use crate::error::{Result, SpriteError};
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle described by two corners.
///
/// Used both for atlas regions (normalized UV space) and for placement (tile units).
/// Nothing forces `start <= end`; methods that need ordered corners say so.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Rect2D {
    pub start: Vec2,
    pub end: Vec2,
}

impl Rect2D {
    /// `{(0,0), (1,1)}`.
    pub const UNIT: Rect2D = Rect2D {
        start: Vec2::ZERO,
        end: Vec2::ONE,
    };

    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new(Vec2::new(x0, y0), Vec2::new(x1, y1))
    }

    /// Rect spanning `(0,0)` to `size`.
    pub fn from_size(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    /// Signed extent (`end - start`); negative on inverted axes.
    pub fn size(&self) -> Vec2 {
        self.end - self.start
    }

    pub fn width(&self) -> f32 {
        self.end.x - self.start.x
    }

    pub fn height(&self) -> f32 {
        self.end.y - self.start.y
    }

    /// Absolute area, regardless of corner order.
    pub fn area(&self) -> f32 {
        (self.width() * self.height()).abs()
    }

    pub fn is_finite(&self) -> bool {
        self.start.is_finite() && self.end.is_finite()
    }

    /// True when the rect has zero area or a non-finite coordinate.
    pub fn is_degenerate(&self) -> bool {
        !self.is_finite() || self.width() == 0.0 || self.height() == 0.0
    }

    /// Same rect with corners swapped per axis so that `start <= end`.
    pub fn normalized(&self) -> Self {
        Self::new(self.start.min(self.end), self.start.max(self.end))
    }

    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Smallest normalized rect containing both rects.
    pub fn union(&self, other: &Rect2D) -> Self {
        let a = self.normalized();
        let b = other.normalized();
        Self::new(a.start.min(b.start), a.end.max(b.end))
    }

    /// Point containment on the normalized rect, edges inclusive.
    pub fn contains_point(&self, p: Vec2) -> bool {
        let r = self.normalized();
        p.x >= r.start.x && p.y >= r.start.y && p.x <= r.end.x && p.y <= r.end.y
    }

    /// Returns true if `other` is fully inside `self` (both normalized, edges inclusive).
    pub fn contains(&self, other: &Rect2D) -> bool {
        let o = other.normalized();
        self.contains_point(o.start) && self.contains_point(o.end)
    }

    /// Maps a point from unit space (`[0,1]²` over this rect) into this rect's space.
    pub fn map_from_unit(&self, unit: Vec2) -> Vec2 {
        self.start + unit * self.size()
    }

    /// Maps a unit-space rect into this rect's space.
    pub fn sub_rect(&self, unit: &Rect2D) -> Rect2D {
        Rect2D::new(self.map_from_unit(unit.start), self.map_from_unit(unit.end))
    }
}

/// Axis-aligned rectangle in atlas pixels. `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }

    /// Converts to normalized UV coordinates for an atlas of `width` x `height` pixels.
    pub fn to_uv(&self, width: u32, height: u32) -> Result<Rect2D> {
        if width == 0 || height == 0 {
            return Err(SpriteError::InvalidInput(format!(
                "atlas dimensions must be non-zero, got {}x{}",
                width, height
            )));
        }
        let (w, h) = (width as f32, height as f32);
        Ok(Rect2D::from_coords(
            self.x as f32 / w,
            self.y as f32 / h,
            (self.x as u64 + self.w as u64) as f32 / w,
            (self.y as u64 + self.h as u64) as f32 / h,
        ))
    }
}

/// Identity key of an atlas texture owned by an external texture layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextureId(pub u32);

/// A region of an atlas texture; the unit every solver reads from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextureChunk {
    pub texture: TextureId,
    /// The rect this chunk is representing, in UV coordinates.
    pub rect: Rect2D,
}

impl TextureChunk {
    pub fn new(texture: TextureId, rect: Rect2D) -> Self {
        Self { texture, rect }
    }

    /// Chunk covering the entire texture (`{(0,0), (1,1)}`).
    pub fn full(texture: TextureId) -> Self {
        Self::new(texture, Rect2D::UNIT)
    }

    /// Chunk from a pixel rect inside an atlas of `width` x `height` pixels.
    pub fn from_pixels(texture: TextureId, px: PixelRect, width: u32, height: u32) -> Result<Self> {
        Ok(Self::new(texture, px.to_uv(width, height)?))
    }

    pub fn is_degenerate(&self) -> bool {
        self.rect.is_degenerate()
    }
}

/// One (source, destination) pair of a sprite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Piece {
    /// Where this piece is gathering texture data from, in UV coordinates.
    pub source: Rect2D,
    /// Where the source lands, in tile units.
    pub destination: Rect2D,
}

/// A resolved tile: a puzzle of pieces that all sample the same texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub texture: TextureId,
    pub pieces: Vec<Piece>,
}

impl Sprite {
    pub fn new(texture: TextureId) -> Self {
        Self {
            texture,
            pieces: Vec::new(),
        }
    }

    pub fn with_pieces(texture: TextureId, pieces: Vec<Piece>) -> Self {
        Self { texture, pieces }
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    /// Appends copies of `pieces` with their destinations translated by `offset`.
    pub fn join_pieces_from(&mut self, pieces: &[Piece], offset: Vec2) {
        self.pieces.reserve(pieces.len());
        self.pieces.extend(pieces.iter().map(|p| Piece {
            source: p.source,
            destination: p.destination.translated(offset),
        }));
    }

    /// Rect containing every destination rect and the origin.
    pub fn bounds(&self) -> Rect2D {
        self.pieces
            .iter()
            .fold(Rect2D::default(), |acc, p| acc.union(&p.destination))
    }
}

/// Neighbor flags used by the 4-way autotile solvers and the quadrant tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuadrantLinks {
    pub vertical: bool,
    pub horizontal: bool,
    pub corner: bool,
}

impl QuadrantLinks {
    /// `corner << 2 | vertical << 1 | horizontal`.
    pub fn packed(&self) -> u8 {
        ((self.corner as u8) << 2) | ((self.vertical as u8) << 1) | (self.horizontal as u8)
    }
}

/// Quarter of a tile, in piece emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quadrant {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

impl Quadrant {
    pub const ALL: [Quadrant; 4] = [
        Quadrant::TopLeft,
        Quadrant::TopRight,
        Quadrant::BottomLeft,
        Quadrant::BottomRight,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Destination rect inside the unit tile. Y points up, so the top row is `y in [0.5, 1]`.
    pub fn destination(self) -> Rect2D {
        let i = self.index();
        let x = (i % 2) as f32 / 2.0;
        let y = (1.0 - (i / 2) as f32) / 2.0;
        Rect2D::from_coords(x, y, x + 0.5, y + 0.5)
    }
}

/// Which of the 8 neighbors are the same kind of tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tile8Connections {
    pub down: bool,
    pub down_right: bool,
    pub right: bool,
    pub up_right: bool,
    pub up: bool,
    pub up_left: bool,
    pub left: bool,
    pub down_left: bool,
}

impl Tile8Connections {
    pub fn all() -> Self {
        Self::from_neighbors(|_| true)
    }

    /// Builds the flags by asking `connected` about each canonical direction.
    pub fn from_neighbors(mut connected: impl FnMut(Direction) -> bool) -> Self {
        Self {
            down: connected(Direction::DOWN),
            down_right: connected(Direction::DOWN_RIGHT),
            right: connected(Direction::RIGHT),
            up_right: connected(Direction::UP_RIGHT),
            up: connected(Direction::UP),
            up_left: connected(Direction::UP_LEFT),
            left: connected(Direction::LEFT),
            down_left: connected(Direction::DOWN_LEFT),
        }
    }

    pub fn quadrant_links(&self, q: Quadrant) -> QuadrantLinks {
        let (vertical, horizontal, corner) = match q {
            Quadrant::TopLeft => (self.up, self.left, self.up_left),
            Quadrant::TopRight => (self.up, self.right, self.up_right),
            Quadrant::BottomLeft => (self.down, self.left, self.down_left),
            Quadrant::BottomRight => (self.down, self.right, self.down_right),
        };
        QuadrantLinks {
            vertical,
            horizontal,
            corner,
        }
    }
}

/// Which of the 4 cardinal neighbors are the same kind of tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tile4Connections {
    pub down: bool,
    pub right: bool,
    pub up: bool,
    pub left: bool,
}

impl Tile4Connections {
    pub fn all() -> Self {
        Self {
            down: true,
            right: true,
            up: true,
            left: true,
        }
    }

    pub fn quadrant_links(&self, q: Quadrant) -> QuadrantLinks {
        let (vertical, horizontal) = match q {
            Quadrant::TopLeft => (self.up, self.left),
            Quadrant::TopRight => (self.up, self.right),
            Quadrant::BottomLeft => (self.down, self.left),
            Quadrant::BottomRight => (self.down, self.right),
        };
        QuadrantLinks {
            vertical,
            horizontal,
            corner: false,
        }
    }
}

impl From<Tile8Connections> for Tile4Connections {
    fn from(c: Tile8Connections) -> Self {
        Self {
            down: c.down,
            right: c.right,
            up: c.up,
            left: c.left,
        }
    }
}
