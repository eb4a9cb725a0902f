//! 8-way direction bitmask.
//!
//! Cardinals are single bits (`down=1, up=2, right=4, left=8`); diagonals are the OR of a
//! vertical and a horizontal bit. Only those 8 values are *canonical*. Directional atlases
//! store their frames in canonical order, clockwise from `down`:
//!
//! ```text
//! 0 down, 1 down_right, 2 right, 3 up_right, 4 up, 5 up_left, 6 left, 7 down_left
//! ```

use crate::config::CardinalPriority;
use crate::error::{Result, SpriteError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{BitAnd, BitOr};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Direction(u8);

impl Direction {
    pub const NONE: Direction = Direction(0);
    pub const DOWN: Direction = Direction(1 << 0);
    pub const UP: Direction = Direction(1 << 1);
    pub const RIGHT: Direction = Direction(1 << 2);
    pub const LEFT: Direction = Direction(1 << 3);
    pub const UP_RIGHT: Direction = Direction(Self::UP.0 | Self::RIGHT.0);
    pub const UP_LEFT: Direction = Direction(Self::UP.0 | Self::LEFT.0);
    pub const DOWN_LEFT: Direction = Direction(Self::DOWN.0 | Self::LEFT.0);
    pub const DOWN_RIGHT: Direction = Direction(Self::DOWN.0 | Self::RIGHT.0);
    pub const ANY: Direction = Direction(Self::UP.0 | Self::RIGHT.0 | Self::LEFT.0 | Self::DOWN.0);

    /// The canonical directions, indexed by [`Direction::canonical_index`].
    pub const CANONICAL: [Direction; 8] = [
        Direction::DOWN,
        Direction::DOWN_RIGHT,
        Direction::RIGHT,
        Direction::UP_RIGHT,
        Direction::UP,
        Direction::UP_LEFT,
        Direction::LEFT,
        Direction::DOWN_LEFT,
    ];

    /// The cardinal directions in 4-directional atlas order.
    pub const CARDINAL: [Direction; 4] = [
        Direction::DOWN,
        Direction::RIGHT,
        Direction::UP,
        Direction::LEFT,
    ];

    /// Wraps raw bits. Any pattern is accepted; solvers reject non-canonical ones.
    pub const fn from_bits(bits: u8) -> Self {
        Direction(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, other: Direction) -> bool {
        self.0 & other.0 == other.0
    }

    /// Position in the clockwise frame order starting at `down`.
    pub fn canonical_index(self) -> Result<usize> {
        Self::CANONICAL
            .iter()
            .position(|d| *d == self)
            .ok_or(SpriteError::InvalidDirection(self.0))
    }

    pub fn from_canonical_index(index: usize) -> Option<Direction> {
        Self::CANONICAL.get(index).copied()
    }

    pub fn is_canonical(self) -> bool {
        self.canonical_index().is_ok()
    }

    pub fn is_cardinal(self) -> bool {
        Self::CARDINAL.contains(&self)
    }

    pub fn is_diagonal(self) -> bool {
        self.is_canonical() && !self.is_cardinal()
    }

    /// Next canonical direction clockwise; `down_left` wraps to `down`.
    pub fn next_clockwise(self) -> Result<Direction> {
        let i = self.canonical_index()?;
        Ok(Self::CANONICAL[(i + 1) % Self::CANONICAL.len()])
    }

    /// Reduces a canonical direction to a single cardinal.
    ///
    /// Cardinals map to themselves. Diagonals keep the component named by `priority`.
    pub fn to_cardinal(self, priority: CardinalPriority) -> Result<Direction> {
        if self.is_cardinal() {
            return Ok(self);
        }
        if !self.is_diagonal() {
            return Err(SpriteError::InvalidDirection(self.0));
        }
        let vertical = self & Direction(Self::UP.0 | Self::DOWN.0);
        let horizontal = self & Direction(Self::LEFT.0 | Self::RIGHT.0);
        Ok(match priority {
            CardinalPriority::VerticalFirst => vertical,
            CardinalPriority::HorizontalFirst => horizontal,
        })
    }

    /// Position in the 4-directional frame order (down, right, up, left).
    pub fn cardinal_index(self, priority: CardinalPriority) -> Result<usize> {
        let cardinal = self.to_cardinal(priority)?;
        Self::CARDINAL
            .iter()
            .position(|d| *d == cardinal)
            .ok_or(SpriteError::InvalidDirection(self.0))
    }

    pub fn name(self) -> Option<&'static str> {
        let names = [
            "down",
            "down_right",
            "right",
            "up_right",
            "up",
            "up_left",
            "left",
            "down_left",
        ];
        self.canonical_index().ok().map(|i| names[i])
    }
}

impl BitOr for Direction {
    type Output = Direction;
    fn bitor(self, rhs: Direction) -> Direction {
        Direction(self.0 | rhs.0)
    }
}

impl BitAnd for Direction {
    type Output = Direction;
    fn bitand(self, rhs: Direction) -> Direction {
        Direction(self.0 & rhs.0)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(n) => f.write_str(n),
            None => write!(f, "{:#06b}", self.0),
        }
    }
}

impl FromStr for Direction {
    type Err = SpriteError;
    fn from_str(s: &str) -> Result<Self> {
        // Non-canonical values display as raw bits; accept them back.
        if let Some(bits) = s.strip_prefix("0b") {
            return u8::from_str_radix(bits, 2)
                .map(Direction)
                .map_err(|_| SpriteError::InvalidInput(format!("bad direction bits '{}'", s)));
        }
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "down" | "s" => Ok(Self::DOWN),
            "down_right" | "se" => Ok(Self::DOWN_RIGHT),
            "right" | "e" => Ok(Self::RIGHT),
            "up_right" | "ne" => Ok(Self::UP_RIGHT),
            "up" | "n" => Ok(Self::UP),
            "up_left" | "nw" => Ok(Self::UP_LEFT),
            "left" | "w" => Ok(Self::LEFT),
            "down_left" | "sw" => Ok(Self::DOWN_LEFT),
            other => Err(SpriteError::InvalidInput(format!(
                "unknown direction '{}'",
                other
            ))),
        }
    }
}

impl TryFrom<String> for Direction {
    type Error = SpriteError;
    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Direction> for String {
    fn from(d: Direction) -> String {
        d.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagonals_are_or_of_cardinals() {
        assert_eq!(Direction::UP | Direction::RIGHT, Direction::UP_RIGHT);
        assert_eq!(Direction::DOWN_LEFT.bits(), 0b1001);
        assert!(Direction::UP_LEFT.contains(Direction::LEFT));
    }

    #[test]
    fn opposite_bits_are_not_canonical() {
        let bad = Direction::UP | Direction::DOWN;
        assert!(matches!(
            bad.canonical_index(),
            Err(SpriteError::InvalidDirection(0b0011))
        ));
        assert!(!Direction::NONE.is_canonical());
        assert!(!Direction::ANY.is_canonical());
    }

    #[test]
    fn cardinal_reduction_policy() {
        let d = Direction::UP_LEFT;
        assert_eq!(d.to_cardinal(CardinalPriority::VerticalFirst).unwrap(), Direction::UP);
        assert_eq!(d.to_cardinal(CardinalPriority::HorizontalFirst).unwrap(), Direction::LEFT);
        assert_eq!(
            Direction::RIGHT.to_cardinal(CardinalPriority::VerticalFirst).unwrap(),
            Direction::RIGHT
        );
    }

    #[test]
    fn clockwise_wraps() {
        assert_eq!(Direction::DOWN_LEFT.next_clockwise().unwrap(), Direction::DOWN);
        assert_eq!(Direction::DOWN.next_clockwise().unwrap(), Direction::DOWN_RIGHT);
    }

    #[test]
    fn names_round_trip_through_serde() {
        let json = serde_json::to_string(&Direction::UP_RIGHT).unwrap();
        assert_eq!(json, "\"up_right\"");
        let back: Direction = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Direction::UP_RIGHT);
        assert!(serde_json::from_str::<Direction>("\"sideways\"").is_err());
    }

    #[test]
    fn non_canonical_bits_round_trip_through_serde() {
        for d in [Direction::NONE, Direction::UP | Direction::DOWN, Direction::ANY] {
            let json = serde_json::to_string(&d).unwrap();
            let back: Direction = serde_json::from_str(&json).unwrap();
            assert_eq!(back, d, "{}", json);
            assert!(back.canonical_index().is_err());
        }
        assert!("0b2".parse::<Direction>().is_err());
    }
}
