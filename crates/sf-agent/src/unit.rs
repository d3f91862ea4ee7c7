//! Shared unit vocabulary: the abstract `Unit`'s `state` and the four
//! cardinal directions `IsBlocked`/`GetFreeDirections` reason about.

use sf_core::Vec2;

/// `state` on the abstract Unit (§3): mutated only by user input, collision
/// logic, or the broker — never by ordinary tick updates.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnitState {
    #[default]
    Alive,
    Blocked,
}

/// The four cardinal test directions used by `IsBlocked`/`GetFreeDirections`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::East,
        Direction::West,
    ];

    /// Unit vector for this direction, `y` increasing downward (the grid
    /// convention used throughout this crate).
    pub fn unit_vector(self) -> Vec2 {
        match self {
            Direction::North => Vec2::new(0.0, -1.0),
            Direction::South => Vec2::new(0.0, 1.0),
            Direction::East => Vec2::new(1.0, 0.0),
            Direction::West => Vec2::new(-1.0, 0.0),
        }
    }
}
