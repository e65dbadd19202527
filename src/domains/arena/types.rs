use serde::{Deserialize, Serialize};

/// The arena is a fixed 20x20 grid in both coordinate systems.
pub const GRID_SIZE: i32 = 20;

/// Inclusive range of obstacle ids. Ten ids bound the arena to ten obstacles.
pub const OBSTACLE_ID_MIN: u8 = 1;
pub const OBSTACLE_ID_MAX: u8 = 10;

/// Facing of the robot or of an obstacle's image face. The discriminants
/// mirror the wire encoding used by the planner fleet (0/2/4/6/8); only
/// identity matters, the spacing carries no meaning. `Skip` marks "no
/// orientation".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    East = 2,
    South = 4,
    West = 6,
    Skip = 8,
}

impl Direction {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Direction::North),
            2 => Some(Direction::East),
            4 => Some(Direction::South),
            6 => Some(Direction::West),
            8 => Some(Direction::Skip),
            _ => None,
        }
    }

    /// Offset of the marker cell relative to the robot center, in logical
    /// coordinates. `Skip` keeps the marker on the center cell.
    pub fn marker_offset(self) -> (i32, i32) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
            Direction::Skip => (0, 0),
        }
    }

    /// Human-facing label matching the front-end selectors.
    pub fn label(self) -> &'static str {
        match self {
            Direction::North => "Up",
            Direction::East => "Right",
            Direction::South => "Down",
            Direction::West => "Left",
            Direction::Skip => "None",
        }
    }
}

/// Map a logical coordinate (origin bottom-left, x right, y up) to a display
/// coordinate (origin top-left, row-major). A quarter-turn over the grid:
/// applying it twice gives `(19 - x, 19 - y)`, four times the identity.
/// `inverse_transform_coord` is the true inverse.
pub fn transform_coord(x: i32, y: i32) -> (i32, i32) {
    (GRID_SIZE - 1 - y, x)
}

/// Inverse of [`transform_coord`]: display space back to logical space.
pub fn inverse_transform_coord(x: i32, y: i32) -> (i32, i32) {
    (y, GRID_SIZE - 1 - x)
}

/// A robot position on the grid. `status == -1` means "no special marker";
/// any other value marks a snapshot/target step in a planned path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pose {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub status: i32,
}

impl Pose {
    pub fn new(x: i32, y: i32, direction: Direction) -> Self {
        Self {
            x,
            y,
            direction,
            status: -1,
        }
    }

    pub fn has_marker(&self) -> bool {
        self.status != -1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Obstacle {
    pub x: i32,
    pub y: i32,
    pub direction: Direction,
    pub id: u8,
}
