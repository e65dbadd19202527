use super::types::{transform_coord, Direction, Obstacle, Pose, GRID_SIZE};
use std::collections::{HashMap, HashSet};

/// Classification of a single display cell. `Obstacle { facing: None }`
/// covers obstacles placed with `Direction::Skip`, which get a plain filled
/// cell with no highlighted face edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Empty,
    Obstacle { facing: Option<Direction> },
    RobotBody,
    RobotMarker { visited: bool },
}

/// A fully classified 20x20 grid in display space, indexed `[row][col]`
/// where `row` grows downward and `col` rightward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridView {
    cells: Vec<Vec<CellKind>>,
}

impl GridView {
    /// Classify every display cell from the obstacle set and the robot pose.
    ///
    /// Obstacle occupancy masks robot occupancy at the same display cell;
    /// obstacles are checked first and the first obstacle in set order wins.
    pub fn render(obstacles: &[Obstacle], robot: &Pose) -> Self {
        let mut obstacle_cells: HashMap<(i32, i32), &Obstacle> = HashMap::new();
        for ob in obstacles {
            obstacle_cells.entry(transform_coord(ob.x, ob.y)).or_insert(ob);
        }

        let mut marker_cells: HashMap<(i32, i32), bool> = HashMap::new();
        let mut body_cells: HashSet<(i32, i32)> = HashSet::new();
        for cell in robot_cells(robot) {
            if cell.marker {
                marker_cells.insert((cell.x, cell.y), cell.visited);
            } else {
                body_cells.insert((cell.x, cell.y));
            }
        }

        let mut cells = vec![vec![CellKind::Empty; GRID_SIZE as usize]; GRID_SIZE as usize];
        for (row, row_cells) in cells.iter_mut().enumerate() {
            for (col, cell) in row_cells.iter_mut().enumerate() {
                let at = (row as i32, col as i32);
                *cell = if let Some(ob) = obstacle_cells.get(&at) {
                    let facing = match ob.direction {
                        Direction::Skip => None,
                        d => Some(d),
                    };
                    CellKind::Obstacle { facing }
                } else if let Some(visited) = marker_cells.get(&at) {
                    CellKind::RobotMarker { visited: *visited }
                } else if body_cells.contains(&at) {
                    CellKind::RobotBody
                } else {
                    CellKind::Empty
                };
            }
        }

        Self { cells }
    }

    pub fn cell(&self, row: usize, col: usize) -> CellKind {
        self.cells[row][col]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[CellKind]> {
        self.cells.iter().map(|r| r.as_slice())
    }
}

/// One of the nine cells of the robot footprint, already transformed into
/// display space. Exactly one is the marker cell, offset from the center by
/// the robot's facing direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RobotCell {
    pub x: i32,
    pub y: i32,
    pub marker: bool,
    pub visited: bool,
}

/// The 3x3 neighborhood around the robot's logical position. Cells that fall
/// outside the grid after transformation simply never match a display cell.
pub fn robot_cells(robot: &Pose) -> Vec<RobotCell> {
    let (marker_dx, marker_dy) = robot.direction.marker_offset();

    let mut cells = Vec::with_capacity(9);
    for i in -1..2 {
        for j in -1..2 {
            let (x, y) = transform_coord(robot.x + i, robot.y + j);
            let marker = i == marker_dx && j == marker_dy;
            cells.push(RobotCell {
                x,
                y,
                marker,
                visited: marker && robot.has_marker(),
            });
        }
    }
    cells
}
