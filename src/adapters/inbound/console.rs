use crate::application::SimulatorService;
use crate::common::ApplicationResult;
use crate::domains::arena::{CellKind, Direction, GridView, Scene, GRID_SIZE};
use std::io::Write;
use tokio::io::AsyncBufReadExt;

/// Interactive console front-end. Parses edit/playback commands, clamps
/// numeric input to the field defaults, and draws the classified grid as
/// ASCII.
pub struct ConsoleFrontend {
    service: SimulatorService,
}

impl ConsoleFrontend {
    pub fn new(service: SimulatorService) -> Self {
        Self { service }
    }

    pub async fn run(&mut self) -> ApplicationResult<()> {
        println!("Arena Simulator - type 'help' for commands");
        println!("{}", render_grid(self.service.scene()));

        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut lines = stdin.lines();

        loop {
            print!("> ");
            std::io::stdout().flush().ok();

            let Some(line) = lines.next_line().await.map_err(anyhow::Error::from)? else {
                break;
            };
            if !self.handle(line.trim()).await {
                break;
            }
        }
        Ok(())
    }

    /// Dispatch one command line. Returns `false` to quit.
    async fn handle(&mut self, line: &str) -> bool {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [] => {}
            ["quit"] | ["exit"] => return false,
            ["help"] => print_help(),
            ["show"] | ["grid"] => println!("{}", render_grid(self.service.scene())),
            ["robot", x, y, d] => {
                let x = parse_robot_coord(x);
                let y = parse_robot_coord(y);
                let direction = parse_direction(d, false);
                match self.service.set_robot_pose(x, y, direction) {
                    Ok(()) => println!("{}", render_grid(self.service.scene())),
                    Err(e) => println!("error: {}", e),
                }
            }
            ["add", x, y, d] => {
                let x = parse_grid_coord(x);
                let y = parse_grid_coord(y);
                let direction = parse_direction(d, true);
                match self.service.add_obstacle(x, y, direction) {
                    Ok(id) => {
                        println!("obstacle {} added", id);
                        println!("{}", render_grid(self.service.scene()));
                    }
                    Err(e) => println!("error: {}", e),
                }
            }
            ["rm", x, y] => {
                let x = parse_grid_coord(x);
                let y = parse_grid_coord(y);
                match self.service.remove_obstacle_at(x, y) {
                    Ok(removed) => {
                        println!("obstacle {} removed", removed.id);
                        println!("{}", render_grid(self.service.scene()));
                    }
                    Err(e) => println!("error: {}", e),
                }
            }
            ["obstacles"] => {
                for ob in &self.service.scene().obstacles {
                    println!("  {:>2}: X: {:>2}  Y: {:>2}  D: {}", ob.id, ob.x, ob.y, ob.direction.label());
                }
            }
            ["submit"] => match self.service.compute().await {
                Ok(steps) => {
                    println!("path computed: {} steps (next/prev to step through)", steps);
                    self.print_step_line();
                    println!("{}", render_grid(self.service.scene()));
                }
                Err(e) => println!("error: {}", e),
            },
            ["next"] => match self.service.advance_step() {
                Ok(true) => {
                    self.print_step_line();
                    println!("{}", render_grid(self.service.scene()));
                }
                Ok(false) => println!("already at the last step (or no path loaded)"),
                Err(e) => println!("error: {}", e),
            },
            ["prev"] => match self.service.retreat_step() {
                Ok(true) => {
                    self.print_step_line();
                    println!("{}", render_grid(self.service.scene()));
                }
                Ok(false) => println!("already at the first step (or no path loaded)"),
                Err(e) => println!("error: {}", e),
            },
            ["reset"] => {
                if let Err(e) = self.service.reset_scene() {
                    println!("error: {}", e);
                } else {
                    println!("{}", render_grid(self.service.scene()));
                }
            }
            ["reset-all"] => {
                if let Err(e) = self.service.reset_all() {
                    println!("error: {}", e);
                } else {
                    println!("{}", render_grid(self.service.scene()));
                }
            }
            _ => println!("unknown command, type 'help'"),
        }
        true
    }

    fn print_step_line(&self) {
        let scene = self.service.scene();
        if scene.path.is_empty() {
            return;
        }
        let label = scene.current_step_label();
        if label.is_empty() {
            println!("Step: {} / {}", scene.step + 1, scene.path.len());
        } else {
            println!("Step: {} / {}   {}", scene.step + 1, scene.path.len(), label);
        }
    }
}

fn print_help() {
    println!("  robot <x> <y> <dir>   set robot start pose (x, y in [1,18])");
    println!("  add <x> <y> <dir>     add obstacle (x, y in [0,19]; dir may be 'none')");
    println!("  rm <x> <y>            remove the obstacle at (x, y)");
    println!("  obstacles             list obstacles");
    println!("  submit                request a path from the planner");
    println!("  next / prev           step through the computed path");
    println!("  reset / reset-all     reset scene / also clear obstacles");
    println!("  show                  redraw the grid");
    println!("  quit                  exit");
    println!();
    println!("  grid: . empty  # obstacle  ^>v< obstacle face  o robot  R marker  * visited marker");
}

/// Draw the classified grid with logical axes: y down the left edge, x along
/// the bottom.
pub fn render_grid(scene: &Scene) -> String {
    let view = GridView::render(&scene.obstacles, &scene.robot);
    let mut out = String::new();

    for (i, row) in view.rows().enumerate() {
        out.push_str(&format!("{:>2} ", GRID_SIZE - 1 - i as i32));
        for cell in row {
            out.push(glyph(*cell));
            out.push(' ');
        }
        out.push('\n');
    }

    out.push_str("   ");
    for x in 0..GRID_SIZE {
        out.push_str(&format!("{:<2}", x));
    }
    out.push('\n');
    out
}

fn glyph(cell: CellKind) -> char {
    match cell {
        CellKind::Empty => '.',
        CellKind::Obstacle { facing: None } => '#',
        CellKind::Obstacle {
            facing: Some(Direction::North),
        } => '^',
        CellKind::Obstacle {
            facing: Some(Direction::East),
        } => '>',
        CellKind::Obstacle {
            facing: Some(Direction::South),
        } => 'v',
        CellKind::Obstacle { facing: Some(_) } => '<',
        CellKind::RobotBody => 'o',
        CellKind::RobotMarker { visited: true } => '*',
        CellKind::RobotMarker { visited: false } => 'R',
    }
}

/// Mirrors the obstacle coordinate fields: non-integer or out-of-range input
/// falls back to the field default of 0.
fn parse_grid_coord(token: &str) -> i32 {
    token
        .parse::<i32>()
        .ok()
        .filter(|n| (0..GRID_SIZE).contains(n))
        .unwrap_or(0)
}

/// Mirrors the robot coordinate fields: non-integer or out-of-range input
/// falls back to the field default of 1.
fn parse_robot_coord(token: &str) -> i32 {
    token
        .parse::<i32>()
        .ok()
        .filter(|n| (1..GRID_SIZE - 1).contains(n))
        .unwrap_or(1)
}

/// Direction selector. `allow_none` matches the obstacle selector, which has
/// a "None" entry the robot selector lacks; anything unrecognized falls back
/// to the first entry (Up).
fn parse_direction(token: &str, allow_none: bool) -> Direction {
    match token.to_ascii_lowercase().as_str() {
        "up" | "north" | "n" => Direction::North,
        "right" | "east" | "e" => Direction::East,
        "down" | "south" | "s" => Direction::South,
        "left" | "west" | "w" => Direction::West,
        "none" | "skip" if allow_none => Direction::Skip,
        _ => Direction::North,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_coord_clamps_to_zero() {
        assert_eq!(parse_grid_coord("7"), 7);
        assert_eq!(parse_grid_coord("19"), 19);
        assert_eq!(parse_grid_coord("20"), 0);
        assert_eq!(parse_grid_coord("-3"), 0);
        assert_eq!(parse_grid_coord("abc"), 0);
    }

    #[test]
    fn robot_coord_clamps_to_one() {
        assert_eq!(parse_robot_coord("18"), 18);
        assert_eq!(parse_robot_coord("19"), 1);
        assert_eq!(parse_robot_coord("0"), 1);
        assert_eq!(parse_robot_coord("x"), 1);
    }

    #[test]
    fn direction_selector_defaults_to_up() {
        assert_eq!(parse_direction("left", false), Direction::West);
        assert_eq!(parse_direction("none", true), Direction::Skip);
        // The robot selector has no "None" entry.
        assert_eq!(parse_direction("none", false), Direction::North);
        assert_eq!(parse_direction("diagonal", true), Direction::North);
    }
}
