use crate::common::DomainResult;
use crate::domains::arena::{Direction, Pose, GRID_SIZE};
use crate::domains::planning::{PlanReply, PlanRequest, RoutePlanner, SNAPSHOT_PREFIX};
use async_trait::async_trait;

/// In-process stand-in for the external planner, used for offline runs and
/// tests. Produces the same reply shape as the planner fleet.
#[derive(Default)]
pub struct RouteStubPlanner;

impl RouteStubPlanner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl RoutePlanner for RouteStubPlanner {
    async fn plan(&self, request: PlanRequest) -> DomainResult<PlanReply> {
        Ok(synthesize_route(&request))
    }
}

/// Naive Manhattan route visiting the camera cell of each obstacle in id
/// order, with a snapshot token emitted at every visited obstacle. Obstacles
/// facing `Skip` have no image face and are not visited. The walk ignores
/// collisions; this is a stub, not a planner.
pub fn synthesize_route(request: &PlanRequest) -> PlanReply {
    let mut cur = Pose::new(request.robot_x, request.robot_y, request.robot_direction);
    if cur.direction == Direction::Skip {
        cur.direction = Direction::North;
    }

    let mut path: Vec<Pose> = Vec::new();
    let mut commands: Vec<String> = Vec::new();

    let mut targets: Vec<_> = request
        .obstacles
        .iter()
        .filter(|ob| ob.direction != Direction::Skip)
        .collect();
    targets.sort_by_key(|ob| ob.id);

    for ob in targets {
        // Camera cell: two cells out from the obstacle's image face, with
        // the robot center kept one cell inside the border.
        let (dx, dy) = ob.direction.marker_offset();
        let goal_x = clamp_inside(ob.x + dx * 2);
        let goal_y = clamp_inside(ob.y + dy * 2);

        walk_to(&mut cur, goal_x, goal_y, &mut path, &mut commands);
        turn_to(&mut cur, opposite(ob.direction), &mut path, &mut commands);

        path.push(Pose {
            status: ob.id as i32,
            ..cur
        });
        commands.push(format!("{}{}", SNAPSHOT_PREFIX, ob.id));
    }

    PlanReply {
        request_id: request.request_id.clone(),
        path,
        commands,
    }
}

fn walk_to(cur: &mut Pose, goal_x: i32, goal_y: i32, path: &mut Vec<Pose>, commands: &mut Vec<String>) {
    while cur.x != goal_x {
        let dir = if goal_x > cur.x {
            Direction::East
        } else {
            Direction::West
        };
        turn_to(cur, dir, path, commands);
        cur.x += if goal_x > cur.x { 1 } else { -1 };
        path.push(*cur);
        commands.push("FW01".to_string());
    }
    while cur.y != goal_y {
        let dir = if goal_y > cur.y {
            Direction::North
        } else {
            Direction::South
        };
        turn_to(cur, dir, path, commands);
        cur.y += if goal_y > cur.y { 1 } else { -1 };
        path.push(*cur);
        commands.push("FW01".to_string());
    }
}

fn turn_to(cur: &mut Pose, target: Direction, path: &mut Vec<Pose>, commands: &mut Vec<String>) {
    if target == Direction::Skip {
        return;
    }
    while cur.direction != target {
        let diff = (target.code() + 8 - cur.direction.code()) % 8;
        if diff == 6 {
            cur.direction = left_of(cur.direction);
            path.push(*cur);
            commands.push("TL".to_string());
        } else {
            cur.direction = right_of(cur.direction);
            path.push(*cur);
            commands.push("TR".to_string());
        }
    }
}

fn clamp_inside(v: i32) -> i32 {
    v.clamp(1, GRID_SIZE - 2)
}

fn right_of(d: Direction) -> Direction {
    match d {
        Direction::North => Direction::East,
        Direction::East => Direction::South,
        Direction::South => Direction::West,
        Direction::West => Direction::North,
        Direction::Skip => Direction::East,
    }
}

fn left_of(d: Direction) -> Direction {
    match d {
        Direction::North => Direction::West,
        Direction::West => Direction::South,
        Direction::South => Direction::East,
        Direction::East => Direction::North,
        Direction::Skip => Direction::West,
    }
}

fn opposite(d: Direction) -> Direction {
    match d {
        Direction::North => Direction::South,
        Direction::South => Direction::North,
        Direction::East => Direction::West,
        Direction::West => Direction::East,
        Direction::Skip => Direction::Skip,
    }
}
