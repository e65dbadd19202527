use crate::domains::arena::{Direction, Obstacle, Pose};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Command tokens starting with this prefix denote planner-internal
/// checkpoints (image snapshots), not user-visible movement commands.
pub const SNAPSHOT_PREFIX: &str = "SNAP";

pub fn is_snapshot_token(token: &str) -> bool {
    token.starts_with(SNAPSHOT_PREFIX)
}

/// One-shot request carrying the full scene to the external planner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanRequest {
    pub request_id: String,
    pub obstacles: Vec<Obstacle>,
    pub robot_x: i32,
    pub robot_y: i32,
    pub robot_direction: Direction,
    pub created_at: DateTime<Utc>,
}

impl PlanRequest {
    pub fn new(request_id: String, obstacles: Vec<Obstacle>, robot: &Pose) -> Self {
        Self {
            request_id,
            obstacles,
            robot_x: robot.x,
            robot_y: robot.y,
            robot_direction: robot.direction,
            created_at: Utc::now(),
        }
    }
}

/// Successful planner reply: an ordered pose sequence and the command trace
/// aligned index-for-index with it, snapshot tokens included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanReply {
    pub request_id: String,
    pub path: Vec<Pose>,
    pub commands: Vec<String>,
}
