use crate::common::DomainEvent;
use crate::domains::arena::{Direction, Obstacle, Pose};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events exchanged with the planner fleet over the request and reply
/// topics. `planner_id` addresses the planner aggregate handling the
/// request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PlanningEvent {
    PlanRequested {
        planner_id: String,
        request_id: String,
        obstacles: Vec<Obstacle>,
        robot_x: i32,
        robot_y: i32,
        robot_direction: Direction,
        timestamp: DateTime<Utc>,
    },
    PlanCompleted {
        planner_id: String,
        request_id: String,
        path: Vec<Pose>,
        commands: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    PlanFailed {
        planner_id: String,
        request_id: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for PlanningEvent {
    fn event_type(&self) -> &'static str {
        match self {
            PlanningEvent::PlanRequested { .. } => "PlanRequested",
            PlanningEvent::PlanCompleted { .. } => "PlanCompleted",
            PlanningEvent::PlanFailed { .. } => "PlanFailed",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            PlanningEvent::PlanRequested { planner_id, .. } => planner_id,
            PlanningEvent::PlanCompleted { planner_id, .. } => planner_id,
            PlanningEvent::PlanFailed { planner_id, .. } => planner_id,
        }
    }

    fn event_version(&self) -> u64 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            PlanningEvent::PlanRequested { timestamp, .. } => *timestamp,
            PlanningEvent::PlanCompleted { timestamp, .. } => *timestamp,
            PlanningEvent::PlanFailed { timestamp, .. } => *timestamp,
        }
    }
}
