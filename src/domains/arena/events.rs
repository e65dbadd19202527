use super::types::{Obstacle, Pose};
use crate::common::DomainEvent;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SceneEvent {
    SceneCreated {
        scene_id: String,
        timestamp: DateTime<Utc>,
    },
    ObstacleAdded {
        scene_id: String,
        obstacle: Obstacle,
        timestamp: DateTime<Utc>,
    },
    ObstacleRemoved {
        scene_id: String,
        obstacle: Obstacle,
        timestamp: DateTime<Utc>,
    },
    RobotPoseSet {
        scene_id: String,
        pose: Pose,
        timestamp: DateTime<Utc>,
    },
    ComputeStarted {
        scene_id: String,
        request_id: String,
        timestamp: DateTime<Utc>,
    },
    ComputeCompleted {
        scene_id: String,
        request_id: String,
        path: Vec<Pose>,
        commands: Vec<String>,
        step_labels: Vec<String>,
        timestamp: DateTime<Utc>,
    },
    ComputeFailed {
        scene_id: String,
        request_id: String,
        reason: String,
        timestamp: DateTime<Utc>,
    },
    SteppedTo {
        scene_id: String,
        step: usize,
        timestamp: DateTime<Utc>,
    },
    SceneReset {
        scene_id: String,
        obstacles_cleared: bool,
        timestamp: DateTime<Utc>,
    },
}

impl DomainEvent for SceneEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SceneEvent::SceneCreated { .. } => "SceneCreated",
            SceneEvent::ObstacleAdded { .. } => "ObstacleAdded",
            SceneEvent::ObstacleRemoved { .. } => "ObstacleRemoved",
            SceneEvent::RobotPoseSet { .. } => "RobotPoseSet",
            SceneEvent::ComputeStarted { .. } => "ComputeStarted",
            SceneEvent::ComputeCompleted { .. } => "ComputeCompleted",
            SceneEvent::ComputeFailed { .. } => "ComputeFailed",
            SceneEvent::SteppedTo { .. } => "SteppedTo",
            SceneEvent::SceneReset { .. } => "SceneReset",
        }
    }

    fn aggregate_id(&self) -> &str {
        match self {
            SceneEvent::SceneCreated { scene_id, .. } => scene_id,
            SceneEvent::ObstacleAdded { scene_id, .. } => scene_id,
            SceneEvent::ObstacleRemoved { scene_id, .. } => scene_id,
            SceneEvent::RobotPoseSet { scene_id, .. } => scene_id,
            SceneEvent::ComputeStarted { scene_id, .. } => scene_id,
            SceneEvent::ComputeCompleted { scene_id, .. } => scene_id,
            SceneEvent::ComputeFailed { scene_id, .. } => scene_id,
            SceneEvent::SteppedTo { scene_id, .. } => scene_id,
            SceneEvent::SceneReset { scene_id, .. } => scene_id,
        }
    }

    fn event_version(&self) -> u64 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SceneEvent::SceneCreated { timestamp, .. } => *timestamp,
            SceneEvent::ObstacleAdded { timestamp, .. } => *timestamp,
            SceneEvent::ObstacleRemoved { timestamp, .. } => *timestamp,
            SceneEvent::RobotPoseSet { timestamp, .. } => *timestamp,
            SceneEvent::ComputeStarted { timestamp, .. } => *timestamp,
            SceneEvent::ComputeCompleted { timestamp, .. } => *timestamp,
            SceneEvent::ComputeFailed { timestamp, .. } => *timestamp,
            SceneEvent::SteppedTo { timestamp, .. } => *timestamp,
            SceneEvent::SceneReset { timestamp, .. } => *timestamp,
        }
    }
}
