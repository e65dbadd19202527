use super::events::SceneEvent;
use super::types::{Direction, Obstacle, Pose, GRID_SIZE, OBSTACLE_ID_MAX, OBSTACLE_ID_MIN};
use crate::common::{AggregateRoot, DomainError, DomainResult};
use crate::domains::planning::{is_snapshot_token, PlanReply};
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Gate for the single in-flight planning request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScenePhase {
    Idle,
    Computing { request_id: String },
}

impl ScenePhase {
    pub fn is_computing(&self) -> bool {
        matches!(self, ScenePhase::Computing { .. })
    }
}

/// The editable scene: robot start pose, obstacle set, and the playback
/// state for the last planned path. Owned by a single controller; every
/// mutation is a named method that validates, records a [`SceneEvent`] and
/// applies it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub robot: Pose,
    pub obstacles: Vec<Obstacle>,
    pub path: Vec<Pose>,
    /// Movement command trace with snapshot tokens filtered out. Shorter
    /// than `path` whenever the reply contained snapshot tokens; use
    /// `step_labels` for anything indexed by playback step.
    pub commands: Vec<String>,
    /// Same length as `path`; snapshot steps carry an empty label.
    pub step_labels: Vec<String>,
    pub step: usize,
    pub phase: ScenePhase,
    pub version: u64,
    #[serde(skip)]
    uncommitted_events: Vec<SceneEvent>,
}

impl Scene {
    pub fn new(id: String) -> Self {
        let mut scene = Self {
            id: id.clone(),
            robot: Self::default_robot(),
            obstacles: Vec::new(),
            path: Vec::new(),
            commands: Vec::new(),
            step_labels: Vec::new(),
            step: 0,
            phase: ScenePhase::Idle,
            version: 0,
            uncommitted_events: Vec::new(),
        };

        let event = SceneEvent::SceneCreated {
            scene_id: id,
            timestamp: Utc::now(),
        };

        scene.add_event(event);
        scene
    }

    fn default_robot() -> Pose {
        Pose::new(1, 1, Direction::North)
    }

    /// Add an obstacle at logical `(x, y)` facing `direction` and return its
    /// allocated id.
    ///
    /// The `(0, 0)` rejection mirrors the front-end's falsy-input check; it
    /// is not a rule about the origin cell, a single zero coordinate passes.
    pub fn add_obstacle(&mut self, x: i32, y: i32, direction: Direction) -> DomainResult<u8> {
        if x == 0 && y == 0 {
            return Err(DomainError::InvalidInput {
                reason: "obstacle position (0, 0) is not accepted".to_string(),
            });
        }
        if !Self::in_grid(x, y) {
            return Err(DomainError::InvalidInput {
                reason: format!("obstacle position ({}, {}) is outside the arena", x, y),
            });
        }

        let id = self.next_obstacle_id()?;
        let event = SceneEvent::ObstacleAdded {
            scene_id: self.id.clone(),
            obstacle: Obstacle { x, y, direction, id },
            timestamp: Utc::now(),
        };
        self.add_event(event.clone());
        self.apply(&event)?;
        Ok(id)
    }

    /// Remove the first obstacle matching on coordinates only (not id) and
    /// return it. At most one entry is removed per call. Rejected while a
    /// path is loaded or a planning request is in flight.
    pub fn remove_obstacle_at(&mut self, x: i32, y: i32) -> DomainResult<Obstacle> {
        if !self.path.is_empty() {
            return Err(DomainError::StateConflict {
                reason: "obstacles are locked while a path is loaded".to_string(),
            });
        }
        if self.phase.is_computing() {
            return Err(DomainError::StateConflict {
                reason: "obstacles are locked while a planning request is in flight".to_string(),
            });
        }

        let obstacle = self
            .obstacles
            .iter()
            .find(|ob| ob.x == x && ob.y == y)
            .copied()
            .ok_or_else(|| DomainError::InvalidInput {
                reason: format!("no obstacle at ({}, {})", x, y),
            })?;

        let event = SceneEvent::ObstacleRemoved {
            scene_id: self.id.clone(),
            obstacle,
            timestamp: Utc::now(),
        };
        self.add_event(event.clone());
        self.apply(&event)?;
        Ok(obstacle)
    }

    /// Commit a new robot start pose in one atomic update, clearing any
    /// marker status. The robot stays one cell inside the border.
    pub fn set_robot_pose(&mut self, x: i32, y: i32, direction: Direction) -> DomainResult<()> {
        if !(1..GRID_SIZE - 1).contains(&x) || !(1..GRID_SIZE - 1).contains(&y) {
            return Err(DomainError::InvalidInput {
                reason: format!("robot position ({}, {}) must stay within [1, 18]", x, y),
            });
        }

        let event = SceneEvent::RobotPoseSet {
            scene_id: self.id.clone(),
            pose: Pose::new(x, y, direction),
            timestamp: Utc::now(),
        };
        self.add_event(event.clone());
        self.apply(&event)?;
        Ok(())
    }

    /// Enter the `Computing` phase. Exactly one request may be in flight.
    pub fn begin_compute(&mut self, request_id: String) -> DomainResult<()> {
        if self.phase.is_computing() {
            return Err(DomainError::StateConflict {
                reason: "a planning request is already in flight".to_string(),
            });
        }

        let event = SceneEvent::ComputeStarted {
            scene_id: self.id.clone(),
            request_id,
            timestamp: Utc::now(),
        };
        self.add_event(event.clone());
        self.apply(&event)?;
        Ok(())
    }

    /// Store a successful planning reply and return the number of playback
    /// steps. Snapshot tokens are filtered out of the stored command trace
    /// (leaving it shorter than the path); the aligned `step_labels` vector
    /// keeps one label per pose, empty on snapshot steps.
    pub fn complete_compute(&mut self, reply: PlanReply) -> DomainResult<usize> {
        self.expect_in_flight(&reply.request_id)?;

        let commands: Vec<String> = reply
            .commands
            .iter()
            .filter(|c| !is_snapshot_token(c))
            .cloned()
            .collect();
        let step_labels: Vec<String> = (0..reply.path.len())
            .map(|i| match reply.commands.get(i) {
                Some(c) if !is_snapshot_token(c) => c.clone(),
                _ => String::new(),
            })
            .collect();

        let steps = reply.path.len();
        let event = SceneEvent::ComputeCompleted {
            scene_id: self.id.clone(),
            request_id: reply.request_id,
            path: reply.path,
            commands,
            step_labels,
            timestamp: Utc::now(),
        };
        self.add_event(event.clone());
        self.apply(&event)?;
        Ok(steps)
    }

    /// Record a failed planning round trip. The previously stored path and
    /// commands are left untouched.
    pub fn fail_compute(&mut self, request_id: &str, reason: &str) -> DomainResult<()> {
        self.expect_in_flight(request_id)?;

        let event = SceneEvent::ComputeFailed {
            scene_id: self.id.clone(),
            request_id: request_id.to_string(),
            reason: reason.to_string(),
            timestamp: Utc::now(),
        };
        self.add_event(event.clone());
        self.apply(&event)?;
        Ok(())
    }

    /// Step forward through the planned path. Returns `false` without
    /// touching the scene when already at the last step or no path is
    /// loaded.
    pub fn advance_step(&mut self) -> DomainResult<bool> {
        if self.path.is_empty() || self.step + 1 >= self.path.len() {
            return Ok(false);
        }
        self.step_to(self.step + 1)?;
        Ok(true)
    }

    /// Step backward through the planned path. Returns `false` without
    /// touching the scene when already at the first step.
    pub fn retreat_step(&mut self) -> DomainResult<bool> {
        if self.path.is_empty() || self.step == 0 {
            return Ok(false);
        }
        self.step_to(self.step - 1)?;
        Ok(true)
    }

    /// Reset robot pose and playback state, keeping the obstacle set.
    pub fn reset_scene(&mut self) -> DomainResult<()> {
        self.reset(false)
    }

    /// Reset robot pose and playback state and clear the obstacle set.
    pub fn reset_all(&mut self) -> DomainResult<()> {
        self.reset(true)
    }

    /// Label for the current playback step; empty on snapshot steps.
    pub fn current_step_label(&self) -> &str {
        self.step_labels
            .get(self.step)
            .map(String::as_str)
            .unwrap_or("")
    }

    fn reset(&mut self, obstacles_cleared: bool) -> DomainResult<()> {
        let event = SceneEvent::SceneReset {
            scene_id: self.id.clone(),
            obstacles_cleared,
            timestamp: Utc::now(),
        };
        self.add_event(event.clone());
        self.apply(&event)?;
        Ok(())
    }

    fn step_to(&mut self, step: usize) -> DomainResult<()> {
        let event = SceneEvent::SteppedTo {
            scene_id: self.id.clone(),
            step,
            timestamp: Utc::now(),
        };
        self.add_event(event.clone());
        self.apply(&event)?;
        Ok(())
    }

    fn expect_in_flight(&self, request_id: &str) -> DomainResult<()> {
        match &self.phase {
            ScenePhase::Computing { request_id: active } if active == request_id => Ok(()),
            ScenePhase::Computing { request_id: active } => Err(DomainError::StateConflict {
                reason: format!(
                    "planning reply for {} does not match in-flight request {}",
                    request_id, active
                ),
            }),
            ScenePhase::Idle => Err(DomainError::StateConflict {
                reason: "no planning request is in flight".to_string(),
            }),
        }
    }

    /// Smallest unused id in `[1, 10]`. Deterministic, and fails explicitly
    /// once all ten ids are taken instead of retrying.
    fn next_obstacle_id(&self) -> DomainResult<u8> {
        (OBSTACLE_ID_MIN..=OBSTACLE_ID_MAX)
            .find(|id| self.obstacles.iter().all(|ob| ob.id != *id))
            .ok_or(DomainError::IdSpaceExhausted)
    }

    fn in_grid(x: i32, y: i32) -> bool {
        (0..GRID_SIZE).contains(&x) && (0..GRID_SIZE).contains(&y)
    }

    // Public methods for AggregateRoot trait
    pub fn uncommitted_events(&self) -> &[SceneEvent] {
        &self.uncommitted_events
    }
    pub fn mark_events_as_committed(&mut self) {
        self.uncommitted_events.clear();
    }
    pub fn add_event(&mut self, event: SceneEvent) {
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for Scene {
    type Event = SceneEvent;

    fn aggregate_id(&self) -> &str {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) -> DomainResult<()> {
        match event {
            SceneEvent::SceneCreated { .. } => {}
            SceneEvent::ObstacleAdded { obstacle, .. } => {
                self.obstacles.push(*obstacle);
            }
            SceneEvent::ObstacleRemoved { obstacle, .. } => {
                if let Some(pos) = self.obstacles.iter().position(|ob| ob.id == obstacle.id) {
                    self.obstacles.remove(pos);
                }
            }
            SceneEvent::RobotPoseSet { pose, .. } => {
                self.robot = *pose;
            }
            SceneEvent::ComputeStarted { request_id, .. } => {
                self.phase = ScenePhase::Computing {
                    request_id: request_id.clone(),
                };
            }
            SceneEvent::ComputeCompleted {
                path,
                commands,
                step_labels,
                ..
            } => {
                self.path = path.clone();
                self.commands = commands.clone();
                self.step_labels = step_labels.clone();
                self.step = 0;
                if let Some(start) = self.path.first() {
                    self.robot = *start;
                }
                self.phase = ScenePhase::Idle;
            }
            SceneEvent::ComputeFailed { .. } => {
                self.phase = ScenePhase::Idle;
            }
            SceneEvent::SteppedTo { step, .. } => {
                self.step = *step;
                if let Some(pose) = self.path.get(*step) {
                    self.robot = *pose;
                }
            }
            SceneEvent::SceneReset {
                obstacles_cleared, ..
            } => {
                self.robot = Self::default_robot();
                self.path.clear();
                self.commands.clear();
                self.step_labels.clear();
                self.step = 0;
                if *obstacles_cleared {
                    self.obstacles.clear();
                }
            }
        }
        self.version += 1;
        Ok(())
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        Scene::uncommitted_events(self)
    }

    fn mark_events_as_committed(&mut self) {
        Scene::mark_events_as_committed(self)
    }

    fn add_event(&mut self, event: Self::Event) {
        Scene::add_event(self, event)
    }
}
