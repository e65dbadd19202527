use crate::common::{ApplicationError, ApplicationResult, DomainResult};
use crate::domains::arena::{Direction, Obstacle, Scene};
use crate::domains::planning::{DynRoutePlanner, PlanRequest};
use crate::domains::DynLogger;
use std::time::Duration;
use uuid::Uuid;

/// Application service owning the scene and the planner port. All scene
/// mutations flow through here so the single-flight compute gate and the
/// logging policy sit in one place.
pub struct SimulatorService {
    scene: Scene,
    planner: DynRoutePlanner,
    logger: DynLogger,
    timeout: Duration,
}

impl SimulatorService {
    pub fn new(planner: DynRoutePlanner, logger: DynLogger, timeout: Duration) -> Self {
        let scene = Scene::new(format!("scene-{}", Uuid::new_v4()));
        logger.info(&format!("Created scene {}", scene.id));
        Self {
            scene,
            planner,
            logger,
            timeout,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn add_obstacle(&mut self, x: i32, y: i32, direction: Direction) -> DomainResult<u8> {
        let id = self.scene.add_obstacle(x, y, direction)?;
        self.logger.info(&format!(
            "Added obstacle {} at ({}, {}) facing {}",
            id,
            x,
            y,
            direction.label()
        ));
        Ok(id)
    }

    pub fn remove_obstacle_at(&mut self, x: i32, y: i32) -> DomainResult<Obstacle> {
        let removed = self.scene.remove_obstacle_at(x, y)?;
        self.logger
            .info(&format!("Removed obstacle {} at ({}, {})", removed.id, x, y));
        Ok(removed)
    }

    pub fn set_robot_pose(&mut self, x: i32, y: i32, direction: Direction) -> DomainResult<()> {
        self.scene.set_robot_pose(x, y, direction)?;
        self.logger.info(&format!(
            "Robot start pose set to ({}, {}) facing {}",
            x,
            y,
            direction.label()
        ));
        Ok(())
    }

    pub fn reset_scene(&mut self) -> DomainResult<()> {
        self.logger.info("Scene reset (obstacles kept)");
        self.scene.reset_scene()
    }

    pub fn reset_all(&mut self) -> DomainResult<()> {
        self.logger.info("Scene reset (obstacles cleared)");
        self.scene.reset_all()
    }

    pub fn advance_step(&mut self) -> DomainResult<bool> {
        self.scene.advance_step()
    }

    pub fn retreat_step(&mut self) -> DomainResult<bool> {
        self.scene.retreat_step()
    }

    /// Issue exactly one planning request for the current scene and wait for
    /// the reply, bounded by the configured timeout. The scene returns to
    /// `Idle` on every exit path; on failure the previously stored path is
    /// left untouched and the reason is both logged and returned.
    pub async fn compute(&mut self) -> ApplicationResult<usize> {
        let request_id = format!("req-{}", Uuid::new_v4());
        self.scene.begin_compute(request_id.clone())?;

        let request = PlanRequest::new(
            request_id.clone(),
            self.scene.obstacles.clone(),
            &self.scene.robot,
        );
        self.logger.info(&format!(
            "Submitting planning request {} ({} obstacles, robot at ({}, {}))",
            request_id,
            request.obstacles.len(),
            request.robot_x,
            request.robot_y
        ));

        match tokio::time::timeout(self.timeout, self.planner.plan(request)).await {
            Ok(Ok(reply)) => {
                let steps = self.scene.complete_compute(reply)?;
                self.logger
                    .info(&format!("Planning request {} returned {} steps", request_id, steps));
                Ok(steps)
            }
            Ok(Err(err)) => {
                let reason = err.to_string();
                self.scene.fail_compute(&request_id, &reason)?;
                self.logger
                    .error(&format!("Planning request {} failed: {}", request_id, reason));
                Err(err.into())
            }
            Err(_) => {
                let reason = format!(
                    "planning request {} timed out after {}s",
                    request_id,
                    self.timeout.as_secs()
                );
                self.scene.fail_compute(&request_id, &reason)?;
                self.logger.error(&reason);
                Err(ApplicationError::Planner(reason))
            }
        }
    }
}
