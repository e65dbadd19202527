use arena_sim::application::SimulatorService;
use arena_sim::common::{ApplicationError, DomainError, DomainResult};
use arena_sim::domains::arena::{Direction, Pose, ScenePhase};
use arena_sim::domains::logger::DomainLogger;
use arena_sim::domains::planning::{PlanReply, PlanRequest, RoutePlanner};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_test::assert_ok;

struct BridgeCapture {
    messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    fn new() -> Self {
        Self {
            messages: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("INFO:{}", msg));
    }
    fn warn(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("WARN:{}", msg));
    }
    fn error(&self, msg: &str) {
        self.messages.lock().unwrap().push(format!("ERR:{}", msg));
    }
}

enum Outcome {
    Success(Vec<Pose>, Vec<&'static str>),
    Failure(&'static str),
}

/// Scripted planner: pops one outcome per plan call, echoing the request id
/// the way the real collaborator correlates replies.
struct SequencePlanner {
    outcomes: Mutex<VecDeque<Outcome>>,
}

impl SequencePlanner {
    fn new(outcomes: Vec<Outcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
        }
    }
}

#[async_trait]
impl RoutePlanner for SequencePlanner {
    async fn plan(&self, request: PlanRequest) -> DomainResult<PlanReply> {
        let outcome = self
            .outcomes
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected plan call");
        match outcome {
            Outcome::Success(path, commands) => Ok(PlanReply {
                request_id: request.request_id,
                path,
                commands: commands.into_iter().map(String::from).collect(),
            }),
            Outcome::Failure(reason) => Err(DomainError::PlanningFailed {
                reason: reason.to_string(),
            }),
        }
    }
}

/// Planner that never answers within any reasonable deadline.
struct HangingPlanner;

#[async_trait]
impl RoutePlanner for HangingPlanner {
    async fn plan(&self, _request: PlanRequest) -> DomainResult<PlanReply> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Err(DomainError::PlanningFailed {
            reason: "unreachable".to_string(),
        })
    }
}

fn pose(x: i32, y: i32) -> Pose {
    Pose::new(x, y, Direction::North)
}

fn service_with(
    planner: Arc<dyn RoutePlanner>,
    timeout: Duration,
) -> (SimulatorService, Arc<Mutex<Vec<String>>>) {
    let capture = Arc::new(BridgeCapture::new());
    let messages = capture.messages.clone();
    let service = SimulatorService::new(planner, capture, timeout);
    (service, messages)
}

#[tokio::test]
async fn test_compute_success_populates_playback_state() {
    let planner = Arc::new(SequencePlanner::new(vec![Outcome::Success(
        vec![pose(1, 1), pose(1, 2), pose(1, 3)],
        vec!["SNAP1", "FW10", "TL"],
    )]));
    let (mut service, _) = service_with(planner, Duration::from_secs(5));

    service.add_obstacle(5, 5, Direction::West).unwrap();
    let steps = assert_ok!(service.compute().await);
    assert_eq!(steps, 3);

    let scene = service.scene();
    assert_eq!(scene.path.len(), 3);
    assert_eq!(scene.commands, vec!["FW10".to_string(), "TL".to_string()]);
    assert_eq!(
        scene.step_labels,
        vec![String::new(), "FW10".to_string(), "TL".to_string()]
    );
    assert_eq!(scene.step, 0);
    assert_eq!(scene.robot, pose(1, 1));
    assert_eq!(scene.phase, ScenePhase::Idle);
}

#[tokio::test]
async fn test_compute_failure_is_surfaced_and_keeps_previous_path() {
    let planner = Arc::new(SequencePlanner::new(vec![
        Outcome::Success(vec![pose(1, 1), pose(2, 1)], vec!["FW01", "FW01"]),
        Outcome::Failure("planner returned no usable data"),
    ]));
    let (mut service, messages) = service_with(planner, Duration::from_secs(5));

    assert_ok!(service.compute().await);
    assert_eq!(service.scene().path.len(), 2);

    // Failures must come back as errors, not vanish.
    let result = service.compute().await;
    match result {
        Err(ApplicationError::Domain(DomainError::PlanningFailed { reason })) => {
            assert!(reason.contains("no usable data"));
        }
        other => panic!("Expected PlanningFailed, got {:?}", other.map(|_| ())),
    }

    // Previous path untouched, gate released.
    let scene = service.scene();
    assert_eq!(scene.path.len(), 2);
    assert_eq!(scene.phase, ScenePhase::Idle);

    let msgs = messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.starts_with("ERR:") && m.contains("failed")));
}

#[tokio::test]
async fn test_compute_times_out_against_hung_planner() {
    let (mut service, messages) = service_with(Arc::new(HangingPlanner), Duration::from_millis(50));

    let result = service.compute().await;
    match result {
        Err(ApplicationError::Planner(reason)) => assert!(reason.contains("timed out")),
        other => panic!("Expected timeout error, got {:?}", other.map(|_| ())),
    }

    // The gate is released even though the collaborator never answered.
    assert_eq!(service.scene().phase, ScenePhase::Idle);
    assert!(service.scene().path.is_empty());

    let msgs = messages.lock().unwrap();
    assert!(msgs.iter().any(|m| m.contains("timed out")));
}

#[tokio::test]
async fn test_obstacle_edits_rejected_during_playback() {
    let planner = Arc::new(SequencePlanner::new(vec![Outcome::Success(
        vec![pose(1, 1), pose(1, 2)],
        vec!["FW01", "FW01"],
    )]));
    let (mut service, _) = service_with(planner, Duration::from_secs(5));

    service.add_obstacle(5, 5, Direction::North).unwrap();
    assert_ok!(service.compute().await);

    let result = service.remove_obstacle_at(5, 5);
    assert!(matches!(result, Err(DomainError::StateConflict { .. })));

    // reset clears the path and unlocks obstacle removal.
    service.reset_scene().unwrap();
    assert_ok!(service.remove_obstacle_at(5, 5));
}

#[tokio::test]
async fn test_playback_steps_through_service() {
    let planner = Arc::new(SequencePlanner::new(vec![Outcome::Success(
        vec![pose(1, 1), pose(1, 2), pose(1, 3)],
        vec!["FW01", "FW01", "FW01"],
    )]));
    let (mut service, _) = service_with(planner, Duration::from_secs(5));

    assert_ok!(service.compute().await);
    assert!(service.advance_step().unwrap());
    assert_eq!(service.scene().robot, pose(1, 2));
    assert!(service.retreat_step().unwrap());
    assert_eq!(service.scene().robot, pose(1, 1));
    assert!(!service.retreat_step().unwrap());
}
