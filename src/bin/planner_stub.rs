use arena_sim::adapters::outbound::{init_combined_logger, synthesize_route};
use arena_sim::common::{EventEnvelope, EventMetadata};
use arena_sim::domains::planning::{PlanRequest, PlanningEvent};
use arena_sim::Config;
use chrono::Utc;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::Message;
use std::error::Error;
use tokio::sync::mpsc;
use tokio::task;
use tokio::time::{sleep, Duration};

/// External collaborator stand-in: consumes plan requests from Kafka,
/// synthesizes a naive route and publishes the reply. Run next to
/// `arena-sim` when no real planner fleet is available.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = match Config::from_file("config.toml").await {
        Ok(config) => config,
        Err(_) => Config::default(),
    };
    let logger = init_combined_logger(&config.logging.file);
    logger.info("Starting planner stub");

    let brokers = config.kafka.brokers.join(",");
    let request_topic = config.kafka.topics.plan_requests.clone();
    let reply_topic = config.kafka.topics.plan_replies.clone();
    let planner_id = config.planner.planner_id.clone();

    let consumer: StreamConsumer = ClientConfig::new()
        .set("group.id", "planner-stub-group")
        .set("bootstrap.servers", &brokers)
        .set("enable.partition.eof", "false")
        .set("auto.offset.reset", "latest")
        .create()
        .map_err(|e| format!("Failed to create consumer: {}", e))?;
    consumer
        .subscribe(&[request_topic.as_str()])
        .map_err(|e| format!("Failed to subscribe to {}: {}", request_topic, e))?;

    let producer: FutureProducer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("client.id", &config.kafka.client_id)
        .create()
        .map_err(|e| format!("Failed to create producer: {}", e))?;

    let (tx, mut rx) = mpsc::channel::<PlanRequest>(100);

    let consume_logger = logger.clone();
    task::spawn(async move {
        loop {
            let message = match consumer.recv().await {
                Ok(m) => m,
                Err(e) => {
                    consume_logger.error(&format!("Request consumer error: {}", e));
                    continue;
                }
            };
            let Some(payload) = message.payload() else {
                continue;
            };

            let envelope: EventEnvelope = match serde_json::from_slice(payload) {
                Ok(envelope) => envelope,
                Err(e) => {
                    consume_logger.warn(&format!("Skipping undecodable request: {}", e));
                    continue;
                }
            };
            let event: PlanningEvent = match serde_json::from_value(envelope.event_data) {
                Ok(event) => event,
                Err(e) => {
                    consume_logger.warn(&format!("Skipping unknown request event: {}", e));
                    continue;
                }
            };

            if let PlanningEvent::PlanRequested {
                request_id,
                obstacles,
                robot_x,
                robot_y,
                robot_direction,
                timestamp,
                ..
            } = event
            {
                consume_logger.info(&format!("Received plan request {}", request_id));
                let request = PlanRequest {
                    request_id,
                    obstacles,
                    robot_x,
                    robot_y,
                    robot_direction,
                    created_at: timestamp,
                };
                if tx.send(request).await.is_err() {
                    break;
                }
            }
        }
    });

    while let Some(request) = rx.recv().await {
        logger.info(&format!(
            "Planning request {}: {} obstacles, robot at ({}, {})",
            request.request_id,
            request.obstacles.len(),
            request.robot_x,
            request.robot_y
        ));

        // Simulated planning latency.
        let delay_ms = {
            use rand::Rng;
            rand::thread_rng().gen_range(120..600)
        };
        sleep(Duration::from_millis(delay_ms)).await;

        let reply = synthesize_route(&request);
        let event = PlanningEvent::PlanCompleted {
            planner_id: planner_id.clone(),
            request_id: reply.request_id.clone(),
            path: reply.path,
            commands: reply.commands,
            timestamp: Utc::now(),
        };
        let envelope = EventEnvelope::new(
            &event,
            "RoutePlan",
            EventMetadata {
                correlation_id: Some(reply.request_id.clone()),
                source: "planner-stub".to_string(),
            },
        )?;
        let payload = serde_json::to_string(&envelope)?;

        match producer
            .send(
                FutureRecord::to(&reply_topic)
                    .key(&reply.request_id)
                    .payload(&payload),
                Duration::from_secs(5),
            )
            .await
        {
            Ok(_) => logger.info(&format!("Published reply for {}", reply.request_id)),
            Err((e, _)) => logger.error(&format!(
                "Failed to publish reply for {}: {}",
                reply.request_id, e
            )),
        }
    }

    Ok(())
}
