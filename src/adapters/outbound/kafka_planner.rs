use crate::common::{DomainError, DomainResult, EventEnvelope, EventMetadata};
use crate::config::KafkaConfig;
use crate::domains::planning::{PlanReply, PlanRequest, PlanningEvent, RoutePlanner};
use crate::domains::DynLogger;
use async_trait::async_trait;
use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::producer::{FutureProducer, FutureRecord};
use rdkafka::Message;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Planner port adapter talking to the external planner fleet over Kafka.
/// One `plan` call publishes a single request envelope and blocks on the
/// correlated reply; the overall deadline is owned by the caller.
pub struct KafkaRoutePlanner {
    producer: FutureProducer,
    brokers: String,
    group_id: String,
    request_topic: String,
    reply_topic: String,
    planner_id: String,
    logger: DynLogger,
}

impl KafkaRoutePlanner {
    pub fn new(kafka: &KafkaConfig, planner_id: String, logger: DynLogger) -> DomainResult<Self> {
        let brokers = kafka.brokers.join(",");
        let producer: FutureProducer = ClientConfig::new()
            .set("bootstrap.servers", &brokers)
            .set("client.id", &kafka.client_id)
            .create()
            .map_err(|e| {
                DomainError::InfrastructureError(format!("Failed to create producer: {}", e))
            })?;

        Ok(Self {
            producer,
            brokers,
            group_id: kafka.group_id.clone(),
            request_topic: kafka.topics.plan_requests.clone(),
            reply_topic: kafka.topics.plan_replies.clone(),
            planner_id,
            logger,
        })
    }

    /// Create a uniquely-grouped consumer for the replies topic and wait for
    /// partition assignment, so a reply produced immediately after the
    /// request is not missed.
    async fn reply_consumer(&self) -> DomainResult<StreamConsumer> {
        // Unique group per request so every call sees the replies topic.
        let reply_group = format!("{}-{}", self.group_id, Uuid::new_v4());
        let consumer: StreamConsumer = ClientConfig::new()
            .set("group.id", &reply_group)
            .set("bootstrap.servers", &self.brokers)
            .set("enable.partition.eof", "false")
            .set("session.timeout.ms", "6000")
            .set("enable.auto.commit", "true")
            .set("auto.offset.reset", "latest")
            .create()
            .map_err(|e| {
                DomainError::InfrastructureError(format!("Failed to create reply consumer: {}", e))
            })?;

        consumer
            .subscribe(&[self.reply_topic.as_str()])
            .map_err(|e| {
                DomainError::InfrastructureError(format!(
                    "Failed to subscribe to replies topic: {}",
                    e
                ))
            })?;

        let assign_deadline = Instant::now() + Duration::from_secs(3);
        loop {
            match consumer.assignment() {
                Ok(tpl) => {
                    if tpl.count() > 0 {
                        break;
                    }
                }
                Err(e) => {
                    self.logger
                        .warn(&format!("Failed to query consumer assignment: {}", e));
                }
            }

            if Instant::now() > assign_deadline {
                self.logger.warn(
                    "Timed out waiting for reply consumer partition assignment; proceeding anyway",
                );
                break;
            }

            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        Ok(consumer)
    }
}

#[async_trait]
impl RoutePlanner for KafkaRoutePlanner {
    async fn plan(&self, request: PlanRequest) -> DomainResult<PlanReply> {
        // Subscribe before publishing so the reply cannot race the consumer.
        let consumer = self.reply_consumer().await?;

        let event = PlanningEvent::PlanRequested {
            planner_id: self.planner_id.clone(),
            request_id: request.request_id.clone(),
            obstacles: request.obstacles.clone(),
            robot_x: request.robot_x,
            robot_y: request.robot_y,
            robot_direction: request.robot_direction,
            timestamp: request.created_at,
        };
        let envelope = EventEnvelope::new(
            &event,
            "RoutePlan",
            EventMetadata {
                correlation_id: Some(request.request_id.clone()),
                source: "arena-sim".to_string(),
            },
        )?;
        let payload = serde_json::to_string(&envelope)?;

        self.producer
            .send(
                FutureRecord::to(&self.request_topic)
                    .key(&request.request_id)
                    .payload(&payload),
                Duration::from_secs(5),
            )
            .await
            .map_err(|(e, _)| {
                DomainError::InfrastructureError(format!("Failed to publish plan request: {}", e))
            })?;
        self.logger.info(&format!(
            "Published plan request {} to {}",
            request.request_id, self.request_topic
        ));

        loop {
            let message = consumer.recv().await.map_err(|e| {
                DomainError::InfrastructureError(format!("Reply consumer error: {}", e))
            })?;
            let Some(payload) = message.payload() else {
                continue;
            };

            let envelope: EventEnvelope = match serde_json::from_slice(payload) {
                Ok(envelope) => envelope,
                Err(e) => {
                    self.logger
                        .warn(&format!("Skipping undecodable reply envelope: {}", e));
                    continue;
                }
            };
            let event: PlanningEvent = match serde_json::from_value(envelope.event_data) {
                Ok(event) => event,
                Err(e) => {
                    self.logger
                        .warn(&format!("Skipping unknown reply event: {}", e));
                    continue;
                }
            };

            match event {
                PlanningEvent::PlanCompleted {
                    request_id,
                    path,
                    commands,
                    ..
                } if request_id == request.request_id => {
                    return Ok(PlanReply {
                        request_id,
                        path,
                        commands,
                    });
                }
                PlanningEvent::PlanFailed {
                    request_id, reason, ..
                } if request_id == request.request_id => {
                    return Err(DomainError::PlanningFailed { reason });
                }
                // A reply correlated to some other client's request.
                _ => {}
            }
        }
    }
}
