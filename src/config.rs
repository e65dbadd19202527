use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub kafka: KafkaConfig,
    pub planner: PlannerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    pub brokers: Vec<String>,
    pub client_id: String,
    pub group_id: String,
    pub topics: KafkaTopics,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaTopics {
    pub plan_requests: String,
    pub plan_replies: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    pub planner_id: String,
    /// Upper bound on a single planning round trip; the request is abandoned
    /// once it elapses.
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub file: String,
}

impl Config {
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kafka: KafkaConfig {
                brokers: vec!["localhost:9092".to_string()],
                client_id: "arena-sim".to_string(),
                group_id: "arena-sim-group".to_string(),
                topics: KafkaTopics {
                    plan_requests: "plan-requests".to_string(),
                    plan_replies: "plan-replies".to_string(),
                },
            },
            planner: PlannerConfig {
                planner_id: "main-route-planner".to_string(),
                timeout_secs: 30,
            },
            logging: LoggingConfig {
                file: "./arena-sim.log".to_string(),
            },
        }
    }
}
