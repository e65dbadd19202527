use arena_sim::adapters::inbound::ConsoleFrontend;
use arena_sim::adapters::outbound::{init_combined_logger, KafkaRoutePlanner, RouteStubPlanner};
use arena_sim::application::SimulatorService;
use arena_sim::domains::planning::DynRoutePlanner;
use arena_sim::Config;
use std::error::Error;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    info!("Starting Arena Simulator");

    let config = match Config::from_file("config.toml").await {
        Ok(config) => {
            info!("Configuration loaded from config.toml");
            config
        }
        Err(_) => {
            info!("config.toml not found, using default configuration");
            Config::default()
        }
    };

    let logger = init_combined_logger(&config.logging.file);

    let offline = std::env::args().any(|arg| arg == "--offline");
    let planner: DynRoutePlanner = if offline {
        logger.info("Planning with the in-process stub (--offline)");
        Arc::new(RouteStubPlanner::new())
    } else {
        logger.info(&format!(
            "Planning via Kafka brokers {:?}",
            config.kafka.brokers
        ));
        Arc::new(KafkaRoutePlanner::new(
            &config.kafka,
            config.planner.planner_id.clone(),
            logger.clone(),
        )?)
    };

    let service = SimulatorService::new(
        planner,
        logger,
        Duration::from_secs(config.planner.timeout_secs),
    );

    let mut frontend = ConsoleFrontend::new(service);
    frontend.run().await?;

    info!("Shutting down Arena Simulator");
    Ok(())
}
