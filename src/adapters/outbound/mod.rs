pub mod console_logger;
pub mod file_logger;
pub mod kafka_planner;
pub mod multi_logger;
pub mod route_stub;

pub use console_logger::*;
pub use file_logger::*;
pub use kafka_planner::*;
pub use multi_logger::*;
pub use route_stub::*;
