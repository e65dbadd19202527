pub mod simulator_service;

pub use simulator_service::*;
