pub mod events;
pub mod ports;
pub mod types;

pub use events::*;
pub use ports::*;
pub use types::*;
