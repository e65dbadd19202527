pub mod arena;
pub mod logger;
pub mod planning;

pub use arena::*;
pub use logger::*;
pub use planning::*;
