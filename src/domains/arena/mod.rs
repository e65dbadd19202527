pub mod events;
pub mod grid;
pub mod scene;
pub mod types;

pub use events::*;
pub use grid::*;
pub use scene::*;
pub use types::*;
