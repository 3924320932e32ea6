pub mod common;

// Re-export common types
pub use common::{ActorId, Position, SourceId, Timestamp, WorldId};
