//! Identity, position and time primitives shared by every component.
//!
//! Sources and exposure records are keyed by these types; the runtime and
//! persistence layers reuse them unchanged.
pub mod types;

pub use types::{ActorId, Position, SourceId, Timestamp, WorldId};
