//! Read-only views of the host world.
//!
//! The engine never owns actors. Each tick it asks an [`ActorOracle`] who is
//! online and where they stand, then works from the returned [`ActorView`]
//! snapshots. Hosts implement the trait over their own player tables; tests and
//! the reference binary use [`ActorRoster`].
mod actors;

pub use actors::{ActorOracle, ActorRoster, ActorView};
