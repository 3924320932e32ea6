//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from worker coordination and repositories so clients can
//! bubble them up with consistent context. Lookups that find nothing are not
//! errors; they come back as `None` or `false`.
use thiserror::Error;
use tokio::sync::oneshot;

use rad_core::ActorId;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("runtime requires an actor oracle to be configured before building")]
    MissingActorOracle,

    #[error("actor {0:?} is not online")]
    UnknownActor(ActorId),

    #[error("a source named '{0}' already exists")]
    DuplicateSourceName(String),
}
