//! Server actor.
//!
//! The only owner of the [`Registry`](crate::domain::Registry). Connections talk
//! to it through a cloneable [`ServerHandle`]; every event is applied to
//! completion before the next one is taken, so the registry needs no locks.
//!
//! Events from different connections are processed one at a time; the relative
//! order among connections that are ready at the same moment is unspecified.

mod command;
mod handle;
mod server;

pub use command::Command;
pub use handle::{HandleError, ServerHandle};
pub use server::ServerActor;
