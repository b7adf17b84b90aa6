//! Core types for agent-relay.

pub mod context;
pub mod handle;
pub mod message;
pub mod reply;
pub mod turn;
pub mod usage;

pub use context::*;
pub use handle::*;
pub use message::*;
pub use reply::*;
pub use turn::*;
pub use usage::*;
