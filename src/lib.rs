//! agent-relay: conversational adapter for hosted agent applications.
//!
//! Drives a remote agent application through its three-step request
//! lifecycle (create conversation, create request, stream the result) and
//! normalizes the outcome into a [`ReplyOutcome`](types::ReplyOutcome).
//!
//! # Quick Start
//!
//! ```no_run
//! use agent_relay::prelude::*;
//!
//! # async fn example() -> agent_relay::error::Result<()> {
//! let config = RelayConfig::load(None)?;
//! let bot = AgentBot::from_config(&config)?;
//! let reply = bot.reply(&TurnContext::text("user-1", "你好")).await;
//! println!("{}", reply.payload());
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod prelude;
pub mod provider;
pub mod session;
pub mod stream;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
