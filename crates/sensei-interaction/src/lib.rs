//! Upstream model interaction for the Sensei coaching pipeline.
//!
//! Holds the streaming [`CoachClient`], the retry/backoff
//! [`ConnectionManager`], client configuration, and the relay that bridges
//! a model response onto the wire protocol.

pub mod client;
pub mod config;
pub mod connection;
pub mod relay;
pub mod response;

pub use client::{CoachClient, UsageObserver};
pub use config::ClientConfig;
pub use connection::{ConnectionConfig, ConnectionManager, RetryObserver};
pub use relay::relay_response;
pub use response::{ChatResponse, ResponseEvent, ResponseState};
