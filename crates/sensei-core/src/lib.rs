//! Domain models for the Sensei streaming conversation pipeline.
//!
//! This crate holds the value types shared across the workspace: the
//! [`StreamChunk`] wire protocol, token usage accounting, the
//! [`CoachingContext`] snapshot with its sub-persona adaptation state, and
//! the shared [`SenseiError`] taxonomy. It performs no I/O.

pub mod chunk;
pub mod context;
pub mod error;
pub mod message;
pub mod usage;

pub use chunk::{ChunkMetadata, ErrorDetails, StreamChunk, TypingState};
pub use context::{
    CoachingContext, ExperienceLevel, FrameworkEmphasis, Pathway, Phase, QuestioningStyle,
    ResponseLength, SessionDescriptor, SubPersonaState, UserProfile,
};
pub use error::{Result, SenseiError};
pub use message::{ChatMessage, ChatRole};
pub use usage::TokenUsage;
