//! Persona context engine for the Sensei coaching pipeline.
//!
//! Pure, deterministic mapping from session/user state to a system prompt,
//! quick-action suggestions, and the evolving sub-persona adaptation state.
//! Nothing in this crate performs I/O or retains state between calls.

pub mod adaptation;
pub mod engine;
pub mod quick_actions;
mod sections;

pub use adaptation::{initialize_sub_persona_state, update_session_state};
pub use engine::{PersonaConfig, PersonaEngine};
pub use quick_actions::quick_actions_for_phase;
