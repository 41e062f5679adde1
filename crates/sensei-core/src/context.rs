//! Coaching context domain model.
//!
//! A [`CoachingContext`] is an immutable-per-request snapshot of session
//! state supplied by the persistence collaborator. The core never stores it;
//! the only sanctioned mutation path is the pure sub-persona update function
//! in `sensei-persona`, which returns a new state value for the caller to
//! persist.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Coaching program track a session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Pathway {
    Entrepreneurship,
    CareerGrowth,
    Leadership,
    ProductStrategy,
}

/// Phase of the coaching session within its pathway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Discovery,
    Analysis,
    Planning,
    Execution,
    Review,
}

/// Self-reported experience level of the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Expert,
}

/// Descriptor of the currently active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescriptor {
    pub pathway: Pathway,
    pub phase: Phase,
    /// Completion percentage, 0-100.
    pub progress: u8,
}

impl SessionDescriptor {
    /// Creates a descriptor, clamping progress to 0-100.
    pub fn new(pathway: Pathway, phase: Phase, progress: u8) -> Self {
        Self {
            pathway,
            phase,
            progress: progress.min(100),
        }
    }
}

/// User profile fields relevant to prompt adaptation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// How the assistant questions the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuestioningStyle {
    Supportive,
    Curious,
    Challenging,
}

/// Preferred length of assistant responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ResponseLength {
    Concise,
    Moderate,
    Detailed,
}

/// How strongly coaching frameworks are woven into responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FrameworkEmphasis {
    Light,
    Moderate,
    Heavy,
}

impl FrameworkEmphasis {
    /// One step toward `Light`, saturating.
    pub fn lighter(self) -> Self {
        match self {
            Self::Heavy => Self::Moderate,
            _ => Self::Light,
        }
    }

    /// One step toward `Heavy`, saturating.
    pub fn heavier(self) -> Self {
        match self {
            Self::Light => Self::Moderate,
            _ => Self::Heavy,
        }
    }
}

/// Sub-persona adaptation state, evolved per conversation turn.
///
/// Seeded once at session start from the pathway, then nudged message by
/// message. Owned by the session and persisted by an external collaborator;
/// this crate only defines the value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubPersonaState {
    pub questioning_style: QuestioningStyle,
    pub response_length: ResponseLength,
    pub framework_emphasis: FrameworkEmphasis,
}

impl Default for SubPersonaState {
    /// The documented baseline: curious questioning, moderate length,
    /// moderate framework emphasis.
    fn default() -> Self {
        Self {
            questioning_style: QuestioningStyle::Curious,
            response_length: ResponseLength::Moderate,
            framework_emphasis: FrameworkEmphasis::Moderate,
        }
    }
}

/// Immutable-per-request snapshot of session and user state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoachingContext {
    /// Workspace this conversation belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub workspace_id: Option<String>,
    /// Active session descriptor, absent outside a structured session.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<UserProfile>,
    /// Goals the user set for the session.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub goals: Vec<String>,
    /// Insights surfaced in earlier turns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub insights: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_persona: Option<SubPersonaState>,
}
