//! The persona context engine.
//!
//! Deterministically renders a system prompt and quick-action suggestions
//! from a [`CoachingContext`]. The engine is an explicit, constructible
//! value — callers that need different coach configurations build separate
//! instances; there is no global state.

use crate::quick_actions::quick_actions_for_phase;
use crate::sections::{SECTION_BUILDERS, SectionInputs};
use sensei_core::{
    CoachingContext, ExperienceLevel, FrameworkEmphasis, Phase, QuestioningStyle, ResponseLength,
    SubPersonaState,
};

/// Static configuration of the coach persona.
#[derive(Debug, Clone)]
pub struct PersonaConfig {
    /// Display name the prompt introduces the assistant as.
    pub coach_name: String,
    /// One-line role description.
    pub coach_role: String,
    /// Framework catalog offered to the method-integration section.
    pub methods: Vec<String>,
}

impl Default for PersonaConfig {
    fn default() -> Self {
        Self {
            coach_name: "Sensei".to_string(),
            coach_role: "an experienced business coach".to_string(),
            methods: [
                "GROW",
                "SWOT analysis",
                "First Principles",
                "Five Whys",
                "OKRs",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Renders system prompts and quick actions from session state.
///
/// Every method is a pure function of its inputs: identical context values
/// produce byte-identical output.
#[derive(Debug, Clone, Default)]
pub struct PersonaEngine {
    config: PersonaConfig,
}

impl PersonaEngine {
    pub fn new(config: PersonaConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PersonaConfig {
        &self.config
    }

    /// Composes the system prompt from the fixed, ordered section list.
    ///
    /// Absent context degrades to the baseline configuration (curious
    /// questioning, moderate length, moderate framework emphasis). This
    /// function never fails on well-typed input.
    pub fn generate_system_prompt(&self, context: Option<&CoachingContext>) -> String {
        let inputs = SectionInputs {
            config: &self.config,
            style: resolve_style(context),
            context,
        };

        SECTION_BUILDERS
            .iter()
            .map(|(_, build)| build(&inputs))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Phase-keyed quick-action labels, with a generic fallback when no
    /// session phase is active.
    pub fn generate_quick_actions(&self, context: Option<&CoachingContext>) -> Vec<String> {
        let phase = context
            .and_then(|c| c.session.as_ref())
            .map(|session| session.phase);
        quick_actions_for_phase(phase)
    }
}

/// Resolves the effective sub-persona style for one request.
///
/// Precedence: an explicit adaptation state carried by the context wins;
/// otherwise the rule tables keyed on experience level and phase apply on
/// top of the baseline. Phase rules adjust emphasis and length only.
fn resolve_style(context: Option<&CoachingContext>) -> SubPersonaState {
    let Some(context) = context else {
        return SubPersonaState::default();
    };

    if let Some(state) = context.sub_persona {
        return state;
    }

    let mut state = SubPersonaState::default();

    if let Some(level) = context.profile.as_ref().and_then(|p| p.experience_level) {
        match level {
            ExperienceLevel::Beginner => {
                state.questioning_style = QuestioningStyle::Supportive;
                state.framework_emphasis = FrameworkEmphasis::Light;
            }
            ExperienceLevel::Intermediate => {}
            ExperienceLevel::Expert => {
                state.questioning_style = QuestioningStyle::Challenging;
                state.framework_emphasis = FrameworkEmphasis::Heavy;
            }
        }
    }

    if let Some(session) = &context.session {
        if session.phase == Phase::Analysis {
            state.framework_emphasis = FrameworkEmphasis::Heavy;
            state.response_length = ResponseLength::Detailed;
        }
    }

    state
}
