//! Sub-persona adaptation: seed state per pathway, nudge state per message.
//!
//! Both functions are pure. The update heuristic is a replaceable policy:
//! callers depend only on the contract that identical inputs produce
//! identical output and that no hidden state survives between calls.

use sensei_core::{
    ChatMessage, ChatRole, FrameworkEmphasis, Pathway, QuestioningStyle, ResponseLength,
    SubPersonaState,
};

/// Markers that suggest the user is struggling and needs a softer touch.
const CONFUSION_MARKERS: [&str; 5] = ["confused", "not sure", "unsure", "lost", "overwhelmed"];

/// Markers that invite harder pushback.
const CHALLENGE_MARKERS: [&str; 4] = ["challenge me", "push back", "devil's advocate", "be blunt"];

/// Markers that ask for more structure or depth.
const DEPTH_MARKERS: [&str; 5] = ["framework", "structure", "in detail", "step by step", "deeper"];

/// Message-length thresholds steering the response-length preference.
const SHORT_MESSAGE_CHARS: usize = 40;
const LONG_MESSAGE_CHARS: usize = 240;

/// Seeds adaptation state from the session's pathway.
pub fn initialize_sub_persona_state(pathway: Pathway) -> SubPersonaState {
    match pathway {
        Pathway::Entrepreneurship => SubPersonaState {
            questioning_style: QuestioningStyle::Curious,
            response_length: ResponseLength::Moderate,
            framework_emphasis: FrameworkEmphasis::Moderate,
        },
        Pathway::CareerGrowth => SubPersonaState {
            questioning_style: QuestioningStyle::Supportive,
            response_length: ResponseLength::Moderate,
            framework_emphasis: FrameworkEmphasis::Light,
        },
        Pathway::Leadership => SubPersonaState {
            questioning_style: QuestioningStyle::Supportive,
            response_length: ResponseLength::Detailed,
            framework_emphasis: FrameworkEmphasis::Moderate,
        },
        Pathway::ProductStrategy => SubPersonaState {
            questioning_style: QuestioningStyle::Challenging,
            response_length: ResponseLength::Detailed,
            framework_emphasis: FrameworkEmphasis::Heavy,
        },
    }
}

/// Pure per-message transition over the adaptation state.
///
/// Nudges applied, in order:
/// 1. confusion markers → supportive questioning, one step lighter emphasis;
/// 2. challenge markers → challenging questioning;
/// 3. depth markers → one step heavier emphasis;
/// 4. the average length of the user's recent messages (including the
///    current one) steers the response-length preference.
pub fn update_session_state(
    state: &SubPersonaState,
    user_message: &str,
    recent_messages: &[ChatMessage],
) -> SubPersonaState {
    let mut next = *state;
    let message = user_message.to_lowercase();

    if CONFUSION_MARKERS.iter().any(|m| message.contains(m)) {
        next.questioning_style = QuestioningStyle::Supportive;
        next.framework_emphasis = next.framework_emphasis.lighter();
    } else if CHALLENGE_MARKERS.iter().any(|m| message.contains(m)) {
        next.questioning_style = QuestioningStyle::Challenging;
    }

    if DEPTH_MARKERS.iter().any(|m| message.contains(m)) {
        next.framework_emphasis = next.framework_emphasis.heavier();
    }

    let user_lengths: Vec<usize> = recent_messages
        .iter()
        .filter(|m| m.role == ChatRole::User)
        .map(|m| m.content.chars().count())
        .chain(std::iter::once(user_message.chars().count()))
        .collect();
    let average = user_lengths.iter().sum::<usize>() / user_lengths.len();

    if average < SHORT_MESSAGE_CHARS {
        next.response_length = ResponseLength::Concise;
    } else if average > LONG_MESSAGE_CHARS {
        next.response_length = ResponseLength::Detailed;
    }

    next
}
