//! System-prompt section builders.
//!
//! Each builder is a pure function over the shared [`SectionInputs`] value;
//! the engine concatenates them in the fixed order of [`SECTION_BUILDERS`].

use crate::engine::PersonaConfig;
use sensei_core::{
    CoachingContext, FrameworkEmphasis, Pathway, QuestioningStyle, ResponseLength, SubPersonaState,
};

/// Resolved inputs shared by every section builder.
pub(crate) struct SectionInputs<'a> {
    pub config: &'a PersonaConfig,
    pub style: SubPersonaState,
    pub context: Option<&'a CoachingContext>,
}

pub(crate) type SectionBuilder = fn(&SectionInputs) -> String;

/// Ordered list of named section builders. The order is part of the prompt
/// contract and must not change between releases.
pub(crate) const SECTION_BUILDERS: [(&str, SectionBuilder); 6] = [
    ("personality", personality),
    ("expertise", expertise),
    ("conversation_style", conversation_style),
    ("context_summary", context_summary),
    ("formatting_guidelines", formatting_guidelines),
    ("method_integration", method_integration),
];

fn personality(inputs: &SectionInputs) -> String {
    let style_line = match inputs.style.questioning_style {
        QuestioningStyle::Supportive => {
            "Lead with encouragement: acknowledge effort before probing, and frame questions so the user feels safe exploring uncertainty."
        }
        QuestioningStyle::Curious => {
            "Stay genuinely curious: ask open questions that surface assumptions without steering toward a conclusion."
        }
        QuestioningStyle::Challenging => {
            "Challenge the user directly: press on weak assumptions and ask for the evidence behind every claim."
        }
    };

    format!(
        "## Personality\nYou are {}, {}. You coach through questions rather than lectures, and you never pretend certainty you do not have.\n{}",
        inputs.config.coach_name, inputs.config.coach_role, style_line
    )
}

fn expertise(inputs: &SectionInputs) -> String {
    let domain = match inputs.context.and_then(|c| c.session.as_ref()) {
        Some(session) => match session.pathway {
            Pathway::Entrepreneurship => {
                "venture building, product-market fit, pricing, and early-stage fundraising"
            }
            Pathway::CareerGrowth => {
                "career transitions, skill positioning, and compensation negotiation"
            }
            Pathway::Leadership => {
                "team leadership, delegation, and organizational communication"
            }
            Pathway::ProductStrategy => {
                "product strategy, roadmap trade-offs, and market analysis"
            }
        },
        None => "business strategy and professional development",
    };

    format!("## Expertise\nYour coaching expertise covers {domain}.")
}

fn conversation_style(inputs: &SectionInputs) -> String {
    let length_line = match inputs.style.response_length {
        ResponseLength::Concise => "Keep responses short: a few sentences or one tight list.",
        ResponseLength::Moderate => "Keep responses to a focused handful of paragraphs.",
        ResponseLength::Detailed => {
            "Give thorough, structured responses that walk through your reasoning step by step."
        }
    };

    format!(
        "## Conversation Style\n{length_line}\nAsk at most one question per reply, and always end on something the user can act on."
    )
}

fn context_summary(inputs: &SectionInputs) -> String {
    let mut lines = vec!["## Current Context".to_string()];

    match inputs.context {
        None => {
            lines.push(
                "No active session context. Treat this as an open coaching conversation."
                    .to_string(),
            );
        }
        Some(context) => {
            match &context.session {
                Some(session) => lines.push(format!(
                    "Active session: the {} pathway, {} phase, {}% complete.",
                    session.pathway, session.phase, session.progress
                )),
                None => lines.push(
                    "No active session context. Treat this as an open coaching conversation."
                        .to_string(),
                ),
            }

            if let Some(profile) = &context.profile {
                let mut described = Vec::new();
                if let Some(level) = profile.experience_level {
                    described.push(format!("a {level}"));
                }
                if let Some(role) = &profile.role {
                    described.push(format!("working as {role}"));
                }
                if let Some(industry) = &profile.industry {
                    described.push(format!("in {industry}"));
                }
                if !described.is_empty() {
                    lines.push(format!("The user is {}.", described.join(" ")));
                }
            }

            if !context.goals.is_empty() {
                lines.push("Session goals:".to_string());
                for goal in &context.goals {
                    lines.push(format!("- {goal}"));
                }
            }

            if !context.insights.is_empty() {
                lines.push("Earlier insights worth building on:".to_string());
                for insight in &context.insights {
                    lines.push(format!("- {insight}"));
                }
            }
        }
    }

    lines.join("\n")
}

fn formatting_guidelines(inputs: &SectionInputs) -> String {
    let length_hint = match inputs.style.response_length {
        ResponseLength::Concise => "Prefer a single short paragraph or a list of at most three items.",
        ResponseLength::Moderate => "Prefer short paragraphs; use a list only when comparing options.",
        ResponseLength::Detailed => {
            "Use headed subsections when a response covers more than one thread."
        }
    };

    format!(
        "## Formatting Guidelines\nWrite plain markdown without tables. Never fabricate numbers or sources.\n{length_hint}"
    )
}

fn method_integration(inputs: &SectionInputs) -> String {
    let emphasis_line = match inputs.style.framework_emphasis {
        FrameworkEmphasis::Light => {
            "Bring in a named framework only when the user explicitly asks for structure."
        }
        FrameworkEmphasis::Moderate => {
            "Introduce a relevant framework when it clarifies the problem, naming it briefly."
        }
        FrameworkEmphasis::Heavy => {
            "Anchor each response in an explicit framework: name it, lay out its steps, and map the user's situation onto them."
        }
    };

    format!(
        "## Method Integration\n{emphasis_line}\nDraw from: {}.",
        inputs.config.methods.join(", ")
    )
}
