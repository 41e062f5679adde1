//! Phase-keyed quick-action suggestions.

use sensei_core::Phase;

/// Returns the fixed quick-action labels for a session phase, or the
/// generic list when no phase is active.
pub fn quick_actions_for_phase(phase: Option<Phase>) -> Vec<String> {
    let labels: &[&str] = match phase {
        Some(Phase::Discovery) => &[
            "Clarify my main goal",
            "Explore what's blocking me",
            "Map the current situation",
            "Pick a focus area",
        ],
        Some(Phase::Analysis) => &[
            "Break down the problem",
            "Compare my options",
            "Run a SWOT on this",
            "Find the riskiest assumption",
        ],
        Some(Phase::Planning) => &[
            "Draft an action plan",
            "Set milestones",
            "Define success metrics",
            "Stress-test the plan",
        ],
        Some(Phase::Execution) => &[
            "Review this week's progress",
            "Unblock a stalled task",
            "Prioritize next steps",
            "Hold me accountable",
        ],
        Some(Phase::Review) => &[
            "Summarize what we learned",
            "Extract the key lessons",
            "Celebrate the wins",
            "Plan the next session",
        ],
        None => &[
            "Help me get started",
            "Explore a challenge",
            "Review my goals",
            "Give me a different perspective",
        ],
    };

    labels.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_phase_yields_three_to_five_actions() {
        let phases = [
            Some(Phase::Discovery),
            Some(Phase::Analysis),
            Some(Phase::Planning),
            Some(Phase::Execution),
            Some(Phase::Review),
            None,
        ];
        for phase in phases {
            let actions = quick_actions_for_phase(phase);
            assert!(
                (3..=5).contains(&actions.len()),
                "phase {phase:?} yielded {} actions",
                actions.len()
            );
        }
    }

    #[test]
    fn test_phases_have_distinct_lists() {
        assert_ne!(
            quick_actions_for_phase(Some(Phase::Discovery)),
            quick_actions_for_phase(Some(Phase::Review))
        );
        assert_ne!(quick_actions_for_phase(None), quick_actions_for_phase(Some(Phase::Planning)));
    }
}
