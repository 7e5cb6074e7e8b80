//! Prompt builder: composes the fixed system instruction for a task.

use crate::task::Task;

/// Closing sentence every answer must end with.
pub const DISCLAIMER: &str =
    "Clinical judgment required – not a substitute for professional assessment.";

/// Prefix the model must use when evidence is weak or no guideline applies.
pub const NO_GUIDELINE_PREFIX: &str = "Guideline match: NONE";

const ROLE: &str = "ROLE: Clinical decision-support assistant for licensed clinicians.";

/// Output-style rules, rendered one bullet per line.
pub const STYLE_RULES: [&str; 6] = [
    "≤5 bullet points, each ≤25 words.",
    "Use standard medical abbreviations.",
    "For meds: dose / route / frequency / duration.",
    "Cite ≥2022 guideline source (e.g., \"IDSA 2024\").",
    "Include 1 red-flag / contraindication bullet.",
    "End with: \"Clinical judgment required – not a substitute for professional assessment.\"",
];

/// Build the system instruction for `task`.
pub fn build_prompt(task: &Task) -> String {
    let rules: String = STYLE_RULES
        .iter()
        .map(|rule| format!("• {rule}\n"))
        .collect();

    format!(
        "{ROLE}\n\nOUTPUT STYLE\n{rules}\nACCURACY RULE\n\
         If evidence weak or guideline absent, begin with \"{NO_GUIDELINE_PREFIX}\".\n\n\
         TASK: {}",
        task.instruction
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskId;

    #[test]
    fn contains_task_fragment() {
        for task in Task::all() {
            let prompt = build_prompt(task);
            assert!(prompt.contains(task.instruction));
            assert!(prompt.ends_with(task.instruction));
        }
    }

    #[test]
    fn every_style_rule_appears_exactly_once() {
        for task in Task::all() {
            let prompt = build_prompt(task);
            for rule in STYLE_RULES {
                assert_eq!(prompt.matches(rule).count(), 1, "rule {rule:?} in {:?}", task.id);
            }
        }
    }

    #[test]
    fn includes_role_and_accuracy_rule() {
        let prompt = build_prompt(TaskId::Treatment.task());
        assert!(prompt.starts_with(ROLE));
        assert_eq!(prompt.matches(NO_GUIDELINE_PREFIX).count(), 1);
        assert_eq!(prompt.matches(DISCLAIMER).count(), 1);
    }

    #[test]
    fn prompts_differ_only_by_fragment() {
        let a = build_prompt(TaskId::Treatment.task());
        let b = build_prompt(TaskId::Differential.task());
        assert_ne!(a, b);
        assert_eq!(
            a.replace(TaskId::Treatment.task().instruction, ""),
            b.replace(TaskId::Differential.task().instruction, "")
        );
    }
}
