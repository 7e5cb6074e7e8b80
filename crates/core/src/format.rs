//! Response formatter: bullet normalization and guideline-year tagging.
//!
//! The formatter is stateless; results are recomputed on every render.

use serde::{Deserialize, Serialize};

/// The bullet marker prefixed to every rendered line.
pub const BULLET: &str = "•";

/// Markers treated as an existing bullet and normalized to [`BULLET`].
const EXISTING_MARKERS: [&str; 3] = ["•", "- ", "* "];

/// Outcome of the retry policy: real text, or the explicit no-content
/// sentinel after both attempts came back empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Completion {
    Content(String),
    NoContent,
}

/// Guideline year detected in a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GuidelineTag {
    #[serde(rename = "NONE")]
    None,
    #[serde(rename = "2022")]
    Y2022,
    #[serde(rename = "2023")]
    Y2023,
    #[serde(rename = "2024")]
    Y2024,
    #[serde(rename = "2025")]
    Y2025,
}

/// Search order: most recent year first, first hit wins.
const YEAR_PRIORITY: [(GuidelineTag, &str); 4] = [
    (GuidelineTag::Y2025, "2025"),
    (GuidelineTag::Y2024, "2024"),
    (GuidelineTag::Y2023, "2023"),
    (GuidelineTag::Y2022, "2022"),
];

impl GuidelineTag {
    /// Detect the tag by plain substring search.
    ///
    /// This is a heuristic: a year inside an unrelated token (e.g. "2024 mg")
    /// still matches.
    pub fn detect(raw: &str) -> Self {
        YEAR_PRIORITY
            .iter()
            .find(|(_, year)| raw.contains(year))
            .map(|(tag, _)| *tag)
            .unwrap_or(GuidelineTag::None)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GuidelineTag::None => "NONE",
            GuidelineTag::Y2022 => "2022",
            GuidelineTag::Y2023 => "2023",
            GuidelineTag::Y2024 => "2024",
            GuidelineTag::Y2025 => "2025",
        }
    }
}

impl std::fmt::Display for GuidelineTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the UI should show for an answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum FormattedBody {
    /// Bullet-normalized text, one bullet per line.
    Bullets(String),
    /// Provider returned nothing after the retry.
    NoResponse,
}

/// A formatted answer plus its guideline tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedResult {
    pub body: FormattedBody,
    pub guideline_tag: GuidelineTag,
}

impl FormattedResult {
    /// Text suitable for a plain-text surface.
    pub fn display_text(&self) -> &str {
        match &self.body {
            FormattedBody::Bullets(text) => text,
            FormattedBody::NoResponse => "No response from model.",
        }
    }
}

/// Format a completion for display.
pub fn format(completion: &Completion) -> FormattedResult {
    match completion {
        Completion::Content(raw) => FormattedResult {
            body: FormattedBody::Bullets(bulletize(raw)),
            guideline_tag: GuidelineTag::detect(raw),
        },
        Completion::NoContent => FormattedResult {
            body: FormattedBody::NoResponse,
            guideline_tag: GuidelineTag::None,
        },
    }
}

/// Prefix every non-blank line with a bullet, dropping blank lines.
pub fn bulletize(raw: &str) -> String {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("{BULLET} {}", strip_marker(line)))
        .collect::<Vec<_>>()
        .join("\n")
}

fn strip_marker(line: &str) -> &str {
    EXISTING_MARKERS
        .iter()
        .find_map(|marker| line.strip_prefix(marker))
        .map(str::trim_start)
        .unwrap_or(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bullets_plain_lines_without_double_prefix() {
        let out = bulletize("Line A\nLine B\n\n• Line C");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines, vec!["• Line A", "• Line B", "• Line C"]);
        assert!(!out.contains("• •"));
    }

    #[test]
    fn normalizes_markdown_bullets() {
        let out = bulletize("- first\n*   second\n•third\n  ");
        assert_eq!(out, "• first\n• second\n• third");
    }

    #[test]
    fn keeps_hyphenated_text() {
        assert_eq!(bulletize("-10 mg"), "• -10 mg");
    }

    #[test]
    fn tag_single_year() {
        let tag = GuidelineTag::detect("Start ceftriaxone per ACOG 2023 guidance.");
        assert_eq!(tag, GuidelineTag::Y2023);
        assert_eq!(tag.as_str(), "2023");
    }

    #[test]
    fn tag_prefers_most_recent_year() {
        let tag = GuidelineTag::detect("ESC 2022 chest pain, AHA 2024 update");
        assert_eq!(tag, GuidelineTag::Y2024);
    }

    #[test]
    fn tag_none_without_known_year() {
        assert_eq!(GuidelineTag::detect("Per NICE 2019"), GuidelineTag::None);
        assert_eq!(GuidelineTag::detect(""), GuidelineTag::None);
    }

    #[test]
    fn tag_matches_inside_unrelated_numbers() {
        assert_eq!(GuidelineTag::detect("give 2024 mg"), GuidelineTag::Y2024);
    }

    #[test]
    fn no_content_renders_as_absence() {
        let result = format(&Completion::NoContent);
        assert_eq!(result.body, FormattedBody::NoResponse);
        assert_eq!(result.guideline_tag, GuidelineTag::None);
        assert_ne!(result.display_text(), "");
    }

    #[test]
    fn content_is_bulleted_and_tagged() {
        let result = format(&Completion::Content("Amoxicillin 500 mg\nIDSA 2025".into()));
        assert_eq!(
            result.body,
            FormattedBody::Bullets("• Amoxicillin 500 mg\n• IDSA 2025".into())
        );
        assert_eq!(result.guideline_tag, GuidelineTag::Y2025);
    }

    #[test]
    fn tag_serializes_as_year_string() {
        assert_eq!(serde_json::to_string(&GuidelineTag::None).unwrap(), r#""NONE""#);
        assert_eq!(serde_json::to_string(&GuidelineTag::Y2022).unwrap(), r#""2022""#);
    }
}
