//! Case templates: pre-written vignettes offered as one-click inputs.
//!
//! Loaded from a JSON object mapping label to case text. When the file is
//! missing or unusable the built-in set is used.

use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

use crate::ConfigError;

/// A labeled example case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseTemplate {
    pub label: String,
    pub text: String,
}

/// Ordered label → case text mapping.
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct TemplateStore {
    templates: Vec<CaseTemplate>,
}

const BUILTIN: [(&str, &str); 3] = [
    (
        "Chest Pain",
        "45yo M presents with acute substernal chest pain, radiating to left arm, associated with diaphoresis and nausea. BP 140/90, HR 95.",
    ),
    (
        "UTI",
        "28yo F with dysuria, urinary frequency, and suprapubic pain x2 days. No fever or flank pain. Urine dipstick positive for nitrites and leukocytes.",
    ),
    (
        "COPD Exacerbation",
        "68yo M with known COPD, increased dyspnea and productive cough with yellow sputum x3 days. Using rescue inhaler q2h. O2 sat 88% on RA.",
    ),
];

impl TemplateStore {
    /// The three built-in vignettes.
    pub fn builtin() -> Self {
        Self {
            templates: BUILTIN
                .iter()
                .map(|(label, text)| CaseTemplate {
                    label: (*label).into(),
                    text: (*text).into(),
                })
                .collect(),
        }
    }

    /// Load templates from `path`, falling back to the built-in set.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "No template file found, using built-in cases");
            return Self::builtin();
        }

        let parsed = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
            .and_then(|content| {
                Self::from_json(&content).map_err(|reason| ConfigError::ParseError {
                    path: path.to_path_buf(),
                    reason,
                })
            });

        match parsed {
            Ok(store) => {
                info!(path = %path.display(), count = store.len(), "Loaded case templates");
                store
            }
            Err(e) => {
                warn!(error = %e, "Template file unusable, using built-in cases");
                Self::builtin()
            }
        }
    }

    /// Parse a JSON object of label → text, preserving file order.
    pub fn from_json(content: &str) -> Result<Self, String> {
        let map: serde_json::Map<String, serde_json::Value> =
            serde_json::from_str(content).map_err(|e| e.to_string())?;

        let templates = map
            .into_iter()
            .map(|(label, value)| match value {
                serde_json::Value::String(text) => Ok(CaseTemplate { label, text }),
                other => Err(format!("template '{label}' must be a string, got {other}")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { templates })
    }

    pub fn get(&self, label: &str) -> Option<&CaseTemplate> {
        self.templates
            .iter()
            .find(|t| t.label.eq_ignore_ascii_case(label.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &CaseTemplate> {
        self.templates.iter()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_three_cases() {
        let store = TemplateStore::builtin();
        let labels: Vec<&str> = store.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Chest Pain", "UTI", "COPD Exacerbation"]);
    }

    #[test]
    fn missing_file_falls_back() {
        let store = TemplateStore::load(Path::new("/nonexistent/common_cases.json"));
        assert_eq!(store.len(), 3);
        assert!(store.get("uti").is_some());
    }

    #[test]
    fn loads_file_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common_cases.json");
        std::fs::write(&path, r#"{"Sepsis": "72yo F febrile", "Asthma": "19yo M wheeze"}"#).unwrap();

        let store = TemplateStore::load(&path);
        let labels: Vec<&str> = store.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(labels, vec!["Sepsis", "Asthma"]);
        assert_eq!(store.get("Asthma").unwrap().text, "19yo M wheeze");
    }

    #[test]
    fn malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("common_cases.json");
        std::fs::write(&path, "[1, 2, 3]").unwrap();
        let store = TemplateStore::load(&path);
        assert!(store.get("Chest Pain").is_some());
    }

    #[test]
    fn non_string_value_is_rejected() {
        let err = TemplateStore::from_json(r#"{"Bad": 42}"#).unwrap_err();
        assert!(err.contains("Bad"));
    }
}
