//! Content records produced by the pipeline

use serde::{Deserialize, Serialize};

/// One titled unit of drafted content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    /// Empty until the drafting stage fills it in
    #[serde(default)]
    pub draft: String,
}

impl Section {
    /// A section with no draft yet
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            draft: String::new(),
        }
    }

    pub fn drafted(title: impl Into<String>, draft: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            draft: draft.into(),
        }
    }

    pub fn is_drafted(&self) -> bool {
        !self.draft.trim().is_empty()
    }
}

/// A post tagged with the platform it targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialPost {
    pub platform: String,
    pub post: String,
}

/// Concatenate section drafts into the full content, separated by blank lines
pub fn join_drafts(sections: &[Section]) -> String {
    sections
        .iter()
        .map(|s| s.draft.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
