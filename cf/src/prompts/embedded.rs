//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Idea generator prompt
pub const IDEAS: &str = include_str!("../../prompts/ideas.pmt");

/// Outline builder prompt
pub const OUTLINE: &str = include_str!("../../prompts/outline.pmt");

/// Section drafter prompt
pub const DRAFT: &str = include_str!("../../prompts/draft.pmt");

/// Single-section refinement prompt
pub const REFINE: &str = include_str!("../../prompts/refine.pmt");

/// Social post generator prompt
pub const SOCIAL: &str = include_str!("../../prompts/social.pmt");

/// Names of every embedded template
pub const NAMES: &[&str] = &["ideas", "outline", "draft", "refine", "social"];

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "ideas" => Some(IDEAS),
        "outline" => Some(OUTLINE),
        "draft" => Some(DRAFT),
        "refine" => Some(REFINE),
        "social" => Some(SOCIAL),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
