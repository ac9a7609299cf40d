//! Input validation for each stage
//!
//! Pure checks with no model or config involved, so callers can reject bad
//! input before a client is even built.

use crate::domain::parse_outline;
use crate::error::PipelineError;

pub const EMPTY_TOPIC: &str = "Topic cannot be empty.";
pub const EMPTY_IDEA: &str = "Content idea cannot be empty.";
pub const EMPTY_OUTLINE: &str = "Outline and topic cannot be empty.";
pub const UNPARSEABLE_OUTLINE: &str = "Could not parse the outline. Please ensure it is a valid list format.";
pub const EMPTY_CONTENT: &str = "Content cannot be empty.";

/// Reject blank input with a validation error
fn require(value: &str, message: &str) -> Result<(), PipelineError> {
    if value.trim().is_empty() {
        return Err(PipelineError::validation(message));
    }
    Ok(())
}

pub fn check_topic(topic: &str) -> Result<(), PipelineError> {
    require(topic, EMPTY_TOPIC)
}

pub fn check_idea(idea: &str) -> Result<(), PipelineError> {
    require(idea, EMPTY_IDEA)
}

pub fn check_content(content: &str) -> Result<(), PipelineError> {
    require(content, EMPTY_CONTENT)
}

/// Titles must be non-empty and the topic non-blank
pub fn check_titles(titles: &[String], topic: &str) -> Result<(), PipelineError> {
    if titles.is_empty() {
        return Err(PipelineError::validation(UNPARSEABLE_OUTLINE));
    }
    require(topic, EMPTY_OUTLINE)
}

/// Parse an outline block into titles, rejecting blank or list-free input
pub fn outline_titles(outline: &str, topic: &str) -> Result<Vec<String>, PipelineError> {
    if outline.trim().is_empty() || topic.trim().is_empty() {
        return Err(PipelineError::validation(EMPTY_OUTLINE));
    }
    let titles = parse_outline(outline);
    check_titles(&titles, topic)?;
    Ok(titles)
}
