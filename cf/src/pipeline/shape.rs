//! Declared output shapes and response validation
//!
//! Each stage declares the JSON shape it expects. The shape goes to the model
//! as a single `submit_*` tool; whatever comes back is deserialized into the
//! shape and then checked with [`OutputShape::validate`]. Anything that does
//! not conform is rejected.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::domain::{Section, SocialPost};
use crate::llm::{CompletionResponse, ToolDefinition};

/// A response shape the model is asked to produce
pub trait OutputShape: DeserializeOwned + Send + 'static {
    /// Name of the submit tool carrying this shape
    const TOOL_NAME: &'static str;

    /// Tool description shown to the model
    const DESCRIPTION: &'static str;

    /// JSON schema of the tool input
    fn schema() -> serde_json::Value;

    /// Semantic checks beyond what deserialization enforces
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    fn tool_definition() -> ToolDefinition {
        ToolDefinition::new(Self::TOOL_NAME, Self::DESCRIPTION, Self::schema())
    }
}

/// `{ ideas: string[] }`
#[derive(Debug, Clone, Deserialize)]
pub struct IdeasShape {
    pub ideas: Vec<String>,
}

impl OutputShape for IdeasShape {
    const TOOL_NAME: &'static str = "submit_ideas";
    const DESCRIPTION: &'static str = "Submit the list of content ideas.";

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "ideas": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "A list of content ideas based on the keyword or topic."
                }
            },
            "required": ["ideas"]
        })
    }
}

/// `{ outline: string }`
#[derive(Debug, Clone, Deserialize)]
pub struct OutlineShape {
    pub outline: String,
}

impl OutputShape for OutlineShape {
    const TOOL_NAME: &'static str = "submit_outline";
    const DESCRIPTION: &'static str = "Submit the content outline as a markdown list.";

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "outline": {
                    "type": "string",
                    "description": "The generated content outline."
                }
            },
            "required": ["outline"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.outline.trim().is_empty() {
            return Err("outline is empty".to_string());
        }
        Ok(())
    }
}

/// `{ sections: { title, draft }[] }`
#[derive(Debug, Clone, Deserialize)]
pub struct SectionsShape {
    pub sections: Vec<Section>,
}

impl OutputShape for SectionsShape {
    const TOOL_NAME: &'static str = "submit_sections";
    const DESCRIPTION: &'static str = "Submit one drafted section per outline item, in outline order.";

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "sections": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "description": "The title of the content section." },
                            "draft": { "type": "string", "description": "The draft for the content section." }
                        },
                        "required": ["title", "draft"]
                    }
                }
            },
            "required": ["sections"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        match self.sections.iter().position(|s| !s.is_drafted()) {
            Some(idx) => Err(format!("section {} ('{}') has an empty draft", idx + 1, self.sections[idx].title)),
            None => Ok(()),
        }
    }
}

/// `{ draft: string }` for a single regenerated section
#[derive(Debug, Clone, Deserialize)]
pub struct DraftShape {
    pub draft: String,
}

impl OutputShape for DraftShape {
    const TOOL_NAME: &'static str = "submit_draft";
    const DESCRIPTION: &'static str = "Submit the draft for this one section.";

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "draft": { "type": "string", "description": "The draft for the section." }
            },
            "required": ["draft"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        if self.draft.trim().is_empty() {
            return Err("draft is empty".to_string());
        }
        Ok(())
    }
}

/// `{ posts: { platform, post }[] }`
#[derive(Debug, Clone, Deserialize)]
pub struct PostsShape {
    pub posts: Vec<SocialPost>,
}

impl OutputShape for PostsShape {
    const TOOL_NAME: &'static str = "submit_posts";
    const DESCRIPTION: &'static str = "Submit the social media posts.";

    fn schema() -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "posts": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "platform": {
                                "type": "string",
                                "description": "The target social media platform (e.g., Twitter, LinkedIn)."
                            },
                            "post": { "type": "string", "description": "The social media post content." }
                        },
                        "required": ["platform", "post"]
                    }
                }
            },
            "required": ["posts"]
        })
    }

    fn validate(&self) -> Result<(), String> {
        for (idx, post) in self.posts.iter().enumerate() {
            if post.platform.trim().is_empty() {
                return Err(format!("post {} has no platform", idx + 1));
            }
            if post.post.trim().is_empty() {
                return Err(format!("post {} ({}) is empty", idx + 1, post.platform));
            }
        }
        Ok(())
    }
}

/// Strip a surrounding markdown code fence (```json ... ```) if present
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string (e.g. "json") on the opening line
    match body.find('\n') {
        Some(newline) => body[newline + 1..].trim(),
        None => body.trim(),
    }
}

/// Pull a validated shape out of a completion response
///
/// Prefers the matching submit tool call; falls back to parsing the text
/// content as JSON.
pub fn extract<S: OutputShape>(response: &CompletionResponse) -> Result<S, String> {
    debug!(tool = S::TOOL_NAME, tool_calls = response.tool_calls.len(), "extract: called");

    let value: S = if let Some(call) = response.tool_calls.iter().find(|c| c.name == S::TOOL_NAME) {
        debug!("extract: using tool call input");
        serde_json::from_value(call.input.clone())
            .map_err(|e| format!("{} input did not match the expected shape: {}", S::TOOL_NAME, e))?
    } else if let Some(content) = response.content.as_deref().filter(|c| !c.trim().is_empty()) {
        debug!("extract: falling back to text content");
        serde_json::from_str(strip_code_fence(content))
            .map_err(|e| format!("response did not match the expected shape: {}", e))?
    } else {
        return Err("model returned no structured output".to_string());
    };

    value.validate()?;
    Ok(value)
}
