//! Content pipeline
//!
//! The four model-backed stages. Each one follows the same shape: render a
//! prompt template, call the model with a declared output shape, validate
//! what comes back.
//!
//! - [`ContentPipeline::generate_ideas`] - topic to ideas
//! - [`ContentPipeline::create_outline`] - idea to outline text
//! - [`ContentPipeline::draft_sections`] - titles to drafted sections
//! - [`ContentPipeline::generate_social_posts`] - content to posts

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

mod drafts;
mod ideas;
pub mod input;
mod outline;
pub mod shape;
mod social;

pub use shape::OutputShape;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::llm::{CompletionRequest, LlmClient, Message};
use crate::prompts::PromptLoader;

/// A pipeline stage, in hand-off order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Stage {
    Ideas,
    Outline,
    Drafts,
    Social,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Ideas, Stage::Outline, Stage::Drafts, Stage::Social];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Ideas => "ideas",
            Self::Outline => "outline",
            Self::Drafts => "drafts",
            Self::Social => "social posts",
        }
    }

    /// Message used when a generation error carries no detail
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::Ideas => "Failed to generate ideas.",
            Self::Outline => "Failed to create outline.",
            Self::Drafts => "Failed to draft sections.",
            Self::Social => "Failed to generate social posts.",
        }
    }

    /// Stages after this one
    pub fn downstream(self) -> impl Iterator<Item = Stage> {
        Self::ALL.into_iter().filter(move |s| *s > self)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// System prompt shared by every stage
const SYSTEM_PROMPT: &str = "You are the writing engine of a content-creation assistant. \
                             Always answer by calling the provided submit tool exactly once; \
                             do not reply with prose.";

/// Runs the model-backed stages
///
/// Stateless apart from configuration: every call is an independent
/// request/response exchange, so one pipeline can serve many sessions.
pub struct ContentPipeline {
    llm: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    max_tokens: u32,
    refine_sections: bool,
    refine_concurrency: usize,
    idea_count: usize,
}

impl ContentPipeline {
    pub fn new(llm: Arc<dyn LlmClient>, prompts: PromptLoader) -> Self {
        let defaults = PipelineConfig::default();
        Self {
            llm,
            prompts,
            max_tokens: 4096,
            refine_sections: defaults.refine_sections,
            refine_concurrency: defaults.refine_concurrency,
            idea_count: defaults.idea_count,
        }
    }

    /// Apply pipeline settings from config
    pub fn with_config(mut self, config: &PipelineConfig, max_tokens: u32) -> Self {
        self.refine_sections = config.refine_sections;
        self.refine_concurrency = config.refine_concurrency.max(1);
        self.idea_count = config.idea_count.max(1);
        self.max_tokens = max_tokens;
        self
    }

    /// Enable or disable the per-section refinement pass
    pub fn with_refinement(mut self, enabled: bool) -> Self {
        self.refine_sections = enabled;
        self
    }

    /// Cap on refinement calls in flight at once
    pub fn with_refine_concurrency(mut self, limit: usize) -> Self {
        self.refine_concurrency = limit.max(1);
        self
    }

    pub fn refines_sections(&self) -> bool {
        self.refine_sections
    }

    /// Render `template`, call the model, and extract a validated `S`
    async fn generate<S, C>(&self, stage: Stage, template: &str, context: &C) -> Result<S, PipelineError>
    where
        S: OutputShape,
        C: Serialize,
    {
        debug!(%stage, %template, tool = S::TOOL_NAME, "generate: called");
        let fallback = stage.fallback_message();

        let prompt = self
            .prompts
            .render(template, context)
            .map_err(|e| PipelineError::generation(e.to_string(), fallback))?;

        let request = CompletionRequest {
            system_prompt: SYSTEM_PROMPT.to_string(),
            messages: vec![Message::user(prompt)],
            tools: vec![S::tool_definition()],
            max_tokens: self.max_tokens,
        };

        let response = self.llm.complete(request).await.map_err(|e| {
            debug!(%stage, error = %e, "generate: model call failed");
            PipelineError::generation(e.user_message(), fallback)
        })?;

        info!(
            %stage,
            input_tokens = response.usage.input_tokens,
            output_tokens = response.usage.output_tokens,
            "model call complete"
        );

        shape::extract::<S>(&response).map_err(|detail| {
            debug!(%stage, %detail, "generate: response failed validation");
            PipelineError::generation(format!("Invalid response from model: {}", detail), fallback)
        })
    }
}
