//! ContentForge - topic to ideas, outline, drafts and social posts
//!
//! A four-stage content pipeline backed by an LLM:
//! - Ideas: a topic becomes a list of content ideas
//! - Outline: one idea becomes a markdown outline
//! - Drafts: each outline item becomes a drafted section
//! - Social: the drafted content becomes platform-tagged posts
//!
//! Each stage renders a Handlebars prompt template and asks the model for a
//! declared output shape, which is validated before it is accepted.

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod repl;
pub mod session;

pub use config::Config;
pub use domain::{Section, SocialPost, join_drafts, parse_outline};
pub use error::PipelineError;
pub use llm::{LlmClient, LlmError, create_client};
pub use pipeline::{ContentPipeline, Stage};
pub use prompts::PromptLoader;
pub use session::{Notification, Orchestrator, Outcome, Phase, Session};
