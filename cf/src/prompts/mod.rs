//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for each pipeline stage.
//!
//! Template loading chain:
//! 1. `.contentforge/prompts/{name}.pmt` (user override, configurable)
//! 2. `prompts/{name}.pmt` (repo default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::{DraftPrompt, IdeasPrompt, OutlinePrompt, PromptLoader, RefinePrompt, SocialPrompt};
