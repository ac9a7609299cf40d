//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Template context for the idea generator
#[derive(Debug, Clone, Serialize)]
pub struct IdeasPrompt {
    pub keyword: String,
    pub count: usize,
}

/// Template context for the outline builder
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutlinePrompt {
    pub content_idea: String,
}

/// Template context for the section drafter
#[derive(Debug, Clone, Serialize)]
pub struct DraftPrompt {
    pub outline: Vec<String>,
    pub topic: String,
}

/// Template context for a single-section refinement
#[derive(Debug, Clone, Serialize)]
pub struct RefinePrompt {
    pub title: String,
    pub topic: String,
}

/// Template context for the social post generator
#[derive(Debug, Clone, Serialize)]
pub struct SocialPrompt {
    pub content: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory (e.g., `.contentforge/prompts/`)
    user_dir: Option<PathBuf>,
    /// Repo default directory (e.g., `prompts/`)
    repo_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a new prompt loader
    ///
    /// # Arguments
    /// * `root` - Project root, used to find `prompts/`
    /// * `user_dir` - Override directory; relative paths resolve against `root`
    pub fn new(root: impl AsRef<Path>, user_dir: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        let user_dir = root.join(user_dir.as_ref());
        let repo_dir = root.join("prompts");
        debug!(?user_dir, ?repo_dir, "PromptLoader::new: called");

        Self {
            hbs: Self::engine(),
            user_dir: user_dir.is_dir().then_some(user_dir),
            repo_dir: repo_dir.is_dir().then_some(repo_dir),
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            user_dir: None,
            repo_dir: None,
        }
    }

    /// Prompts are plain text, so HTML escaping is off
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `<user_dir>/{name}.pmt`
    /// 2. Repo default: `prompts/{name}.pmt`
    /// 3. Embedded fallback
    pub fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        for (label, dir) in [("user", &self.user_dir), ("repo", &self.repo_dir)] {
            let Some(dir) = dir else {
                continue;
            };
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, %label, "PromptLoader::load_template: found on disk");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read {} prompt {}: {}", label, path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: using embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }
}
