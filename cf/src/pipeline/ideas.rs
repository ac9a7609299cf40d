//! Idea generator

use tracing::{debug, info};

use super::shape::IdeasShape;
use super::input::check_topic;
use super::{ContentPipeline, Stage};
use crate::error::PipelineError;
use crate::prompts::IdeasPrompt;

impl ContentPipeline {
    /// Generate content ideas for a topic
    ///
    /// The prompt asks for a fixed number of ideas but any count is accepted.
    /// Ideas are trimmed; blank entries are dropped.
    pub async fn generate_ideas(&self, topic: &str) -> Result<Vec<String>, PipelineError> {
        debug!(%topic, "generate_ideas: called");
        check_topic(topic)?;

        let context = IdeasPrompt {
            keyword: topic.trim().to_string(),
            count: self.idea_count,
        };
        let shape: IdeasShape = self.generate(Stage::Ideas, "ideas", &context).await?;

        let ideas: Vec<String> = shape
            .ideas
            .into_iter()
            .map(|idea| idea.trim().to_string())
            .filter(|idea| !idea.is_empty())
            .collect();
        info!(count = ideas.len(), "generate_ideas: ideas ready");
        Ok(ideas)
    }
}
