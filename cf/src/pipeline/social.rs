//! Social post generator

use tracing::{debug, info};

use super::shape::PostsShape;
use super::input::check_content;
use super::{ContentPipeline, Stage};
use crate::domain::SocialPost;
use crate::error::PipelineError;
use crate::prompts::SocialPrompt;

impl ContentPipeline {
    /// Derive platform-tagged posts from the full drafted content
    pub async fn generate_social_posts(&self, content: &str) -> Result<Vec<SocialPost>, PipelineError> {
        debug!(content_len = content.len(), "generate_social_posts: called");
        check_content(content)?;

        let context = SocialPrompt {
            content: content.to_string(),
        };
        let shape: PostsShape = self.generate(Stage::Social, "social", &context).await?;

        info!(count = shape.posts.len(), "generate_social_posts: posts ready");
        Ok(shape.posts)
    }
}
