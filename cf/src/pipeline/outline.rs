//! Outline builder

use tracing::debug;

use super::shape::OutlineShape;
use super::input::check_idea;
use super::{ContentPipeline, Stage};
use crate::error::PipelineError;
use crate::prompts::OutlinePrompt;

impl ContentPipeline {
    /// Expand one idea into a markdown outline
    pub async fn create_outline(&self, idea: &str) -> Result<String, PipelineError> {
        debug!(%idea, "create_outline: called");
        check_idea(idea)?;

        let context = OutlinePrompt {
            content_idea: idea.trim().to_string(),
        };
        let shape: OutlineShape = self.generate(Stage::Outline, "outline", &context).await?;
        Ok(shape.outline)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::error::PipelineError;
    use crate::llm::CompletionResponse;
    use crate::llm::client::mock::MockLlmClient;
    use crate::pipeline::ContentPipeline;
    use crate::prompts::PromptLoader;

    #[tokio::test]
    async fn test_create_outline() {
        let mock = Arc::new(MockLlmClient::new(vec![CompletionResponse::tool_call(
            "submit_outline",
            serde_json::json!({ "outline": "- Intro\n- Body\n- Conclusion" }),
        )]));
        let pipeline = ContentPipeline::new(mock.clone(), PromptLoader::embedded_only());

        let outline = pipeline.create_outline("AI in healthcare").await.unwrap();

        assert_eq!(outline, "- Intro\n- Body\n- Conclusion");
        assert!(mock.requests()[0].messages[0].content.contains("AI in healthcare"));
    }

    #[tokio::test]
    async fn test_empty_idea() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let pipeline = ContentPipeline::new(mock.clone(), PromptLoader::embedded_only());

        let err = pipeline.create_outline("").await.unwrap_err();

        assert_eq!(err, PipelineError::validation("Content idea cannot be empty."));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_exhausted_model_uses_underlying_message() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let pipeline = ContentPipeline::new(mock, PromptLoader::embedded_only());

        let err = pipeline.create_outline("idea").await.unwrap_err();
        assert_eq!(err.message(), "Invalid response: No more mock responses");
    }
}
