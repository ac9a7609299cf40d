//! Section drafter
//!
//! One structured call drafts every section. An optional refinement pass then
//! regenerates each section independently; those calls run concurrently, at
//! most `refine_concurrency` at a time, and their results are written back by
//! position.

use futures::{StreamExt, TryStreamExt};
use tracing::{debug, info};

use super::input::{check_titles, outline_titles};
use super::shape::{DraftShape, SectionsShape};
use super::{ContentPipeline, Stage};
use crate::domain::Section;
use crate::error::PipelineError;
use crate::prompts::{DraftPrompt, RefinePrompt};

impl ContentPipeline {
    /// Parse an outline block and draft every section
    ///
    /// Fails before any model call if the outline yields no titles.
    pub async fn draft_outline(&self, outline: &str, topic: &str) -> Result<Vec<Section>, PipelineError> {
        debug!(outline_len = outline.len(), %topic, "draft_outline: called");
        let titles = outline_titles(outline, topic)?;
        self.draft_sections(&titles, topic).await
    }

    /// Draft one section per title, in title order
    ///
    /// All-or-nothing: a count mismatch, a blank draft, or any failed call
    /// fails the whole operation. Refinement follows the pipeline setting.
    pub async fn draft_sections(&self, titles: &[String], topic: &str) -> Result<Vec<Section>, PipelineError> {
        self.draft_sections_with(titles, topic, self.refine_sections).await
    }

    /// Like [`draft_sections`](Self::draft_sections) with an explicit refinement choice
    pub async fn draft_sections_with(
        &self,
        titles: &[String],
        topic: &str,
        refine: bool,
    ) -> Result<Vec<Section>, PipelineError> {
        debug!(title_count = titles.len(), %topic, refine, "draft_sections_with: called");
        check_titles(titles, topic)?;

        let context = DraftPrompt {
            outline: titles.to_vec(),
            topic: topic.trim().to_string(),
        };
        let shape: SectionsShape = self.generate(Stage::Drafts, "draft", &context).await?;

        if shape.sections.len() != titles.len() {
            debug!(expected = titles.len(), got = shape.sections.len(), "draft_sections_with: count mismatch");
            return Err(PipelineError::Generation(format!(
                "Invalid response from model: expected {} sections, got {}",
                titles.len(),
                shape.sections.len()
            )));
        }

        // Titles are authoritative by position; the model only supplies drafts
        let mut sections: Vec<Section> = titles
            .iter()
            .zip(shape.sections)
            .map(|(title, drafted)| Section {
                title: title.clone(),
                draft: drafted.draft,
            })
            .collect();

        if refine {
            self.refine(&mut sections, topic).await?;
        }

        info!(count = sections.len(), refined = refine, "draft_sections_with: drafts ready");
        Ok(sections)
    }

    /// Regenerate one section's draft on its own
    pub async fn refine_section(&self, title: &str, topic: &str) -> Result<String, PipelineError> {
        debug!(%title, "refine_section: called");
        let context = RefinePrompt {
            title: title.to_string(),
            topic: topic.trim().to_string(),
        };
        let shape: DraftShape = self.generate(Stage::Drafts, "refine", &context).await?;
        Ok(shape.draft)
    }

    /// Refinement pass: one independent call per section, substituted in place
    async fn refine(&self, sections: &mut [Section], topic: &str) -> Result<(), PipelineError> {
        debug!(count = sections.len(), limit = self.refine_concurrency, "refine: called");
        let calls = sections.iter().map(|s| self.refine_section(&s.title, topic));
        let drafts: Vec<String> = futures::stream::iter(calls)
            .buffered(self.refine_concurrency)
            .try_collect()
            .await?;

        for (section, draft) in sections.iter_mut().zip(drafts) {
            section.draft = draft;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::error::PipelineError;
    use crate::llm::client::mock::MockLlmClient;
    use crate::llm::{CompletionRequest, CompletionResponse, LlmClient, LlmError};
    use crate::pipeline::ContentPipeline;
    use crate::prompts::PromptLoader;

    fn titles(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn sections_response(pairs: &[(&str, &str)]) -> CompletionResponse {
        let sections: Vec<serde_json::Value> = pairs
            .iter()
            .map(|(t, d)| serde_json::json!({ "title": t, "draft": d }))
            .collect();
        CompletionResponse::tool_call("submit_sections", serde_json::json!({ "sections": sections }))
    }

    #[tokio::test]
    async fn test_draft_sections_single_call() {
        let mock = Arc::new(MockLlmClient::new(vec![sections_response(&[
            ("Intro", "Opening words."),
            ("Body", "The middle."),
        ])]));
        let pipeline = ContentPipeline::new(mock.clone(), PromptLoader::embedded_only());

        let sections = pipeline
            .draft_sections(&titles(&["Intro", "Body"]), "AI in healthcare")
            .await
            .unwrap();

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Intro");
        assert_eq!(sections[1].draft, "The middle.");
        assert_eq!(mock.call_count(), 1);
        let prompt = &mock.requests()[0].messages[0].content;
        assert!(prompt.contains("- Intro"));
        assert!(prompt.contains("Topic: AI in healthcare"));
    }

    #[tokio::test]
    async fn test_titles_come_from_input_by_position() {
        let mock = Arc::new(MockLlmClient::new(vec![sections_response(&[
            ("Introduction (rewritten)", "One."),
            ("Body", "Two."),
        ])]));
        let pipeline = ContentPipeline::new(mock, PromptLoader::embedded_only());

        let sections = pipeline.draft_sections(&titles(&["Intro", "Body"]), "t").await.unwrap();
        assert_eq!(sections[0].title, "Intro");
        assert_eq!(sections[0].draft, "One.");
    }

    #[tokio::test]
    async fn test_empty_titles_short_circuit() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let pipeline = ContentPipeline::new(mock.clone(), PromptLoader::embedded_only());

        let err = pipeline.draft_sections(&[], "topic").await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(mock.call_count(), 0);

        let err = pipeline.draft_outline("just prose, no list", "topic").await.unwrap_err();
        assert_eq!(
            err.message(),
            "Could not parse the outline. Please ensure it is a valid list format."
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_draft_outline_requires_both_inputs() {
        let mock = Arc::new(MockLlmClient::new(vec![]));
        let pipeline = ContentPipeline::new(mock.clone(), PromptLoader::embedded_only());

        let err = pipeline.draft_outline("- A", " ").await.unwrap_err();
        assert_eq!(err, PipelineError::validation("Outline and topic cannot be empty."));
        let err = pipeline.draft_outline("", "topic").await.unwrap_err();
        assert_eq!(err, PipelineError::validation("Outline and topic cannot be empty."));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_count_mismatch_is_rejected() {
        let mock = Arc::new(MockLlmClient::new(vec![sections_response(&[("Intro", "Only one.")])]));
        let pipeline = ContentPipeline::new(mock, PromptLoader::embedded_only());

        let err = pipeline.draft_sections(&titles(&["Intro", "Body"]), "t").await.unwrap_err();
        assert_eq!(
            err,
            PipelineError::Generation("Invalid response from model: expected 2 sections, got 1".to_string())
        );
    }

    #[tokio::test]
    async fn test_refinement_replaces_each_draft_in_order() {
        let mock = Arc::new(MockLlmClient::new(vec![
            sections_response(&[("A", "draft a"), ("B", "draft b"), ("C", "draft c")]),
            CompletionResponse::tool_call("submit_draft", serde_json::json!({ "draft": "refined 1" })),
            CompletionResponse::tool_call("submit_draft", serde_json::json!({ "draft": "refined 2" })),
            CompletionResponse::tool_call("submit_draft", serde_json::json!({ "draft": "refined 3" })),
        ]));
        let pipeline = ContentPipeline::new(mock.clone(), PromptLoader::embedded_only()).with_refinement(true);

        let sections = pipeline.draft_sections(&titles(&["A", "B", "C"]), "topic").await.unwrap();

        assert_eq!(mock.call_count(), 4);
        assert_eq!(sections.iter().map(|s| s.title.as_str()).collect::<Vec<_>>(), vec!["A", "B", "C"]);
        assert!(sections.iter().all(|s| s.draft.starts_with("refined")));

        // Each refinement request names its own section
        let requests = mock.requests();
        let refine_prompts: Vec<&str> = requests[1..].iter().map(|r| r.messages[0].content.as_str()).collect();
        for title in ["'A'", "'B'", "'C'"] {
            assert_eq!(refine_prompts.iter().filter(|p| p.contains(title)).count(), 1);
        }
    }

    #[tokio::test]
    async fn test_refinement_failure_fails_whole_operation() {
        let mock = Arc::new(MockLlmClient::scripted(vec![
            Ok(sections_response(&[("A", "draft a"), ("B", "draft b")])),
            Ok(CompletionResponse::tool_call("submit_draft", serde_json::json!({ "draft": "refined" }))),
            Err(LlmError::Timeout(std::time::Duration::from_secs(30))),
        ]));
        let pipeline = ContentPipeline::new(mock, PromptLoader::embedded_only()).with_refinement(true);

        let err = pipeline.draft_sections(&titles(&["A", "B"]), "topic").await.unwrap_err();
        assert!(!err.is_validation());
    }

    /// Drafts every section at once, then holds each refinement call open
    /// briefly while tracking how many are in flight
    struct SlowRefiner {
        titles: Vec<String>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl LlmClient for SlowRefiner {
        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            if request.tools[0].name == "submit_sections" {
                let sections: Vec<(&str, &str)> = self.titles.iter().map(|t| (t.as_str(), "draft")).collect();
                return Ok(sections_response(&sections));
            }
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(CompletionResponse::tool_call(
                "submit_draft",
                serde_json::json!({ "draft": format!("refined {}", request.messages[0].content.len()) }),
            ))
        }
    }

    #[tokio::test]
    async fn test_refinement_respects_concurrency_limit() {
        let names: Vec<String> = (1..=40).map(|i| format!("Section {}", i)).collect();
        let client = Arc::new(SlowRefiner {
            titles: names.clone(),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        });
        let pipeline = ContentPipeline::new(client.clone(), PromptLoader::embedded_only())
            .with_refinement(true)
            .with_refine_concurrency(3);

        let sections = pipeline.draft_sections(&names, "topic").await.unwrap();

        assert_eq!(sections.len(), 40);
        assert_eq!(sections.iter().map(|s| &s.title).collect::<Vec<_>>(), names.iter().collect::<Vec<_>>());
        assert!(sections.iter().all(|s| s.draft.starts_with("refined")));
        assert_eq!(client.peak.load(Ordering::SeqCst), 3);
    }
}
