//! Async driver for a [`Session`]

use std::sync::Arc;

use tracing::debug;

use super::state::{Outcome, Session};
use crate::pipeline::ContentPipeline;

/// Runs pipeline calls on behalf of a session
///
/// Each method begins a stage, awaits the pipeline, and applies the result,
/// holding `&mut Session` for the whole call. Callers that need the session
/// while a call is in flight use `Session::begin_*` and `Session::finish_*`
/// around their own pipeline call; a result whose ticket went stale in the
/// meantime comes back as `Outcome::Discarded`.
#[derive(Clone)]
pub struct Orchestrator {
    pipeline: Arc<ContentPipeline>,
}

impl Orchestrator {
    pub fn new(pipeline: Arc<ContentPipeline>) -> Self {
        Self { pipeline }
    }

    /// Submit a topic and generate ideas for it
    pub async fn submit_topic(&self, session: &mut Session, topic: &str) -> Outcome {
        debug!(%topic, "submit_topic: called");
        let pending = match session.begin_ideas(topic) {
            Ok(pending) => pending,
            Err(blocked) => return Outcome::Blocked(blocked),
        };
        let result = self.pipeline.generate_ideas(&pending.input).await;
        session.finish_ideas(pending.ticket, result)
    }

    /// Pick an idea (zero-based) and build its outline
    pub async fn select_idea(&self, session: &mut Session, index: usize) -> Outcome {
        debug!(index, "select_idea: called");
        let pending = match session.select_idea(index) {
            Ok(pending) => pending,
            Err(blocked) => return Outcome::Blocked(blocked),
        };
        let result = self.pipeline.create_outline(&pending.input).await;
        session.finish_outline(pending.ticket, result)
    }

    pub async fn regenerate_outline(&self, session: &mut Session) -> Outcome {
        debug!("regenerate_outline: called");
        let pending = match session.regenerate_outline() {
            Ok(pending) => pending,
            Err(blocked) => return Outcome::Blocked(blocked),
        };
        let result = self.pipeline.create_outline(&pending.input).await;
        session.finish_outline(pending.ticket, result)
    }

    /// Draft every outline section; `refine` overrides the pipeline setting
    pub async fn generate_drafts(&self, session: &mut Session, refine: Option<bool>) -> Outcome {
        debug!(?refine, "generate_drafts: called");
        let pending = match session.begin_drafts() {
            Ok(pending) => pending,
            Err(blocked) => return Outcome::Blocked(blocked),
        };
        let refine = refine.unwrap_or_else(|| self.pipeline.refines_sections());
        let request = &pending.input;
        let result = self
            .pipeline
            .draft_sections_with(&request.titles, &request.topic, refine)
            .await;
        session.finish_drafts(pending.ticket, result)
    }

    pub async fn generate_social_posts(&self, session: &mut Session) -> Outcome {
        debug!("generate_social_posts: called");
        let pending = match session.begin_social() {
            Ok(pending) => pending,
            Err(blocked) => return Outcome::Blocked(blocked),
        };
        let result = self.pipeline.generate_social_posts(&pending.input).await;
        session.finish_social(pending.ticket, result)
    }
}
