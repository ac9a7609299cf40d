//! Session state
//!
//! Pure data for one content-creation session. No model calls here; the
//! [`Orchestrator`](super::Orchestrator) drives the async side and hands
//! results back through the `finish_*` methods.
//!
//! Every `begin_*` issues a [`Ticket`]. Starting a stage clears that stage's
//! output and everything downstream of it, and forgets any tickets issued to
//! those stages, so a late result from a superseded call is discarded.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::{Section, SocialPost, join_drafts, parse_outline};
use crate::error::PipelineError;
use crate::pipeline::Stage;

/// Where the session is, derived from its data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    IdeasGenerating,
    IdeasReady,
    IdeaSelected,
    OutlineGenerating,
    OutlineReady,
    DraftsGenerating,
    DraftsReady,
    SocialGenerating,
    SocialReady,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::IdeasGenerating => "generating ideas",
            Self::IdeasReady => "ideas ready",
            Self::IdeaSelected => "idea selected",
            Self::OutlineGenerating => "generating outline",
            Self::OutlineReady => "outline ready",
            Self::DraftsGenerating => "drafting sections",
            Self::DraftsReady => "drafts ready",
            Self::SocialGenerating => "generating social posts",
            Self::SocialReady => "social posts ready",
        }
    }
}

impl std::fmt::Display for Phase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotificationKind {
    #[default]
    Error,
    Info,
}

/// A user-facing message, the session's equivalent of a toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub description: String,
    pub kind: NotificationKind,
}

impl Notification {
    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Error,
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            kind: NotificationKind::Info,
        }
    }

    /// Notification for a failed stage, e.g. "Error generating outline"
    pub fn for_failure(stage: Stage, error: &PipelineError) -> Self {
        Self::error(format!("Error generating {}", stage.name()), error.message())
    }
}

/// Proof that a stage was started at a given epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    pub stage: Stage,
    pub epoch: u64,
}

/// A started stage: its ticket plus the input to send to the pipeline
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending<I> {
    pub ticket: Ticket,
    pub input: I,
}

/// Input for the drafting stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftRequest {
    pub titles: Vec<String>,
    pub topic: String,
}

/// Why a trigger was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Blocked {
    #[error("Already generating {0}.")]
    Busy(Stage),

    #[error("{0}")]
    NotReady(&'static str),

    #[error("There is no idea number {0}.")]
    NoSuchIdea(usize),

    /// Input failed validation; a notification has been queued
    #[error("{0}")]
    Invalid(PipelineError),
}

/// What applying a result did to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The result was stored and the session moved forward
    Advanced,
    /// The stage failed; the notification has also been queued
    Failed(Notification),
    /// The ticket was superseded; the result was dropped
    Discarded,
    /// The trigger was refused before any call was made
    Blocked(Blocked),
}

/// One content-creation session
#[derive(Debug, Default)]
pub struct Session {
    topic: String,
    ideas: Option<Vec<String>>,
    selected_idea: Option<String>,
    outline: Option<String>,
    drafts: Option<Vec<Section>>,
    posts: Option<Vec<SocialPost>>,
    in_flight: BTreeMap<Stage, u64>,
    epoch: u64,
    notifications: Vec<Notification>,
}

impl Session {
    pub fn new() -> Self {
        debug!("Session::new: called");
        Self::default()
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn ideas(&self) -> &[String] {
        self.ideas.as_deref().unwrap_or_default()
    }

    pub fn selected_idea(&self) -> Option<&str> {
        self.selected_idea.as_deref()
    }

    pub fn outline(&self) -> Option<&str> {
        self.outline.as_deref()
    }

    pub fn drafts(&self) -> Option<&[Section]> {
        self.drafts.as_deref()
    }

    pub fn posts(&self) -> Option<&[SocialPost]> {
        self.posts.as_deref()
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_generating(&self, stage: Stage) -> bool {
        self.in_flight.contains_key(&stage)
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Drain queued notifications
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub fn phase(&self) -> Phase {
        if self.is_generating(Stage::Social) {
            Phase::SocialGenerating
        } else if self.posts.is_some() {
            Phase::SocialReady
        } else if self.is_generating(Stage::Drafts) {
            Phase::DraftsGenerating
        } else if self.drafts.is_some() {
            Phase::DraftsReady
        } else if self.is_generating(Stage::Outline) {
            Phase::OutlineGenerating
        } else if self.outline.is_some() {
            Phase::OutlineReady
        } else if self.selected_idea.is_some() {
            Phase::IdeaSelected
        } else if self.is_generating(Stage::Ideas) {
            Phase::IdeasGenerating
        } else if self.ideas.is_some() {
            Phase::IdeasReady
        } else {
            Phase::Idle
        }
    }

    /// Check whether a stage's trigger is enabled
    ///
    /// A stage is gated while it is generating and until its upstream data
    /// exists. Picking an idea is always allowed once ideas are in; it
    /// supersedes an outline still in flight.
    pub fn can_trigger(&self, stage: Stage) -> Result<(), Blocked> {
        debug!(%stage, "can_trigger: called");
        match stage {
            Stage::Ideas => {
                if self.is_generating(Stage::Ideas) {
                    return Err(Blocked::Busy(Stage::Ideas));
                }
            }
            Stage::Outline => {
                if self.is_generating(Stage::Ideas) {
                    return Err(Blocked::Busy(Stage::Ideas));
                }
                if self.ideas().is_empty() {
                    return Err(Blocked::NotReady("Generate ideas first."));
                }
            }
            Stage::Drafts => {
                if self.is_generating(Stage::Drafts) {
                    return Err(Blocked::Busy(Stage::Drafts));
                }
                if self.outline.is_none() {
                    return Err(Blocked::NotReady("Pick an idea and wait for its outline first."));
                }
            }
            Stage::Social => {
                if self.is_generating(Stage::Social) {
                    return Err(Blocked::Busy(Stage::Social));
                }
                if self.drafts.is_none() {
                    return Err(Blocked::NotReady("Generate drafts first."));
                }
            }
        }
        Ok(())
    }

    /// Start idea generation for a new topic
    pub fn begin_ideas(&mut self, topic: &str) -> Result<Pending<String>, Blocked> {
        debug!(%topic, "begin_ideas: called");
        self.can_trigger(Stage::Ideas)?;
        let topic = topic.trim();
        if topic.is_empty() {
            debug!("begin_ideas: empty topic");
            return Err(self.invalid(Stage::Ideas, "Topic cannot be empty."));
        }

        self.topic = topic.to_string();
        let ticket = self.start(Stage::Ideas);
        info!(%topic, "generating ideas");
        Ok(Pending {
            ticket,
            input: self.topic.clone(),
        })
    }

    /// Pick an idea by index and start building its outline
    pub fn select_idea(&mut self, index: usize) -> Result<Pending<String>, Blocked> {
        debug!(index, "select_idea: called");
        self.can_trigger(Stage::Outline)?;
        let idea = self.ideas().get(index).cloned().ok_or(Blocked::NoSuchIdea(index + 1))?;

        let ticket = self.start(Stage::Outline);
        self.selected_idea = Some(idea.clone());
        info!(%idea, "idea selected");
        Ok(Pending { ticket, input: idea })
    }

    /// Build a fresh outline for the already-selected idea
    pub fn regenerate_outline(&mut self) -> Result<Pending<String>, Blocked> {
        debug!("regenerate_outline: called");
        if self.is_generating(Stage::Outline) {
            return Err(Blocked::Busy(Stage::Outline));
        }
        let idea = self
            .selected_idea
            .clone()
            .ok_or(Blocked::NotReady("Pick an idea first."))?;

        let ticket = self.start(Stage::Outline);
        Ok(Pending { ticket, input: idea })
    }

    /// Parse the outline and start drafting
    ///
    /// An outline with no list items is refused without a model call.
    pub fn begin_drafts(&mut self) -> Result<Pending<DraftRequest>, Blocked> {
        debug!("begin_drafts: called");
        self.can_trigger(Stage::Drafts)?;
        let titles = parse_outline(self.outline.as_deref().unwrap_or_default());
        if titles.is_empty() {
            debug!("begin_drafts: outline has no titles");
            return Err(self.invalid(
                Stage::Drafts,
                "Could not parse the outline. Please ensure it is a valid list format.",
            ));
        }

        let topic = self.selected_idea.clone().unwrap_or_else(|| self.topic.clone());
        let ticket = self.start(Stage::Drafts);
        info!(sections = titles.len(), "drafting sections");
        Ok(Pending {
            ticket,
            input: DraftRequest { titles, topic },
        })
    }

    /// Join the drafts and start social post generation
    pub fn begin_social(&mut self) -> Result<Pending<String>, Blocked> {
        debug!("begin_social: called");
        self.can_trigger(Stage::Social)?;
        let content = join_drafts(self.drafts.as_deref().unwrap_or_default());
        if content.trim().is_empty() {
            return Err(self.invalid(Stage::Social, "Content cannot be empty."));
        }

        let ticket = self.start(Stage::Social);
        info!(content_len = content.len(), "generating social posts");
        Ok(Pending { ticket, input: content })
    }

    pub fn finish_ideas(&mut self, ticket: Ticket, result: Result<Vec<String>, PipelineError>) -> Outcome {
        self.finish(ticket, result, |session, ideas| session.ideas = Some(ideas))
    }

    pub fn finish_outline(&mut self, ticket: Ticket, result: Result<String, PipelineError>) -> Outcome {
        self.finish(ticket, result, |session, outline| session.outline = Some(outline))
    }

    pub fn finish_drafts(&mut self, ticket: Ticket, result: Result<Vec<Section>, PipelineError>) -> Outcome {
        self.finish(ticket, result, |session, drafts| session.drafts = Some(drafts))
    }

    pub fn finish_social(&mut self, ticket: Ticket, result: Result<Vec<SocialPost>, PipelineError>) -> Outcome {
        self.finish(ticket, result, |session, posts| session.posts = Some(posts))
    }

    /// Back to idle; anything still in flight will be discarded
    pub fn reset(&mut self) {
        debug!("reset: called");
        let epoch = self.epoch;
        *self = Self::default();
        self.epoch = epoch + 1;
    }

    /// Clear `stage` and everything after it, then issue a ticket for `stage`
    fn start(&mut self, stage: Stage) -> Ticket {
        self.epoch += 1;
        self.clear_from(stage);
        self.in_flight.insert(stage, self.epoch);
        debug!(%stage, epoch = self.epoch, "start: ticket issued");
        Ticket {
            stage,
            epoch: self.epoch,
        }
    }

    fn clear_from(&mut self, stage: Stage) {
        for s in std::iter::once(stage).chain(stage.downstream()) {
            self.in_flight.remove(&s);
            match s {
                Stage::Ideas => {
                    self.ideas = None;
                    self.selected_idea = None;
                }
                Stage::Outline => self.outline = None,
                Stage::Drafts => self.drafts = None,
                Stage::Social => self.posts = None,
            }
        }
    }

    fn finish<T>(
        &mut self,
        ticket: Ticket,
        result: Result<T, PipelineError>,
        store: impl FnOnce(&mut Self, T),
    ) -> Outcome {
        debug!(stage = %ticket.stage, epoch = ticket.epoch, "finish: called");
        if self.in_flight.get(&ticket.stage) != Some(&ticket.epoch) {
            debug!(stage = %ticket.stage, "finish: stale ticket, discarding");
            self.notifications.push(Notification::info(
                format!("Discarded {}", ticket.stage.name()),
                "A newer request replaced this one.",
            ));
            return Outcome::Discarded;
        }
        self.in_flight.remove(&ticket.stage);

        match result {
            Ok(value) => {
                store(self, value);
                info!(stage = %ticket.stage, phase = %self.phase(), "stage complete");
                Outcome::Advanced
            }
            Err(e) => {
                let notification = Notification::for_failure(ticket.stage, &e);
                self.notifications.push(notification.clone());
                info!(stage = %ticket.stage, error = %e, "stage failed");
                Outcome::Failed(notification)
            }
        }
    }

    fn invalid(&mut self, stage: Stage, message: &str) -> Blocked {
        let error = PipelineError::validation(message);
        self.notifications.push(Notification::for_failure(stage, &error));
        Blocked::Invalid(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_ideas(ideas: &[&str]) -> Session {
        let mut session = Session::new();
        let pending = session.begin_ideas("The Future of AI").unwrap();
        let ideas = ideas.iter().map(|s| s.to_string()).collect();
        assert_eq!(session.finish_ideas(pending.ticket, Ok(ideas)), Outcome::Advanced);
        session
    }

    fn with_outline(outline: &str) -> Session {
        let mut session = with_ideas(&["AI in healthcare", "AI and jobs"]);
        let pending = session.select_idea(0).unwrap();
        session.finish_outline(pending.ticket, Ok(outline.to_string()));
        session
    }

    fn with_drafts() -> Session {
        let mut session = with_outline("- Intro\n- Body");
        let pending = session.begin_drafts().unwrap();
        let sections = vec![Section::drafted("Intro", "One."), Section::drafted("Body", "Two.")];
        session.finish_drafts(pending.ticket, Ok(sections));
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.phase(), Phase::Idle);
        assert!(session.ideas().is_empty());
        assert!(session.notifications().is_empty());
    }

    #[test]
    fn test_empty_topic_notifies_and_stays_idle() {
        let mut session = Session::new();
        let err = session.begin_ideas("  ").unwrap_err();

        assert_eq!(err, Blocked::Invalid(PipelineError::validation("Topic cannot be empty.")));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.notifications()[0].title, "Error generating ideas");
        assert_eq!(session.notifications()[0].description, "Topic cannot be empty.");
    }

    #[test]
    fn test_forward_path_phases() {
        let mut session = Session::new();
        let pending = session.begin_ideas("The Future of AI").unwrap();
        assert_eq!(pending.input, "The Future of AI");
        assert_eq!(session.phase(), Phase::IdeasGenerating);

        session.finish_ideas(pending.ticket, Ok(vec!["AI in healthcare".to_string()]));
        assert_eq!(session.phase(), Phase::IdeasReady);

        let pending = session.select_idea(0).unwrap();
        assert_eq!(pending.input, "AI in healthcare");
        assert_eq!(session.phase(), Phase::OutlineGenerating);

        session.finish_outline(pending.ticket, Ok("- Intro\n- Body".to_string()));
        assert_eq!(session.phase(), Phase::OutlineReady);

        let pending = session.begin_drafts().unwrap();
        assert_eq!(pending.input.titles, vec!["Intro", "Body"]);
        assert_eq!(pending.input.topic, "AI in healthcare");
        assert_eq!(session.phase(), Phase::DraftsGenerating);

        let sections = vec![Section::drafted("Intro", "One."), Section::drafted("Body", "Two.")];
        session.finish_drafts(pending.ticket, Ok(sections));
        assert_eq!(session.phase(), Phase::DraftsReady);

        let pending = session.begin_social().unwrap();
        assert_eq!(pending.input, "One.\n\nTwo.");
        assert_eq!(session.phase(), Phase::SocialGenerating);

        session.finish_social(pending.ticket, Ok(vec![]));
        assert_eq!(session.phase(), Phase::SocialReady);
    }

    #[test]
    fn test_downstream_gated_until_upstream_ready() {
        let mut session = Session::new();
        assert!(matches!(session.select_idea(0), Err(Blocked::NotReady(_))));
        assert!(matches!(session.begin_drafts(), Err(Blocked::NotReady(_))));
        assert!(matches!(session.begin_social(), Err(Blocked::NotReady(_))));
        assert!(matches!(session.regenerate_outline(), Err(Blocked::NotReady(_))));
    }

    #[test]
    fn test_own_trigger_disabled_while_generating() {
        let mut session = with_outline("- Intro");
        session.begin_drafts().unwrap();
        assert_eq!(session.begin_drafts().unwrap_err(), Blocked::Busy(Stage::Drafts));

        let mut session = Session::new();
        session.begin_ideas("rust").unwrap();
        assert_eq!(session.begin_ideas("go").unwrap_err(), Blocked::Busy(Stage::Ideas));
    }

    #[test]
    fn test_select_idea_out_of_range() {
        let mut session = with_ideas(&["only one"]);
        assert_eq!(session.select_idea(3).unwrap_err(), Blocked::NoSuchIdea(4));
        assert_eq!(session.phase(), Phase::IdeasReady);
    }

    #[test]
    fn test_selecting_new_idea_resets_downstream() {
        let mut session = with_drafts();
        assert!(session.drafts().is_some());

        session.select_idea(1).unwrap();

        assert_eq!(session.selected_idea(), Some("AI and jobs"));
        assert!(session.outline().is_none());
        assert!(session.drafts().is_none());
        assert!(session.posts().is_none());
        assert_eq!(session.ideas().len(), 2);
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut session = with_outline("- Intro\n- Body");
        let drafting = session.begin_drafts().unwrap();

        // User picks another idea while drafts are still in flight
        let outlining = session.select_idea(1).unwrap();
        let late = vec![Section::drafted("Intro", "stale")];
        assert_eq!(session.finish_drafts(drafting.ticket, Ok(late)), Outcome::Discarded);
        assert!(session.drafts().is_none());
        assert_eq!(session.phase(), Phase::OutlineGenerating);

        let notes = session.take_notifications();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].kind, NotificationKind::Info);
        assert_eq!(notes[0].title, "Discarded drafts");

        session.finish_outline(outlining.ticket, Ok("- Fresh".to_string()));
        assert_eq!(session.outline(), Some("- Fresh"));
    }

    #[test]
    fn test_reselect_supersedes_outline_in_flight() {
        let mut session = with_ideas(&["first", "second"]);
        let old = session.select_idea(0).unwrap();
        let new = session.select_idea(1).unwrap();
        assert!(new.ticket.epoch > old.ticket.epoch);

        assert_eq!(session.finish_outline(old.ticket, Ok("- Old".to_string())), Outcome::Discarded);
        assert_eq!(session.finish_outline(new.ticket, Ok("- New".to_string())), Outcome::Advanced);
        assert_eq!(session.outline(), Some("- New"));
    }

    #[test]
    fn test_failure_notifies_and_keeps_prior_state() {
        let mut session = with_outline("- Intro");
        let pending = session.begin_drafts().unwrap();

        let outcome = session.finish_drafts(pending.ticket, Err(PipelineError::Generation("timeout".to_string())));

        let Outcome::Failed(notification) = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert_eq!(notification.title, "Error generating drafts");
        assert_eq!(notification.description, "timeout");
        assert_eq!(notification.kind, NotificationKind::Error);
        assert_eq!(session.phase(), Phase::OutlineReady);
        assert_eq!(session.outline(), Some("- Intro"));
        assert!(session.can_trigger(Stage::Drafts).is_ok());
    }

    #[test]
    fn test_unparseable_outline_short_circuits() {
        let mut session = with_outline("Just a paragraph of prose.");
        let err = session.begin_drafts().unwrap_err();

        assert!(matches!(err, Blocked::Invalid(_)));
        assert!(!session.is_generating(Stage::Drafts));
        let notes = session.take_notifications();
        assert_eq!(notes[0].title, "Error generating drafts");
        assert_eq!(
            notes[0].description,
            "Could not parse the outline. Please ensure it is a valid list format."
        );
        assert!(session.notifications().is_empty());
    }

    #[test]
    fn test_new_topic_clears_everything() {
        let mut session = with_drafts();
        let pending = session.begin_ideas("Rust").unwrap();

        assert_eq!(session.topic(), "Rust");
        assert!(session.ideas().is_empty());
        assert!(session.selected_idea().is_none());
        assert!(session.outline().is_none());
        assert!(session.drafts().is_none());
        assert_eq!(session.phase(), Phase::IdeasGenerating);
        assert_eq!(pending.ticket.stage, Stage::Ideas);
    }

    #[test]
    fn test_reset_discards_in_flight() {
        let mut session = with_ideas(&["x"]);
        let pending = session.select_idea(0).unwrap();
        let before = session.epoch();

        session.reset();

        assert!(session.epoch() > before);
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(
            session.finish_outline(pending.ticket, Ok("- A".to_string())),
            Outcome::Discarded
        );
    }

    #[test]
    fn test_regenerate_outline_keeps_selection() {
        let mut session = with_drafts();
        let pending = session.regenerate_outline().unwrap();

        assert_eq!(pending.input, "AI in healthcare");
        assert_eq!(session.selected_idea(), Some("AI in healthcare"));
        assert!(session.drafts().is_none());
        assert_eq!(session.phase(), Phase::OutlineGenerating);
    }
}
