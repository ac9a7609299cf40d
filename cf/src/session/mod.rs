//! Interactive session orchestration
//!
//! [`Session`] is the state record; [`Orchestrator`] runs the pipeline calls
//! it asks for and feeds the results back.

mod driver;
mod state;

pub use driver::Orchestrator;
pub use state::{Blocked, DraftRequest, Notification, NotificationKind, Outcome, Pending, Phase, Session, Ticket};
