//! Interactive REPL for ContentForge
//!
//! Walks one [`Session`](crate::session::Session) through the pipeline with
//! slash commands; plain text submits a topic.

mod command;
mod session;

pub use command::ReplCommand;
pub use session::ReplSession;

use eyre::Result;

use crate::session::Orchestrator;

/// Run the interactive REPL
///
/// This is the main entry point for `cf repl` and for `cf` with no subcommand.
pub async fn run_interactive(orchestrator: Orchestrator) -> Result<()> {
    let mut session = ReplSession::new(orchestrator);
    session.run().await
}
