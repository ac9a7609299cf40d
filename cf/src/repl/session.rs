//! REPL session management

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::command::ReplCommand;
use crate::output::{format_ideas, format_notification, format_posts, format_sections};
use crate::session::{Orchestrator, Outcome, Phase, Session};

/// Interactive REPL session
pub struct ReplSession {
    orchestrator: Orchestrator,
    session: Session,
}

enum Flow {
    Continue,
    Quit,
}

impl ReplSession {
    pub fn new(orchestrator: Orchestrator) -> Self {
        Self {
            orchestrator,
            session: Session::new(),
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome();

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }
                    let _ = rl.add_history_entry(input);

                    match self.handle(ReplCommand::parse(input)).await {
                        Flow::Continue => continue,
                        Flow::Quit => break,
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    fn print_welcome(&self) {
        println!();
        println!("{}", "ContentForge Interactive Session".bright_cyan().bold());
        println!("Type a topic to get started.");
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        println!();
    }

    async fn handle(&mut self, command: ReplCommand) -> Flow {
        debug!(?command, "handle: called");
        match command {
            ReplCommand::Topic(topic) => {
                println!("{}", "Generating ideas...".dimmed());
                let outcome = self.orchestrator.submit_topic(&mut self.session, &topic).await;
                self.report(outcome);
            }
            ReplCommand::Pick(n) => {
                println!("{}", "Building outline...".dimmed());
                let outcome = self.orchestrator.select_idea(&mut self.session, n - 1).await;
                self.report(outcome);
            }
            ReplCommand::Outline => {
                println!("{}", "Rebuilding outline...".dimmed());
                let outcome = self.orchestrator.regenerate_outline(&mut self.session).await;
                self.report(outcome);
            }
            ReplCommand::Draft { refine } => {
                println!("{}", "Drafting sections...".dimmed());
                let refine = refine.then_some(true);
                let outcome = self.orchestrator.generate_drafts(&mut self.session, refine).await;
                self.report(outcome);
            }
            ReplCommand::Social => {
                println!("{}", "Generating social posts...".dimmed());
                let outcome = self.orchestrator.generate_social_posts(&mut self.session).await;
                self.report(outcome);
            }
            ReplCommand::Show => self.print_everything(),
            ReplCommand::Status => self.print_status(),
            ReplCommand::Reset => {
                self.session.reset();
                println!("{}", "Session cleared.".dimmed());
            }
            ReplCommand::Help => self.print_help(),
            ReplCommand::Quit => return Flow::Quit,
            ReplCommand::Invalid(hint) => {
                println!("{} {}", "?".yellow(), hint);
                println!("Type {} for available commands", "/help".yellow());
            }
        }
        Flow::Continue
    }

    /// Print the result of a stage, then anything it queued
    fn report(&mut self, outcome: Outcome) {
        debug!(?outcome, "report: called");
        match outcome {
            Outcome::Advanced => self.print_latest(),
            Outcome::Blocked(blocked) if self.session.notifications().is_empty() => {
                println!("{} {}", "!".yellow(), blocked);
            }
            Outcome::Blocked(_) | Outcome::Failed(_) | Outcome::Discarded => {}
        }
        for notification in self.session.take_notifications() {
            println!("{}", format_notification(&notification));
        }
    }

    /// Print whatever the current phase just produced
    fn print_latest(&self) {
        match self.session.phase() {
            Phase::IdeasReady => {
                println!();
                println!("{}", "Ideas:".bright_cyan());
                print!("{}", format_ideas(self.session.ideas()));
                println!("Use {} to develop one.", "/pick <n>".yellow());
            }
            Phase::OutlineReady => {
                println!();
                println!("{}", "Outline:".bright_cyan());
                println!("{}", self.session.outline().unwrap_or_default());
                println!();
                println!("Use {} to write it.", "/draft".yellow());
            }
            Phase::DraftsReady => {
                println!();
                print!("{}", format_sections(self.session.drafts().unwrap_or_default()));
                println!("Use {} for posts.", "/social".yellow());
            }
            Phase::SocialReady => {
                println!();
                print!("{}", format_posts(self.session.posts().unwrap_or_default()));
            }
            phase => println!("{}", phase.to_string().dimmed()),
        }
    }

    fn print_everything(&self) {
        if self.session.phase() == Phase::Idle {
            println!("{}", "Nothing yet. Type a topic to start.".dimmed());
            return;
        }
        println!();
        println!("{} {}", "Topic:".bright_cyan(), self.session.topic());
        if !self.session.ideas().is_empty() {
            println!("{}", "Ideas:".bright_cyan());
            print!("{}", format_ideas(self.session.ideas()));
        }
        if let Some(idea) = self.session.selected_idea() {
            println!("{} {}", "Selected:".bright_cyan(), idea);
        }
        if let Some(outline) = self.session.outline() {
            println!("{}", "Outline:".bright_cyan());
            println!("{}", outline);
        }
        if let Some(drafts) = self.session.drafts() {
            println!();
            print!("{}", format_sections(drafts));
        }
        if let Some(posts) = self.session.posts() {
            print!("{}", format_posts(posts));
        }
    }

    fn print_status(&self) {
        println!("{} {}", "Phase:".bright_cyan(), self.session.phase());
        if !self.session.topic().is_empty() {
            println!("{} {}", "Topic:".bright_cyan(), self.session.topic());
        }
        if let Some(idea) = self.session.selected_idea() {
            println!("{} {}", "Idea:".bright_cyan(), idea);
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:18} Generate ideas for a topic (plain text works too)", "/topic <text>".yellow());
        println!("  {:18} Pick an idea and build its outline", "/pick <n>".yellow());
        println!("  {:18} Rebuild the outline for the picked idea", "/outline".yellow());
        println!("  {:18} Draft every outline section", "/draft [--refine]".yellow());
        println!("  {:18} Generate social posts from the drafts", "/social".yellow());
        println!("  {:18} Show everything generated so far", "/show".yellow());
        println!("  {:18} Show where the session is", "/status".yellow());
        println!("  {:18} Start over", "/reset".yellow());
        println!("  {:18} Show this help", "/help".yellow());
        println!("  {:18} Exit the REPL", "/quit".yellow());
        println!();
    }
}
