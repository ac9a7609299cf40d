//! REPL input parsing

use tracing::debug;

/// One line of REPL input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    /// Submit a topic (plain text or `/topic <text>`)
    Topic(String),
    /// Pick an idea, 1-based as shown on screen
    Pick(usize),
    /// Regenerate the outline for the selected idea
    Outline,
    Draft { refine: bool },
    Social,
    Show,
    Status,
    Reset,
    Help,
    Quit,
    /// Anything the REPL could not make sense of, with a hint
    Invalid(String),
}

impl ReplCommand {
    pub fn parse(input: &str) -> Self {
        debug!(%input, "ReplCommand::parse: called");
        let input = input.trim();
        if !input.starts_with('/') {
            return Self::Topic(input.to_string());
        }

        let (cmd, rest) = match input.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (input, ""),
        };

        match cmd {
            "/topic" | "/t" => Self::Topic(rest.to_string()),
            "/pick" | "/p" => match rest.parse::<usize>() {
                Ok(n) if n >= 1 => Self::Pick(n),
                _ => Self::Invalid("Usage: /pick <n> where n is an idea number".to_string()),
            },
            "/outline" | "/o" => Self::Outline,
            "/draft" | "/d" => match rest {
                "" => Self::Draft { refine: false },
                "--refine" | "-r" => Self::Draft { refine: true },
                other => Self::Invalid(format!("Unknown option for /draft: {}", other)),
            },
            "/social" | "/s" => Self::Social,
            "/show" => Self::Show,
            "/status" => Self::Status,
            "/reset" => Self::Reset,
            "/help" | "/h" => Self::Help,
            "/quit" | "/q" | "/exit" => Self::Quit,
            other => {
                debug!(%other, "ReplCommand::parse: unknown command");
                Self::Invalid(format!("Unknown command: {}", other))
            }
        }
    }
}
