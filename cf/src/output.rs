//! Text rendering shared by the CLI commands and the REPL

use colored::Colorize;

use crate::domain::{Section, SocialPost};
use crate::session::{Notification, NotificationKind};

/// Numbered idea list, 1-based to match `/pick` and `--pick`
pub fn format_ideas(ideas: &[String]) -> String {
    if ideas.is_empty() {
        return format!("{}\n", "No ideas returned.".dimmed());
    }
    ideas
        .iter()
        .enumerate()
        .map(|(i, idea)| format!("  {}. {}\n", (i + 1).to_string().yellow(), idea))
        .collect()
}

pub fn format_sections(sections: &[Section]) -> String {
    let mut out = String::new();
    for section in sections {
        out.push_str(&format!("{}\n\n{}\n\n", format!("## {}", section.title).bright_cyan(), section.draft));
    }
    out
}

pub fn format_posts(posts: &[SocialPost]) -> String {
    if posts.is_empty() {
        return format!("{}\n", "No posts returned.".dimmed());
    }
    let mut out = String::new();
    for post in posts {
        out.push_str(&format!("{}\n{}\n\n", format!("[{}]", post.platform).bright_blue().bold(), post.post));
    }
    out
}

pub fn format_notification(notification: &Notification) -> String {
    let title = match notification.kind {
        NotificationKind::Error => notification.title.red().bold(),
        NotificationKind::Info => notification.title.bright_cyan().bold(),
    };
    format!("{}: {}", title, notification.description)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_ideas_numbers_from_one() {
        colored::control::set_override(false);
        let out = format_ideas(&["a".to_string(), "b".to_string()]);
        assert_eq!(out, "  1. a\n  2. b\n");
    }

    #[test]
    fn test_format_sections_keeps_order() {
        colored::control::set_override(false);
        let out = format_sections(&[Section::drafted("Intro", "One."), Section::drafted("End", "Two.")]);
        assert_eq!(out, "## Intro\n\nOne.\n\n## End\n\nTwo.\n\n");
    }

    #[test]
    fn test_format_notification() {
        colored::control::set_override(false);
        let n = Notification::error("Error generating ideas", "Topic cannot be empty.");
        assert_eq!(format_notification(&n), "Error generating ideas: Topic cannot be empty.");

        let n = Notification::info("Discarded outline", "A newer request replaced this one.");
        assert_eq!(format_notification(&n), "Discarded outline: A newer request replaced this one.");
    }
}
