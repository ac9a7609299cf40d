//! ContentForge - topic to ideas, outline, drafts and social posts
//!
//! CLI entry point for one-shot pipeline commands and the interactive REPL.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use eyre::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use contentforge::cli::{Cli, Command, OutputFormat, get_log_path};
use contentforge::config::Config;
use contentforge::domain::{Section, SocialPost, parse_outline};
use contentforge::llm::create_client;
use contentforge::output::{format_ideas, format_notification, format_posts, format_sections};
use contentforge::pipeline::ContentPipeline;
use contentforge::pipeline::input;
use contentforge::prompts::PromptLoader;
use contentforge::repl;
use contentforge::session::{Orchestrator, Outcome, Session};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(provider = %config.llm.provider, model = %config.llm.model, "ContentForge loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Ideas { topic, format }) => {
            debug!(%topic, "main: matched Ideas command");
            cmd_ideas(&config, &topic, format).await
        }
        Some(Command::Outline { idea, format }) => {
            debug!(%idea, "main: matched Outline command");
            cmd_outline(&config, &idea, format).await
        }
        Some(Command::Draft {
            topic,
            outline_file,
            refine,
            format,
        }) => {
            debug!(%topic, ?outline_file, refine, "main: matched Draft command");
            cmd_draft(&config, &topic, outline_file.as_deref(), refine, format).await
        }
        Some(Command::Social { content_file, format }) => {
            debug!(?content_file, "main: matched Social command");
            cmd_social(&config, content_file.as_deref(), format).await
        }
        Some(Command::Run {
            topic,
            pick,
            refine,
            format,
        }) => {
            debug!(%topic, pick, refine, "main: matched Run command");
            cmd_run(&config, &topic, pick, refine, format).await
        }
        Some(Command::Logs { lines }) => {
            debug!(lines, "main: matched Logs command");
            cmd_logs(lines)
        }
        Some(Command::Repl) | None => {
            debug!("main: launching REPL");
            let pipeline = build_pipeline(&config)?;
            repl::run_interactive(Orchestrator::new(Arc::new(pipeline))).await
        }
    }
}

/// Build the pipeline from config: model client plus prompt lookup chain
///
/// Commands run their `input` checks before calling this.
fn build_pipeline(config: &Config) -> Result<ContentPipeline> {
    debug!("build_pipeline: called");
    config.validate()?;
    let llm = create_client(&config.llm).map_err(|e| eyre::eyre!("Failed to create LLM client: {}", e))?;
    let root = std::env::current_dir().context("Failed to read current directory")?;
    let prompts = PromptLoader::new(root, config.prompts.expanded_dir());
    Ok(ContentPipeline::new(llm, prompts).with_config(&config.pipeline, config.llm.max_tokens))
}

/// Read a file, or all of stdin when no path is given
fn read_input(path: Option<&Path>) -> Result<String> {
    debug!(?path, "read_input: called");
    match path {
        Some(path) => fs::read_to_string(path).context(format!("Failed to read {}", path.display())),
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn cmd_ideas(config: &Config, topic: &str, format: OutputFormat) -> Result<()> {
    debug!(%topic, %format, "cmd_ideas: called");
    input::check_topic(topic)?;
    let pipeline = build_pipeline(config)?;
    let ideas = pipeline.generate_ideas(topic).await?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "ideas": ideas })),
        OutputFormat::Text => {
            print!("{}", format_ideas(&ideas));
            Ok(())
        }
    }
}

async fn cmd_outline(config: &Config, idea: &str, format: OutputFormat) -> Result<()> {
    debug!(%idea, %format, "cmd_outline: called");
    input::check_idea(idea)?;
    let pipeline = build_pipeline(config)?;
    let outline = pipeline.create_outline(idea).await?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({
            "outline": outline,
            "titles": parse_outline(&outline),
        })),
        OutputFormat::Text => {
            println!("{}", outline);
            Ok(())
        }
    }
}

async fn cmd_draft(
    config: &Config,
    topic: &str,
    outline_file: Option<&Path>,
    refine: bool,
    format: OutputFormat,
) -> Result<()> {
    debug!(%topic, ?outline_file, refine, %format, "cmd_draft: called");
    let outline = read_input(outline_file)?;
    let titles = input::outline_titles(&outline, topic)?;
    let pipeline = build_pipeline(config)?;
    let pipeline = if refine { pipeline.with_refinement(true) } else { pipeline };
    let sections = pipeline.draft_sections(&titles, topic).await?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "sections": sections })),
        OutputFormat::Text => {
            print!("{}", format_sections(&sections));
            Ok(())
        }
    }
}

async fn cmd_social(config: &Config, content_file: Option<&Path>, format: OutputFormat) -> Result<()> {
    debug!(?content_file, %format, "cmd_social: called");
    let content = read_input(content_file)?;
    input::check_content(&content)?;
    let pipeline = build_pipeline(config)?;
    let posts = pipeline.generate_social_posts(&content).await?;

    match format {
        OutputFormat::Json => print_json(&serde_json::json!({ "posts": posts })),
        OutputFormat::Text => {
            print!("{}", format_posts(&posts));
            Ok(())
        }
    }
}

/// Everything one `cf run` produced
#[derive(Debug, Serialize)]
struct RunReport<'a> {
    topic: &'a str,
    ideas: &'a [String],
    selected_idea: Option<&'a str>,
    outline: Option<&'a str>,
    sections: &'a [Section],
    posts: &'a [SocialPost],
}

/// Turn a stage outcome into an error unless it advanced the session
fn advanced(outcome: Outcome, session: &mut Session) -> Result<()> {
    match outcome {
        Outcome::Advanced => Ok(()),
        Outcome::Failed(notification) => Err(eyre::eyre!("{}", format_notification(&notification))),
        Outcome::Blocked(blocked) => match session.take_notifications().first() {
            Some(notification) => Err(eyre::eyre!("{}", format_notification(notification))),
            None => Err(eyre::eyre!("{}", blocked)),
        },
        Outcome::Discarded => match session.take_notifications().first() {
            Some(notification) => Err(eyre::eyre!("{}", format_notification(notification))),
            None => Err(eyre::eyre!("Result was superseded")),
        },
    }
}

async fn cmd_run(config: &Config, topic: &str, pick: usize, refine: bool, format: OutputFormat) -> Result<()> {
    debug!(%topic, pick, refine, %format, "cmd_run: called");
    input::check_topic(topic)?;
    let orchestrator = Orchestrator::new(Arc::new(build_pipeline(config)?));
    let mut session = Session::new();

    let outcome = orchestrator.submit_topic(&mut session, topic).await;
    advanced(outcome, &mut session)?;

    if pick == 0 || pick > session.ideas().len() {
        return Err(eyre::eyre!(
            "Cannot pick idea {}: {} idea(s) were generated",
            pick,
            session.ideas().len()
        ));
    }
    let outcome = orchestrator.select_idea(&mut session, pick - 1).await;
    advanced(outcome, &mut session)?;

    let outcome = orchestrator.generate_drafts(&mut session, refine.then_some(true)).await;
    advanced(outcome, &mut session)?;

    let outcome = orchestrator.generate_social_posts(&mut session).await;
    advanced(outcome, &mut session)?;
    info!(phase = %session.phase(), "cmd_run: pipeline complete");

    match format {
        OutputFormat::Json => print_json(&RunReport {
            topic: session.topic(),
            ideas: session.ideas(),
            selected_idea: session.selected_idea(),
            outline: session.outline(),
            sections: session.drafts().unwrap_or_default(),
            posts: session.posts().unwrap_or_default(),
        }),
        OutputFormat::Text => {
            println!("Ideas for \"{}\":", session.topic());
            print!("{}", format_ideas(session.ideas()));
            println!();
            println!("Outline for \"{}\":", session.selected_idea().unwrap_or_default());
            println!("{}", session.outline().unwrap_or_default());
            println!();
            print!("{}", format_sections(session.drafts().unwrap_or_default()));
            print!("{}", format_posts(session.posts().unwrap_or_default()));
            Ok(())
        }
    }
}

/// Print the last N lines of the log file
fn cmd_logs(lines: usize) -> Result<()> {
    debug!(lines, "cmd_logs: called");
    let log_path: PathBuf = get_log_path();

    if !log_path.exists() {
        debug!(?log_path, "cmd_logs: log file does not exist");
        println!("No log file found at: {}", log_path.display());
        return Ok(());
    }

    let file = fs::File::open(&log_path).context("Failed to open log file")?;
    let reader = BufReader::new(file);
    let all_lines: Vec<String> = reader.lines().map_while(Result::ok).collect();

    let start = all_lines.len().saturating_sub(lines);
    for line in &all_lines[start..] {
        println!("{}", line);
    }
    Ok(())
}
