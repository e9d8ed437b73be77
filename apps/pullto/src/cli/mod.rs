//! CLI command handling for pullto

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pullto_config::{logging, AppConfig};
use pullto_foundation::{EditorState, FileHandle, PullError, SourceDocument};
use pullto_lang_csharp::get_signature_to_pull;
use pullto_services::{CommandRegistry, FsHost, PullService};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, Instrument};

/// The main CLI struct.
#[derive(Parser)]
#[command(name = "pullto")]
#[command(about = "Pull C# members up into interfaces and base classes")]
#[command(version)]
pub struct Cli {
    /// Workspace root searched for target files and configuration
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,

    /// The command to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// The available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// List the interfaces and base classes the member at a line can be pulled to
    Targets {
        /// Source file containing the class
        file: PathBuf,

        /// Cursor line, counting from 1
        #[arg(long, value_parser = parse_line)]
        line: usize,

        /// Print the full listing as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the member located at a line as JSON
    Inspect {
        /// Source file containing the class
        file: PathBuf,

        /// Cursor line, counting from 1
        #[arg(long, value_parser = parse_line)]
        line: usize,
    },
    /// Pull the member at a line into an interface or base class
    ///
    /// Targets starting with `I` are treated as interfaces and receive the
    /// member's declaration. Other targets are base classes and receive the
    /// whole member, which is then removed from the source file unless
    /// --keep-source is given.
    Pull {
        /// Source file containing the class
        file: PathBuf,

        /// Cursor line, counting from 1
        #[arg(long, value_parser = parse_line)]
        line: usize,

        /// Interface or base class to pull into (see `pullto targets`)
        #[arg(long)]
        target: String,

        /// Leave the member in the source file when pulling to a base class
        #[arg(long)]
        keep_source: bool,

        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Parse a one-based line number into a zero-based index
fn parse_line(s: &str) -> Result<usize, String> {
    let line: usize = s
        .parse()
        .map_err(|_| format!("'{}' is not a line number", s))?;
    line.checked_sub(1)
        .ok_or_else(|| "line numbers start at 1".to_string())
}

pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    let config = AppConfig::load_from(&cli.root)
        .with_context(|| format!("Failed to load configuration from {}", cli.root.display()))?;
    logging::initialize(&config);

    match cli.command {
        Commands::Targets { file, line, json } => {
            let span = logging::command_span("targets", None);
            handle_targets(&cli.root, config, &file, line, json)
                .instrument(span)
                .await
        }
        Commands::Inspect { file, line } => {
            let span = logging::command_span("inspect", None);
            handle_inspect(&file, line).instrument(span).await
        }
        Commands::Pull {
            file,
            line,
            target,
            keep_source,
            json,
        } => {
            let span = logging::command_span("pull", Some(target.as_str()));
            let mut config = config;
            if keep_source {
                config.pull.remove_from_source = false;
            }
            handle_pull(&cli.root, config, &file, line, &target, json)
                .instrument(span)
                .await
        }
    }
}

/// Read the source file into an editor snapshot with the cursor on `line`
async fn open_editor(path: &Path, line: usize) -> Result<EditorState> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PullError::io_at(e, path.display().to_string()))?;
    let document = SourceDocument::new(&text);
    if line >= document.line_count() {
        return Err(PullError::invalid_request(format!(
            "line {} is past the end of {} ({} lines)",
            line + 1,
            path.display(),
            document.line_count()
        ))
        .into());
    }
    Ok(EditorState::new(FileHandle::new(path), document, line))
}

fn service(root: &Path, config: AppConfig) -> Result<PullService<FsHost>> {
    let host = FsHost::new(root, &config.pull)?;
    Ok(PullService::new(Arc::new(host), config))
}

async fn handle_targets(
    root: &Path,
    config: AppConfig,
    file: &Path,
    line: usize,
    json: bool,
) -> Result<ExitCode> {
    let editor = open_editor(file, line).await?;
    let listing = service(root, config)?.targets(&editor).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&listing)?);
    } else {
        for target in &listing.targets {
            println!("{}", target);
        }
    }
    Ok(ExitCode::SUCCESS)
}

async fn handle_inspect(file: &Path, line: usize) -> Result<ExitCode> {
    let editor = open_editor(file, line).await?;
    let member = get_signature_to_pull(&editor).ok_or_else(|| {
        PullError::unclassifiable_member(format!("no public or protected member at line {}", line + 1))
    })?;
    println!("{}", serde_json::to_string_pretty(&member)?);
    Ok(ExitCode::SUCCESS)
}

async fn handle_pull(
    root: &Path,
    config: AppConfig,
    file: &Path,
    line: usize,
    target: &str,
    json: bool,
) -> Result<ExitCode> {
    let editor = open_editor(file, line).await?;
    let service = service(root, config)?;

    // Only targets offered for this member can be pulled to
    let listing = service.targets(&editor).await?;
    let registry = CommandRegistry::new();
    registry.register_all(listing.targets.iter().map(String::as_str));
    let Some(target) = registry.resolve_target(target) else {
        let offered = if listing.targets.is_empty() {
            "none".to_string()
        } else {
            listing.targets.join(", ")
        };
        return Err(PullError::invalid_request(format!(
            "'{}' is not a pull target for {} (available: {})",
            target, listing.class_name, offered
        ))
        .into());
    };
    debug!(
        command_id = %CommandRegistry::command_id(&target),
        "Resolved pull command"
    );

    match service.pull(&editor, &target).await {
        Ok(outcome) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            }
            Ok(ExitCode::SUCCESS)
        }
        // Already shown to the user by the host
        Err(e) => {
            debug!(code = e.code(), "Pull failed");
            Ok(ExitCode::FAILURE)
        }
    }
}
