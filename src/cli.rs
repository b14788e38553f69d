//! Command-line interface.

use std::io::Write;
use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use sd_core::ports::SnippetStorePort;
use sd_core::session::render_raw;
use sd_core::Snippet;
use sd_infra::config::{bootstrap_config_file, set_config_value};
use sd_infra::SearchOptions;

use crate::bootstrap::{AppDeps, ResolvedConfig};
use crate::render;
use crate::shell::Shell;

#[derive(Debug, Parser)]
#[command(name = "snipdesk")]
#[command(version, about = "SnipDesk - local snippet manager", long_about = None)]
pub struct Cli {
    /// Read configuration from this file instead of the default location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

/// Top level: snippet commands need the store, `config` does not.
#[derive(Debug, Subcommand)]
pub enum CliCommand {
    #[command(flatten)]
    Snippets(Commands),
    /// Show or change the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl CliCommand {
    /// One-shot commands keep stderr quiet; the shell shows everything.
    pub fn is_interactive(&self) -> bool {
        matches!(self, CliCommand::Snippets(Commands::Edit { .. }))
    }
}

#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration
    Show,
    /// Set one key (data_dir, immediate_failure, log_dir) in the config file
    Set { key: String, value: String },
    /// Write the current defaults to a new config file
    Bootstrap,
}

#[derive(Debug, Args, Default)]
pub struct FilterArgs {
    /// Only snippets carrying this tag (repeatable, all must match)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Only snippets in this language
    #[arg(long, value_name = "LANG")]
    pub language: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List snippets, most recently updated first
    List(FilterArgs),
    /// Search titles (fuzzy), tags and bodies
    Search {
        query: String,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Print one snippet as frontmatter and body
    Show {
        /// Full id or unique id prefix
        id: String,
    },
    /// Create a snippet
    New {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        body: String,
        #[arg(long)]
        language: Option<String>,
        #[arg(long = "tag", value_name = "TAG")]
        tags: Vec<String>,
    },
    /// Copy the body of the best match to the clipboard
    Copy {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Run the body of the best match with `sh -c`
    Exec {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Open the interactive editing shell
    Edit {
        /// Initial list filter
        query: Option<String>,
    },
}

pub async fn run<W: Write>(command: Commands, deps: &AppDeps, out: &mut W) -> anyhow::Result<()> {
    match command {
        Commands::List(filter) => {
            let found = deps.store.query(&filter.into_options(String::new())).await;
            write!(out, "{}", render::snippet_table(&found))?;
        }
        Commands::Search { query, filter } => {
            let found = deps.store.query(&filter.into_options(query)).await;
            write!(out, "{}", render::snippet_table(&found))?;
        }
        Commands::Show { id } => {
            let snippet = find_by_id_prefix(deps, &id).await?;
            writeln!(out, "{}", render_raw(&snippet))?;
        }
        Commands::New {
            title,
            body,
            language,
            tags,
        } => {
            let snippet = create(deps, &title, &body, language, &tags).await?;
            writeln!(out, "created {} \"{}\"", snippet.id.short(8), snippet.title)?;
        }
        Commands::Copy { query } => {
            let best = best_match(deps, &query.join(" ")).await?;
            let controller = deps.session_controller();
            controller.select(best).await;
            controller.copy_body().await?;
        }
        Commands::Exec { query } => {
            let best = best_match(deps, &query.join(" ")).await?;
            out.flush()?;
            run_body(&best).await?;
        }
        Commands::Edit { query } => {
            let mut shell = Shell::new(deps.session_controller(), deps.prompt.clone(), out);
            shell.run(query.as_deref()).await?;
        }
    }
    Ok(())
}

pub fn run_config<W: Write>(
    action: ConfigAction,
    resolved: &ResolvedConfig,
    out: &mut W,
) -> anyhow::Result<()> {
    match action {
        ConfigAction::Show => show_config(resolved, out)?,
        ConfigAction::Set { key, value } => {
            set_config_value(&resolved.config_file, &key, &value)?;
            writeln!(out, "Configuration updated: {key} = {value}")?;
        }
        ConfigAction::Bootstrap => {
            bootstrap_config_file(&resolved.config_file, &resolved.config)?;
            writeln!(
                out,
                "Configuration bootstrapped: {}",
                resolved.config_file.display()
            )?;
            show_config(resolved, out)?;
        }
    }
    Ok(())
}

fn show_config<W: Write>(resolved: &ResolvedConfig, out: &mut W) -> anyhow::Result<()> {
    let state = if resolved.config_file.is_file() {
        "present"
    } else {
        "not created"
    };
    writeln!(out, "Current configuration:")?;
    writeln!(
        out,
        "  config file:       {} ({state})",
        resolved.config_file.display()
    )?;
    writeln!(out, "  data_dir:          {}", resolved.config.data_dir.display())?;
    writeln!(
        out,
        "  immediate_failure: {}",
        resolved.config.immediate_failure.as_str()
    )?;
    writeln!(out, "  log_dir:           {}", resolved.log_dir().display())?;
    Ok(())
}

async fn best_match(deps: &AppDeps, query: &str) -> anyhow::Result<Snippet> {
    match deps.store.query(&SearchOptions::query(query)).await.into_iter().next() {
        Some(best) => Ok(best),
        None => bail!("no snippet matches '{query}'"),
    }
}

/// Runs the body through `sh -c` with the terminal attached.
async fn run_body(snippet: &Snippet) -> anyhow::Result<()> {
    info!(snippet_id = %snippet.id, title = %snippet.title, "executing snippet body");
    let status = tokio::process::Command::new("sh")
        .arg("-c")
        .arg(&snippet.body)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .context("Failed to start sh")?;
    if !status.success() {
        bail!("command execution failed: {status}");
    }
    Ok(())
}

impl FilterArgs {
    fn into_options(self, query: String) -> SearchOptions {
        SearchOptions {
            query,
            tags: self.tags,
            language: self.language,
        }
    }
}

async fn find_by_id_prefix(deps: &AppDeps, prefix: &str) -> anyhow::Result<Snippet> {
    let all = deps
        .store
        .list_all()
        .await
        .context("Failed to list snippets")?;
    let mut matches: Vec<Snippet> = all
        .into_iter()
        .filter(|s| s.id.as_str().starts_with(prefix))
        .collect();
    match matches.len() {
        0 => bail!("no snippet with id '{prefix}'"),
        1 => Ok(matches.remove(0)),
        n => bail!("id prefix '{prefix}' is ambiguous ({n} snippets)"),
    }
}

/// Creates through the session so tags go down the immediate path and the
/// language down the deferred one, exactly as in the shell.
async fn create(
    deps: &AppDeps,
    title: &str,
    body: &str,
    language: Option<String>,
    tags: &[String],
) -> anyhow::Result<Snippet> {
    let controller = deps.session_controller();
    let created = controller.create(title, body).await?;
    for tag in tags {
        controller.add_tag(tag).await?;
    }
    if let Some(language) = language {
        controller.edit_language(language).await?;
        controller.save().await?;
    }
    Ok(controller
        .view()
        .await
        .draft
        .map(|d| d.to_record())
        .unwrap_or(created.snippet))
}
