//! Interactive editing shell.
//!
//! A line-oriented front end over [`SessionController`]. Every command maps
//! onto one controller operation; the controller owns all state.

use std::io::Write;
use std::sync::Arc;

use tracing::warn;

use sd_app::usecases::{DeleteOutcome, MutationOutcome, SelectOutcome};
use sd_app::{SessionController, SessionError};
use sd_core::ports::{ConfirmPrompt, ConfirmationPort};
use sd_core::{ListStatus, Snippet};
use sd_platform::TerminalPrompt;

use crate::render;

const HELP: &str = "\
commands:
  ls                 list snippets
  find <query>       filter the list (empty query lists everything)
  open <n|id>        select the n-th listed snippet or an id prefix
  title <text>       edit the title
  lang <text>        edit the language
  body               edit the body; end input with a line holding a single '.'
  tag <text>         add a tag (saved immediately)
  untag <text>       remove a tag (saved immediately)
  fav                toggle favorite (saved immediately)
  save               save title, body and language
  delete             delete the selected snippet
  copy               copy the body to the clipboard
  raw                toggle the raw frontmatter view
  show               show the selected snippet
  new <title>        create a snippet and open it
  retry              retry a failed list load
  help               show this help
  quit               leave the shell
";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Empty,
    List,
    Find(String),
    Open(String),
    Title(String),
    Lang(String),
    Body,
    Tag(String),
    Untag(String),
    Fav,
    Save,
    Delete,
    Copy,
    Raw,
    Show,
    New(String),
    Retry,
    Help,
    Quit,
}

/// Parses one input line. Arguments keep their inner spacing.
pub fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (name, arg) = match line.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (line, ""),
    };

    let required = |what: &str| -> Result<String, String> {
        if arg.is_empty() {
            Err(format!("usage: {name} <{what}>"))
        } else {
            Ok(arg.to_string())
        }
    };

    let command = match name {
        "" => ShellCommand::Empty,
        "ls" | "list" => ShellCommand::List,
        "find" | "search" => ShellCommand::Find(arg.to_string()),
        "open" => ShellCommand::Open(required("n|id")?),
        "title" => ShellCommand::Title(required("text")?),
        "lang" | "language" => ShellCommand::Lang(arg.to_string()),
        "body" => ShellCommand::Body,
        "tag" => ShellCommand::Tag(required("text")?),
        "untag" => ShellCommand::Untag(required("text")?),
        "fav" | "favorite" => ShellCommand::Fav,
        "save" => ShellCommand::Save,
        "delete" | "rm" => ShellCommand::Delete,
        "copy" => ShellCommand::Copy,
        "raw" => ShellCommand::Raw,
        "show" => ShellCommand::Show,
        "new" => ShellCommand::New(required("title")?),
        "retry" => ShellCommand::Retry,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command: {other} (try 'help')")),
    };
    Ok(command)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

pub struct Shell<W: Write> {
    controller: SessionController,
    terminal: Arc<TerminalPrompt>,
    out: W,
}

impl<W: Write> Shell<W> {
    pub fn new(controller: SessionController, terminal: Arc<TerminalPrompt>, out: W) -> Self {
        Self {
            controller,
            terminal,
            out,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    /// Runs until `quit` or end of input.
    pub async fn run(&mut self, initial_query: Option<&str>) -> anyhow::Result<()> {
        if let Some(query) = initial_query {
            // Not mounted yet: only records the text, so mount fetches once.
            let result = self.controller.set_query(query).await;
            self.finish(result)?;
        }
        let mounted = self.controller.mount().await;
        self.finish(mounted)?;
        self.print_list().await?;

        loop {
            write!(self.out, "snipdesk> ")?;
            self.out.flush()?;

            let Some(line) = self.terminal.read_line().await else {
                writeln!(self.out)?;
                if self.controller.is_dirty().await {
                    warn!("input closed with unsaved changes; discarding");
                }
                break;
            };

            match parse_command(&line) {
                Ok(command) => {
                    if self.execute(command).await? == Flow::Exit {
                        break;
                    }
                }
                Err(message) => writeln!(self.out, "{message}")?,
            }
        }

        self.controller.unmount().await;
        Ok(())
    }

    async fn execute(&mut self, command: ShellCommand) -> anyhow::Result<Flow> {
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Help => write!(self.out, "{HELP}")?,
            ShellCommand::List => self.print_list().await?,
            ShellCommand::Find(query) => {
                let result = self.controller.set_query(query).await;
                self.finish(result)?;
                self.print_list().await?;
            }
            ShellCommand::Retry => {
                let result = self.controller.retry_list().await;
                self.finish(result)?;
                self.print_list().await?;
            }
            ShellCommand::Open(key) => self.open(&key).await?,
            ShellCommand::Title(text) => {
                let result = self.controller.edit_title(text).await;
                self.finish(result)?;
            }
            ShellCommand::Lang(text) => {
                let result = self.controller.edit_language(text).await;
                self.finish(result)?;
            }
            ShellCommand::Body => self.edit_body().await?,
            ShellCommand::Tag(text) => {
                let result = self.controller.add_tag(&text).await;
                self.report_mutation(result, "tag added", "tag already present")?;
            }
            ShellCommand::Untag(text) => {
                let result = self.controller.remove_tag(&text).await;
                self.report_mutation(result, "tag removed", "no such tag")?;
            }
            ShellCommand::Fav => {
                let result = self.controller.toggle_favorite().await;
                self.report_mutation(result, "favorite updated", "")?;
            }
            ShellCommand::Save => match self.controller.save().await {
                Ok(saved) => writeln!(self.out, "saved \"{}\"", saved.title)?,
                Err(err) => self.report(&err)?,
            },
            ShellCommand::Delete => match self.controller.delete().await {
                Ok(DeleteOutcome::Deleted(_)) => {
                    writeln!(self.out, "deleted")?;
                    self.print_list().await?;
                }
                Ok(DeleteOutcome::Declined) => writeln!(self.out, "kept")?,
                Err(err) => self.report(&err)?,
            },
            ShellCommand::Copy => {
                let result = self.controller.copy_body().await;
                self.finish(result)?;
            }
            ShellCommand::Raw => match self.controller.toggle_raw_mode().await {
                Ok(_) => self.show().await?,
                Err(err) => self.report(&err)?,
            },
            ShellCommand::Show => self.show().await?,
            ShellCommand::New(title) => match self.controller.create(&title, "").await {
                Ok(created) => {
                    self.describe_selection(created.selection, &created.snippet)?;
                    self.print_list().await?;
                }
                Err(err) => self.report(&err)?,
            },
            ShellCommand::Quit => return self.quit().await,
        }
        Ok(Flow::Continue)
    }

    async fn open(&mut self, key: &str) -> anyhow::Result<()> {
        let Some(target) = self.resolve(key).await else {
            writeln!(self.out, "no snippet matches '{key}'")?;
            return Ok(());
        };
        let outcome = self.controller.select(target.clone()).await;
        self.describe_selection(outcome, &target)?;
        if matches!(outcome, SelectOutcome::Loaded { .. } | SelectOutcome::Unchanged) {
            self.show().await?;
        }
        Ok(())
    }

    /// A 1-based row number, or a unique id prefix among the listed items.
    async fn resolve(&self, key: &str) -> Option<Snippet> {
        let items = self.controller.view().await.list.items;
        if let Ok(n) = key.parse::<usize>() {
            if n >= 1 && n <= items.len() {
                return items.into_iter().nth(n - 1);
            }
        }
        let mut matches = items
            .into_iter()
            .filter(|s| s.id.as_str().starts_with(key));
        match (matches.next(), matches.next()) {
            (Some(found), None) => Some(found),
            _ => None,
        }
    }

    async fn edit_body(&mut self) -> anyhow::Result<()> {
        if self.controller.selected_id().await.is_none() {
            return self.report(&SessionError::NoSelection);
        }
        writeln!(self.out, "enter body, finish with a single '.' line")?;
        self.out.flush()?;

        let mut lines = Vec::new();
        while let Some(line) = self.terminal.read_line().await {
            if line == "." {
                break;
            }
            lines.push(line);
        }
        let result = self.controller.edit_body(lines.join("\n")).await;
        self.finish(result)
    }

    async fn quit(&mut self) -> anyhow::Result<Flow> {
        let view = self.controller.view().await;
        if let Some(draft) = view.draft.filter(|d| d.is_dirty()) {
            let prompt = ConfirmPrompt::QuitWithUnsavedChanges {
                title: draft.title().to_string(),
            };
            if !self.terminal.confirm(&prompt).await {
                return Ok(Flow::Continue);
            }
        }
        Ok(Flow::Exit)
    }

    async fn show(&mut self) -> anyhow::Result<()> {
        match self.controller.view().await.draft {
            Some(draft) => write!(self.out, "{}", render::draft_details(&draft))?,
            None => writeln!(self.out, "no snippet is selected")?,
        }
        Ok(())
    }

    async fn print_list(&mut self) -> anyhow::Result<()> {
        let view = self.controller.view().await;
        match &view.list.status {
            ListStatus::Loading => writeln!(self.out, "loading…")?,
            ListStatus::Failed(message) => {
                writeln!(self.out, "could not load snippets: {message} (type 'retry')")?
            }
            ListStatus::Loaded => {
                if !view.list.query_text.trim().is_empty() {
                    writeln!(self.out, "results for '{}':", view.list.query_text)?;
                }
                write!(self.out, "{}", render::list_rows(&view.rows))?;
            }
        }
        Ok(())
    }

    fn describe_selection(&mut self, outcome: SelectOutcome, target: &Snippet) -> anyhow::Result<()> {
        match outcome {
            SelectOutcome::Loaded { fallback: false } => {
                writeln!(self.out, "opened \"{}\"", target.title)?
            }
            SelectOutcome::Loaded { fallback: true } => writeln!(
                self.out,
                "opened \"{}\" (could not refresh it from disk; showing the listed copy)",
                target.title
            )?,
            SelectOutcome::Declined => writeln!(self.out, "kept the current snippet")?,
            SelectOutcome::Unchanged => {}
            SelectOutcome::Superseded => writeln!(self.out, "selection changed meanwhile")?,
        }
        Ok(())
    }

    fn report_mutation(
        &mut self,
        result: Result<MutationOutcome, SessionError>,
        persisted: &str,
        unchanged: &str,
    ) -> anyhow::Result<()> {
        match result {
            Ok(MutationOutcome::Persisted) => writeln!(self.out, "{persisted}")?,
            Ok(MutationOutcome::Unchanged) if !unchanged.is_empty() => {
                writeln!(self.out, "{unchanged}")?
            }
            Ok(MutationOutcome::Unchanged) => {}
            Err(err) => self.report(&err)?,
        }
        Ok(())
    }

    fn finish<T>(&mut self, result: Result<T, SessionError>) -> anyhow::Result<()> {
        match result {
            Ok(_) => Ok(()),
            Err(err) => self.report(&err),
        }
    }

    /// Mutation and clipboard failures were already delivered as notices.
    fn report(&mut self, err: &SessionError) -> anyhow::Result<()> {
        match err {
            SessionError::Mutation { .. } | SessionError::Clipboard(_) => {}
            other => writeln!(self.out, "error: {other}")?,
        }
        Ok(())
    }
}
