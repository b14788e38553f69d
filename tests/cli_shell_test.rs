//! One-shot commands and the interactive shell over a real snippet directory.

use std::io::{Cursor, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sd_core::app_dirs::AppDirs;
use sd_core::ports::{ClipboardPort, SnippetStorePort};
use sd_core::ImmediateFailurePolicy;
use sd_infra::{FileSnippetStore, SystemClock};
use sd_platform::TerminalPrompt;
use snipdesk::bootstrap::config::resolve_with_dirs;
use snipdesk::bootstrap::AppDeps;
use snipdesk::cli::{self, Commands, ConfigAction, FilterArgs};

#[derive(Default)]
struct MemoryClipboard(Mutex<Vec<String>>);

#[async_trait]
impl ClipboardPort for MemoryClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        self.0.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn text(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

struct Fixture {
    deps: AppDeps,
    clipboard: Arc<MemoryClipboard>,
    stderr: SharedBuf,
    dir: tempfile::TempDir,
}

async fn fixture(input: &str) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let store = FileSnippetStore::open(dir.path(), Arc::new(SystemClock))
        .await
        .unwrap();
    let stderr = SharedBuf::default();
    let prompt = TerminalPrompt::new(
        Box::new(Cursor::new(input.as_bytes().to_vec())),
        Box::new(stderr.clone()),
    );
    let clipboard = Arc::new(MemoryClipboard::default());
    Fixture {
        deps: AppDeps {
            store: Arc::new(store),
            clipboard: clipboard.clone(),
            prompt: Arc::new(prompt),
            clock: Arc::new(SystemClock),
            policy: ImmediateFailurePolicy::Rollback,
        },
        clipboard,
        stderr,
        dir,
    }
}

async fn run(fx: &Fixture, command: Commands) -> String {
    let mut out = Vec::new();
    cli::run(command, &fx.deps, &mut out).await.unwrap();
    String::from_utf8(out).unwrap()
}

fn new_command(title: &str, body: &str, language: Option<&str>, tags: &[&str]) -> Commands {
    Commands::New {
        title: title.to_string(),
        body: body.to_string(),
        language: language.map(str::to_string),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

#[tokio::test]
async fn new_then_list_with_filters() {
    let fx = fixture("").await;
    run(&fx, new_command("docker prune", "docker system prune -af", Some("bash"), &["docker", "ops"])).await;
    run(&fx, new_command("pods", "kubectl get pods", None, &["k8s"])).await;

    let all = run(&fx, Commands::List(FilterArgs::default())).await;
    assert!(all.contains("docker prune"));
    assert!(all.contains("pods"));

    let filtered = run(
        &fx,
        Commands::List(FilterArgs {
            tags: vec!["DOCKER".into()],
            language: Some("bash".into()),
        }),
    )
    .await;
    assert!(filtered.contains("#docker #ops  [bash]"));
    assert!(!filtered.contains("pods"));

    let stored = fx.deps.store.list_all().await.unwrap();
    let docker = stored.iter().find(|s| s.title == "docker prune").unwrap();
    assert_eq!(docker.language, "bash");
    assert_eq!(docker.tags, vec!["docker", "ops"]);
}

#[tokio::test]
async fn show_accepts_an_id_prefix() {
    let fx = fixture("").await;
    run(&fx, new_command("ssh tunnel", "ssh -L 8080:localhost:80 host", None, &[])).await;
    let id = fx.deps.store.list_all().await.unwrap()[0].id.clone();

    let shown = run(&fx, Commands::Show { id: id.short(6).to_string() }).await;
    assert!(shown.starts_with("---\n"));
    assert!(shown.contains("title: \"ssh tunnel\""));
    assert!(shown.contains("ssh -L 8080:localhost:80 host"));
}

#[tokio::test]
async fn copy_puts_the_best_match_on_the_clipboard() {
    let fx = fixture("").await;
    run(&fx, new_command("git log", "git log --oneline --graph", None, &[])).await;
    run(&fx, new_command("list files", "ls -la", None, &[])).await;

    run(&fx, Commands::Copy { query: vec!["git".into()] }).await;
    assert_eq!(
        fx.clipboard.0.lock().unwrap().clone(),
        vec!["git log --oneline --graph".to_string()]
    );
}

#[tokio::test]
async fn shell_edits_saves_and_guards_unsaved_changes() {
    let script = [
        "new scratch",
        "title renamed",
        "body",
        "echo one",
        "echo two",
        ".",
        "tag demo",
        "quit",
        "n",
        "save",
        "show",
        "quit",
    ]
    .join("\n");
    let fx = fixture(&script).await;

    let out = run(&fx, Commands::Edit { query: None }).await;
    assert!(out.contains("opened \"scratch\""));
    assert!(out.contains("tag added"));
    assert!(out.contains("saved \"renamed\""));
    assert!(out.contains("echo one\necho two\n"));
    assert!(fx.stderr.text().contains("Quit anyway? [y/N]"));

    let stored = fx.deps.store.list_all().await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].title, "renamed");
    assert_eq!(stored[0].body, "echo one\necho two");
    assert_eq!(stored[0].tags, vec!["demo"]);
}

#[tokio::test]
async fn shell_asks_before_switching_away_from_a_dirty_draft() {
    let script = ["open 1", "title edited", "open 2", "n", "show", "open 2", "y", "quit"].join("\n");
    let fx = fixture(&script).await;
    run(&fx, new_command("first", "", None, &[])).await;
    run(&fx, new_command("second", "", None, &[])).await;

    let out = run(&fx, Commands::Edit { query: None }).await;
    assert!(out.contains("kept the current snippet"));
    assert!(out.contains("edited  (modified)"));
    assert!(fx.stderr.text().contains("has unsaved changes. Discard them and switch to"));

    let titles: Vec<String> = fx
        .deps
        .store
        .list_all()
        .await
        .unwrap()
        .into_iter()
        .map(|s| s.title)
        .collect();
    assert!(!titles.contains(&"edited".to_string()));
}

#[cfg(unix)]
#[tokio::test]
async fn exec_runs_the_best_match_through_the_shell() {
    let fx = fixture("").await;
    let marker = fx.dir.path().join("ran.txt");
    let body = format!("printf 'disk ok' > '{}'", marker.display());
    run(&fx, new_command("disk check", &body, Some("bash"), &[])).await;
    run(&fx, new_command("failing step", "exit 3", None, &[])).await;

    run(&fx, Commands::Exec { query: vec!["disk".into()] }).await;
    assert_eq!(std::fs::read_to_string(&marker).unwrap(), "disk ok");

    let mut out = Vec::new();
    let err = cli::run(Commands::Exec { query: vec!["failing".into()] }, &fx.deps, &mut out)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("command execution failed"));

    let mut out = Vec::new();
    let err = cli::run(Commands::Exec { query: vec!["zzzz".into()] }, &fx.deps, &mut out)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("no snippet matches"));
}

fn config_dirs(root: &std::path::Path) -> AppDirs {
    AppDirs {
        app_data_root: root.join("data"),
        app_config_root: root.join("config"),
    }
}

fn config_output(root: &std::path::Path, action: ConfigAction) -> anyhow::Result<String> {
    let resolved = resolve_with_dirs(config_dirs(root), None)?;
    let mut out = Vec::new();
    cli::run_config(action, &resolved, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn config_bootstrap_set_and_show() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();

    let shown = config_output(root, ConfigAction::Show).unwrap();
    assert!(shown.contains("(not created)"));
    assert!(shown.contains("immediate_failure: rollback"));

    let booted = config_output(root, ConfigAction::Bootstrap).unwrap();
    assert!(booted.contains("Configuration bootstrapped"));
    assert!(booted.contains("(present)"));
    assert!(config_dirs(root).config_file().is_file());
    assert!(config_output(root, ConfigAction::Bootstrap).is_err());

    let moved = root.join("elsewhere");
    let set = config_output(
        root,
        ConfigAction::Set {
            key: "data_dir".into(),
            value: moved.display().to_string(),
        },
    )
    .unwrap();
    assert!(set.starts_with("Configuration updated: data_dir = "));
    config_output(
        root,
        ConfigAction::Set {
            key: "immediate_failure".into(),
            value: "keep".into(),
        },
    )
    .unwrap();

    let shown = config_output(root, ConfigAction::Show).unwrap();
    assert!(shown.contains(&format!("data_dir:          {}", moved.display())));
    assert!(shown.contains("immediate_failure: keep"));
    assert!(moved.is_dir());

    assert!(config_output(
        root,
        ConfigAction::Set {
            key: "editor".into(),
            value: "vim".into(),
        },
    )
    .is_err());
}
