#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use tokio::sync::Notify;

use sd_app::SessionController;
use sd_core::ports::{
    ClipboardPort, ClockPort, ConfirmPrompt, ConfirmationPort, Notice, NoticePort,
    SnippetStorePort, StoreError,
};
use sd_core::{ImmediateFailurePolicy, Snippet, SnippetId};

/// In-memory store with call recording, failure switches and gates that hold
/// a call until the test releases it.
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<FakeState>,
}

#[derive(Default)]
struct FakeState {
    snippets: Vec<Snippet>,
    calls: Vec<String>,
    fail_save: bool,
    fail_get: bool,
    fail_list: bool,
    get_gates: HashMap<SnippetId, Arc<Notify>>,
    list_gates: VecDeque<Arc<Notify>>,
    saves: u32,
}

impl FakeStore {
    pub fn with(snippets: Vec<Snippet>) -> Arc<Self> {
        let store = FakeStore::default();
        store.state.lock().unwrap().snippets = snippets;
        Arc::new(store)
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn stored(&self, id: &SnippetId) -> Option<Snippet> {
        self.state
            .lock()
            .unwrap()
            .snippets
            .iter()
            .find(|s| &s.id == id)
            .cloned()
    }

    pub fn set_fail_save(&self, fail: bool) {
        self.state.lock().unwrap().fail_save = fail;
    }

    pub fn set_fail_get(&self, fail: bool) {
        self.state.lock().unwrap().fail_get = fail;
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.state.lock().unwrap().fail_list = fail;
    }

    /// The next `get(id)` waits until the returned gate is notified.
    pub fn hold_get(&self, id: &SnippetId) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state
            .lock()
            .unwrap()
            .get_gates
            .insert(id.clone(), gate.clone());
        gate
    }

    /// The next list or search call waits until the returned gate is notified.
    pub fn hold_next_list(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.state.lock().unwrap().list_gates.push_back(gate.clone());
        gate
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn io_error(what: &str) -> StoreError {
        StoreError::io(
            format!("{what} failed"),
            std::io::Error::new(std::io::ErrorKind::Other, "injected"),
        )
    }

    async fn wait_list_gate(&self) {
        let gate = self.state.lock().unwrap().list_gates.pop_front();
        if let Some(gate) = gate {
            gate.notified().await;
        }
    }
}

#[async_trait]
impl SnippetStorePort for FakeStore {
    async fn list_all(&self) -> Result<Vec<Snippet>, StoreError> {
        self.record("list_all".to_string());
        self.wait_list_gate().await;
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(Self::io_error("list"));
        }
        Ok(state.snippets.clone())
    }

    async fn get(&self, id: &SnippetId) -> Result<Snippet, StoreError> {
        self.record(format!("get:{id}"));
        let gate = self.state.lock().unwrap().get_gates.remove(id);
        if let Some(gate) = gate {
            gate.notified().await;
        }
        let state = self.state.lock().unwrap();
        if state.fail_get {
            return Err(Self::io_error("get"));
        }
        state
            .snippets
            .iter()
            .find(|s| &s.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    async fn search(&self, query: &str) -> Result<Vec<Snippet>, StoreError> {
        self.record(format!("search:{query}"));
        self.wait_list_gate().await;
        let state = self.state.lock().unwrap();
        if state.fail_list {
            return Err(Self::io_error("search"));
        }
        let needle = query.trim().to_lowercase();
        Ok(state
            .snippets
            .iter()
            .filter(|s| s.title.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn save(&self, snippet: &Snippet) -> Result<(), StoreError> {
        self.record(format!("save:{}", snippet.id));
        let mut state = self.state.lock().unwrap();
        if state.fail_save {
            return Err(Self::io_error("save"));
        }
        state.saves += 1;
        let mut stored = snippet.clone();
        stored.updated_at = snippet.updated_at + Duration::seconds(i64::from(state.saves));
        match state.snippets.iter_mut().find(|s| s.id == snippet.id) {
            Some(existing) => *existing = stored,
            None => state.snippets.push(stored),
        }
        Ok(())
    }

    async fn delete(&self, id: &SnippetId) -> Result<(), StoreError> {
        self.record(format!("delete:{id}"));
        let mut state = self.state.lock().unwrap();
        let before = state.snippets.len();
        state.snippets.retain(|s| &s.id != id);
        if state.snippets.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }

    async fn reload(&self) -> Result<(), StoreError> {
        self.record("reload".to_string());
        Ok(())
    }
}

/// Confirmation port answering from a script and recording every prompt.
#[derive(Default)]
pub struct ScriptedConfirm {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<ConfirmPrompt>>,
}

impl ScriptedConfirm {
    pub fn answering(answers: &[bool]) -> Arc<Self> {
        let confirm = ScriptedConfirm::default();
        confirm.answers.lock().unwrap().extend(answers.iter().copied());
        Arc::new(confirm)
    }

    pub fn push(&self, answer: bool) {
        self.answers.lock().unwrap().push_back(answer);
    }

    pub fn prompts(&self) -> Vec<ConfirmPrompt> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ConfirmationPort for ScriptedConfirm {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        self.prompts.lock().unwrap().push(prompt.clone());
        self.answers.lock().unwrap().pop_front().unwrap_or(false)
    }
}

#[derive(Default)]
pub struct RecordingNotices {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotices {
    pub fn all(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }
}

#[async_trait]
impl NoticePort for RecordingNotices {
    async fn notify(&self, notice: &Notice) {
        self.notices.lock().unwrap().push(notice.clone());
    }
}

#[derive(Default)]
pub struct RecordingClipboard {
    pub written: Mutex<Vec<String>>,
}

#[async_trait]
impl ClipboardPort for RecordingClipboard {
    async fn write_text(&self, text: &str) -> anyhow::Result<()> {
        self.written.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

pub struct FixedClock(pub DateTime<Utc>);

impl ClockPort for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub fn snippet(title: &str, tags: &[&str]) -> Snippet {
    let mut s = Snippet::new(title, at(1_700_000_000));
    s.tags = tags.iter().map(|t| t.to_string()).collect();
    s.body = format!("body of {title}");
    s
}

pub struct Harness {
    pub controller: Arc<SessionController>,
    pub store: Arc<FakeStore>,
    pub confirm: Arc<ScriptedConfirm>,
    pub notices: Arc<RecordingNotices>,
    pub clipboard: Arc<RecordingClipboard>,
}

pub fn harness(snippets: Vec<Snippet>, policy: ImmediateFailurePolicy) -> Harness {
    let store = FakeStore::with(snippets);
    let confirm = ScriptedConfirm::answering(&[]);
    let notices = Arc::new(RecordingNotices::default());
    let clipboard = Arc::new(RecordingClipboard::default());
    let controller = Arc::new(SessionController::new(
        store.clone(),
        clipboard.clone(),
        confirm.clone(),
        notices.clone(),
        Arc::new(FixedClock(at(1_800_000_000))),
        policy,
    ));
    Harness {
        controller,
        store,
        confirm,
        notices,
        clipboard,
    }
}
