//! Terminal confirmation and notices.

use std::io::{BufRead, Write};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::task::spawn_blocking;
use tracing::warn;

use sd_core::ports::{ConfirmPrompt, ConfirmationPort, Notice, NoticeLevel, NoticePort};

type Input = Box<dyn BufRead + Send>;
type Output = Box<dyn Write + Send>;

/// Asks `[y/N]` questions on a line reader and prints notices to a writer.
///
/// Stdin and stderr by default. Anything other than `y`/`yes` (including EOF
/// and read errors) is a "no".
#[derive(Clone)]
pub struct TerminalPrompt {
    input: Arc<Mutex<Input>>,
    output: Arc<Mutex<Output>>,
}

impl TerminalPrompt {
    pub fn stdio() -> Self {
        Self::new(
            Box::new(std::io::BufReader::new(std::io::stdin())),
            Box::new(std::io::stderr()),
        )
    }

    pub fn new(input: Input, output: Output) -> Self {
        Self {
            input: Arc::new(Mutex::new(input)),
            output: Arc::new(Mutex::new(output)),
        }
    }

    /// Reads one line, `None` on EOF or error.
    pub async fn read_line(&self) -> Option<String> {
        let input = self.input.clone();
        spawn_blocking(move || {
            let mut guard = input.lock().ok()?;
            let mut line = String::new();
            match guard.read_line(&mut line) {
                Ok(0) => None,
                Ok(_) => Some(line.trim_end_matches(['\n', '\r']).to_string()),
                Err(err) => {
                    warn!(error = %err, "failed to read terminal input");
                    None
                }
            }
        })
        .await
        .ok()
        .flatten()
    }

    fn write(&self, text: &str) {
        if let Ok(mut out) = self.output.lock() {
            let _ = out.write_all(text.as_bytes());
            let _ = out.flush();
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl ConfirmationPort for TerminalPrompt {
    async fn confirm(&self, prompt: &ConfirmPrompt) -> bool {
        self.write(&format!("{} [y/N] ", prompt.message()));
        match self.read_line().await {
            Some(answer) => is_yes(&answer),
            None => {
                self.write("\n");
                false
            }
        }
    }
}

#[async_trait]
impl NoticePort for TerminalPrompt {
    async fn notify(&self, notice: &Notice) {
        let prefix = match notice.level {
            NoticeLevel::Info => "",
            NoticeLevel::Failure => "error: ",
        };
        self.write(&format!("{prefix}{}\n", notice.message));
    }
}
