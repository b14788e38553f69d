mod clipboard;
mod terminal;

pub use clipboard::ArboardClipboard;
pub use terminal::TerminalPrompt;
