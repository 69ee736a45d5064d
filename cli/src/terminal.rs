//! Dialogs answered on the terminal

use std::io::{self, Write};

use async_trait::async_trait;

use biblioteca_admin::application::ports::{DialogChoice, Dialogs, FailureDialog};
use biblioteca_admin::notifications::{EventMessage, NotificationEvent};

pub struct TerminalDialogs {
    assume_yes: bool,
    preset_reason: Option<String>,
}

impl TerminalDialogs {
    pub fn new(assume_yes: bool, preset_reason: Option<String>) -> Self {
        Self {
            assume_yes,
            preset_reason,
        }
    }
}

/// `None` on end of input
async fn read_line(question: String) -> Option<String> {
    tokio::task::spawn_blocking(move || {
        print!("{}", question);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    })
    .await
    .ok()
    .flatten()
}

fn is_yes(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}

#[async_trait]
impl Dialogs for TerminalDialogs {
    async fn confirm(&self, title: &str, text: &str) -> bool {
        if self.assume_yes {
            println!("? {}: {} [confirmado]", title, text);
            return true;
        }
        read_line(format!("? {}: {} [s/N] ", title, text))
            .await
            .is_some_and(|answer| is_yes(&answer))
    }

    async fn prompt(&self, title: &str, _placeholder: &str) -> Option<String> {
        if let Some(reason) = &self.preset_reason {
            return Some(reason.clone());
        }
        if self.assume_yes {
            return Some(String::new());
        }
        read_line(format!("? {} ", title)).await
    }

    async fn alert(&self, title: &str, text: &str) {
        if text.is_empty() {
            println!("! {}", title);
        } else {
            println!("! {}\n  {}", title, text.replace('\n', "\n  "));
        }
    }

    async fn failure(&self, dialog: &FailureDialog) -> DialogChoice {
        println!("✗ {}\n  {}", dialog.title, dialog.text);
        if self.assume_yes {
            return DialogChoice::Dismissed;
        }
        let mut options = format!("[c] {}", dialog.confirm_label);
        if let Some(deny) = &dialog.deny_label {
            options.push_str(&format!(" / [d] {}", deny));
        }
        match read_line(format!("  {} / Enter cerrar: ", options)).await.as_deref() {
            Some("c") => DialogChoice::Confirm,
            Some("d") if dialog.deny_label.is_some() => DialogChoice::Deny,
            _ => DialogChoice::Dismissed,
        }
    }
}

/// Print a banner when it is shown; later lifecycle events are silent.
pub fn print_event(message: &EventMessage) {
    if let NotificationEvent::Shown(shown) = &message.event {
        println!("[{}] {}", shown.kind, shown.message);
    }
}
