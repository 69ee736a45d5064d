//! Helpers shared by unit tests

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;

use crate::application::ports::{DialogChoice, Dialogs, FailureDialog};

/// Serve `router` on an ephemeral local port and return its base URL
pub async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("test server");
    });
    format!("http://{}", addr)
}

/// Scripted operator answers, recording every prompt it was shown
#[derive(Clone, Default)]
pub struct ScriptedDialogs {
    pub confirm_answer: Arc<Mutex<Option<bool>>>,
    pub prompt_answer: Arc<Mutex<Option<String>>>,
    pub failure_answer: Arc<Mutex<Option<DialogChoice>>>,
    pub shown: Arc<Mutex<Vec<String>>>,
}

impl ScriptedDialogs {
    pub fn confirming() -> Self {
        let dialogs = Self::default();
        *dialogs.confirm_answer.lock().unwrap() = Some(true);
        dialogs
    }

    pub fn declining() -> Self {
        let dialogs = Self::default();
        *dialogs.confirm_answer.lock().unwrap() = Some(false);
        dialogs
    }

    pub fn with_prompt(self, answer: Option<&str>) -> Self {
        *self.prompt_answer.lock().unwrap() = answer.map(String::from);
        self
    }

    pub fn with_failure_choice(self, choice: DialogChoice) -> Self {
        *self.failure_answer.lock().unwrap() = Some(choice);
        self
    }

    pub fn shown(&self) -> Vec<String> {
        self.shown.lock().unwrap().clone()
    }
}

#[async_trait]
impl Dialogs for ScriptedDialogs {
    async fn confirm(&self, title: &str, text: &str) -> bool {
        self.shown.lock().unwrap().push(format!("confirm: {} | {}", title, text));
        self.confirm_answer.lock().unwrap().unwrap_or(true)
    }

    async fn prompt(&self, title: &str, _placeholder: &str) -> Option<String> {
        self.shown.lock().unwrap().push(format!("prompt: {}", title));
        self.prompt_answer.lock().unwrap().clone()
    }

    async fn alert(&self, title: &str, text: &str) {
        self.shown.lock().unwrap().push(format!("alert: {} | {}", title, text));
    }

    async fn failure(&self, dialog: &FailureDialog) -> DialogChoice {
        self.shown.lock().unwrap().push(format!("failure: {}", dialog.title));
        self.failure_answer
            .lock()
            .unwrap()
            .unwrap_or(DialogChoice::Dismissed)
    }
}
