//! Server flash messages and page data
//!
//! The server renders its one-time messages as a JSON attribute on the page.
//! [`MessageBridge`] turns each entry into a notification.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::notifications::{NotificationCenter, NotificationKind};
use crate::support::errors::InfraError;

/// Delay between page load and delivery of the initial messages
pub const DELIVERY_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashMessage {
    #[serde(default)]
    pub tags: String,
    pub message: String,
}

impl FlashMessage {
    pub fn kind(&self) -> NotificationKind {
        NotificationKind::from_tag(&self.tags)
    }
}

/// Free-form data handed from the server template to the page
#[derive(Debug, Clone, Default)]
pub struct PageData {
    values: Map<String, Value>,
}

impl PageData {
    pub fn parse(raw: &str) -> Result<Self, InfraError> {
        let values = match serde_json::from_str::<Value>(raw)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(InfraError::Serialization(serde::de::Error::custom(format!(
                    "page data must be an object, got {}",
                    other
                ))))
            }
        };
        Ok(Self { values })
    }

    /// Value under `key`; missing and falsy values (`null`, `false`, `0`, `""`) yield `default`.
    pub fn get(&self, key: &str, default: Value) -> Value {
        match self.values.get(key) {
            Some(value) if is_truthy(value) => value.clone(),
            _ => default,
        }
    }

    /// Entries of the `messages` key, when it is an array of messages
    pub fn messages(&self) -> Vec<FlashMessage> {
        match self.values.get("messages") {
            Some(value @ Value::Array(_)) => serde_json::from_value(value.clone()).unwrap_or_else(|e| {
                error!(error = %e, "Malformed messages in page data");
                Vec::new()
            }),
            _ => Vec::new(),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Clone)]
pub struct MessageBridge {
    notifications: NotificationCenter,
}

impl MessageBridge {
    pub fn new(notifications: NotificationCenter) -> Self {
        Self { notifications }
    }

    /// Show each message with its kind's default duration. Returns how many were shown.
    pub fn show(&self, messages: &[FlashMessage]) -> usize {
        for msg in messages {
            self.notifications.show(msg.message.clone(), msg.kind(), None);
        }
        messages.len()
    }

    /// Initialise from page data, delivering its `messages` right away.
    pub fn init(&self, data: &PageData) -> usize {
        self.show(&data.messages())
    }

    /// Parse the raw `data-messages` attribute and deliver it.
    ///
    /// Malformed JSON is logged and nothing is shown.
    pub fn deliver(&self, raw: &str) -> usize {
        match serde_json::from_str::<Vec<FlashMessage>>(raw) {
            Ok(messages) => {
                debug!(count = messages.len(), "Delivering flash messages");
                self.show(&messages)
            }
            Err(e) => {
                error!(error = %e, "Error parsing flash messages");
                0
            }
        }
    }

    /// Same as [`deliver`](Self::deliver) after the page-load delay
    pub async fn deliver_deferred(&self, raw: &str) -> usize {
        tokio::time::sleep(DELIVERY_DELAY).await;
        self.deliver(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NotificationConfig;
    use serde_json::json;

    fn bridge() -> (MessageBridge, NotificationCenter) {
        let center = NotificationCenter::new(NotificationConfig::default());
        (MessageBridge::new(center.clone()), center)
    }

    #[tokio::test]
    async fn routes_by_tag_with_canonical_durations() {
        let (bridge, center) = bridge();
        let raw = r#"[
            {"tags": "success", "message": "Guardado"},
            {"tags": "error", "message": "Falló"},
            {"tags": "warning", "message": "Cuidado"},
            {"tags": "debug", "message": "Otro"}
        ]"#;
        assert_eq!(bridge.deliver(raw), 4);

        let shown: Vec<_> = center
            .list()
            .into_iter()
            .map(|n| (n.kind, n.duration.as_millis()))
            .collect();
        assert_eq!(
            shown,
            vec![
                (NotificationKind::Success, 5000),
                (NotificationKind::Error, 7000),
                (NotificationKind::Warning, 6000),
                (NotificationKind::Info, 5000),
            ]
        );
    }

    #[tokio::test]
    async fn unlisted_tags_render_as_info() {
        let (bridge, center) = bridge();
        let raw = r#"[{"tags": "danger", "message": "a"}, {"tags": "Error", "message": "b"}]"#;
        assert_eq!(bridge.deliver(raw), 2);
        let kinds: Vec<_> = center.list().into_iter().map(|n| n.kind).collect();
        assert_eq!(kinds, vec![NotificationKind::Info, NotificationKind::Info]);
    }

    #[tokio::test]
    async fn malformed_or_empty_input_shows_nothing() {
        let (bridge, center) = bridge();
        assert_eq!(bridge.deliver("[{not json"), 0);
        assert_eq!(bridge.deliver("[]"), 0);
        assert!(center.list().is_empty());
        assert!(!center.has_container());
    }

    #[tokio::test(start_paused = true)]
    async fn deferred_delivery_waits_for_page_load() {
        let (bridge, center) = bridge();
        let task = {
            let bridge = bridge.clone();
            tokio::spawn(async move {
                bridge
                    .deliver_deferred(r#"[{"tags": "info", "message": "Bienvenido"}]"#)
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(center.list().is_empty());

        assert_eq!(task.await.unwrap(), 1);
        assert_eq!(center.list()[0].message, "Bienvenido");
    }

    #[tokio::test]
    async fn page_data_get_and_init() {
        let data = PageData::parse(
            r#"{"user": "admin", "count": 0, "flag": false,
                "messages": [{"tags": "success", "message": "Hola"}]}"#,
        )
        .unwrap();
        assert_eq!(data.get("user", Value::Null), json!("admin"));
        assert_eq!(data.get("count", json!(10)), json!(10));
        assert_eq!(data.get("flag", json!("x")), json!("x"));
        assert_eq!(data.get("missing", json!([])), json!([]));

        let (bridge, center) = bridge();
        assert_eq!(bridge.init(&data), 1);
        assert_eq!(center.list()[0].kind, NotificationKind::Success);
    }

    #[test]
    fn page_data_must_be_an_object() {
        assert!(PageData::parse("[1, 2]").is_err());
        assert!(PageData::parse("null").is_ok());
    }
}
