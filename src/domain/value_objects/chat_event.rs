use serde::Serialize;

/// One line of the newline-delimited JSON chat stream.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "kebab-case")]
pub enum ChatStreamEvent {
    UserMessageId(String),
    Text(String),
    Error(String),
}

impl ChatStreamEvent {
    pub fn to_ndjson_line(&self) -> String {
        let mut line = serde_json::to_string(self).unwrap_or_else(|_| {
            r#"{"type":"error","content":"Failed to encode stream event"}"#.to_string()
        });
        line.push('\n');
        line
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ChatStreamEvent::Error(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_wire_format() {
        assert_eq!(
            ChatStreamEvent::UserMessageId("42".to_string()).to_ndjson_line(),
            "{\"type\":\"user-message-id\",\"content\":\"42\"}\n"
        );
        assert_eq!(
            ChatStreamEvent::Text("Hi".to_string()).to_ndjson_line(),
            "{\"type\":\"text\",\"content\":\"Hi\"}\n"
        );
        assert_eq!(
            ChatStreamEvent::Error("boom".to_string()).to_ndjson_line(),
            "{\"type\":\"error\",\"content\":\"boom\"}\n"
        );
    }

    #[test]
    fn test_text_is_escaped_on_one_line() {
        let line = ChatStreamEvent::Text("a\nb \"c\"".to_string()).to_ndjson_line();
        assert_eq!(line.matches('\n').count(), 1);
        assert!(line.ends_with('\n'));
    }
}
