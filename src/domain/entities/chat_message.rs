use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn parse(role: &str) -> Self {
        match role {
            "user" => ChatRole::User,
            _ => ChatRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: content.to_string(),
        }
    }

    pub fn role(&self) -> ChatRole {
        ChatRole::parse(&self.role)
    }

    pub fn is_user(&self) -> bool {
        self.role() == ChatRole::User
    }
}

/// A conversation split into the turns preceding the latest user message and
/// that message. Turns after it are dropped so history stays in order.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    pub history: Vec<ChatMessage>,
    pub latest_user_message: ChatMessage,
}

impl Conversation {
    /// Returns `None` when the transcript holds no user message.
    pub fn from_messages(messages: &[ChatMessage]) -> Option<Self> {
        let latest = messages.iter().rposition(ChatMessage::is_user)?;

        let history = messages[..latest].to_vec();

        Some(Self {
            history,
            latest_user_message: messages[latest].clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!(ChatRole::parse("user"), ChatRole::User);
        assert_eq!(ChatRole::parse("assistant"), ChatRole::Assistant);
        assert_eq!(ChatRole::parse("model"), ChatRole::Assistant);
        assert_eq!(ChatRole::parse("system"), ChatRole::Assistant);
    }

    #[test]
    fn test_conversation_uses_most_recent_user_message() {
        let messages = vec![
            ChatMessage::new("user", "What is a mutual fund?"),
            ChatMessage::new("assistant", "A pooled investment."),
            ChatMessage::new("user", "Which AMCs are Shariah compliant?"),
        ];

        let conversation = Conversation::from_messages(&messages).unwrap();
        assert_eq!(
            conversation.latest_user_message.content,
            "Which AMCs are Shariah compliant?"
        );
        assert_eq!(conversation.history.len(), 2);
        assert_eq!(conversation.history[1].content, "A pooled investment.");
    }

    #[test]
    fn test_turns_after_latest_user_message_are_dropped() {
        let messages = vec![
            ChatMessage::new("user", "Is NSS profit taxable?"),
            ChatMessage::new("assistant", "Yes, withholding tax applies."),
        ];

        let conversation = Conversation::from_messages(&messages).unwrap();
        assert_eq!(conversation.latest_user_message.content, "Is NSS profit taxable?");
        assert!(conversation.history.is_empty());
    }

    #[test]
    fn test_conversation_requires_user_message() {
        let messages = vec![ChatMessage::new("assistant", "Hello")];
        assert!(Conversation::from_messages(&messages).is_none());
        assert!(Conversation::from_messages(&[]).is_none());
    }
}
