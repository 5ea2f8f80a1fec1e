//! Customer ↔ consultant chat threads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{ConversationId, MessageId, UserId};

/// A conversation between one customer and one consultant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatConversation {
    pub id: ConversationId,
    pub customer_id: UserId,
    #[serde(default)]
    pub consultant_id: Option<UserId>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender_id: UserId,
    pub content: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub is_read: bool,
}

impl ChatConversation {
    /// Open an unassigned conversation for a customer.
    #[must_use]
    pub fn open(id: ConversationId, customer_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            id,
            customer_id,
            consultant_id: None,
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `user` is one of the two parties.
    #[must_use]
    pub fn is_participant(&self, user: UserId) -> bool {
        self.customer_id == user || self.consultant_id == Some(user)
    }

    /// Append a message.
    pub fn post(&mut self, id: MessageId, sender_id: UserId, content: impl Into<String>) {
        let now = Utc::now();
        self.updated_at = now;
        self.messages.push(ChatMessage {
            id,
            conversation_id: self.id,
            sender_id,
            content: content.into(),
            sent_at: now,
            is_read: false,
        });
    }

    /// Mark every message not sent by `reader` as read; returns how many changed.
    pub fn mark_read_by(&mut self, reader: UserId) -> usize {
        let mut changed = 0;
        for message in &mut self.messages {
            if message.sender_id != reader && !message.is_read {
                message.is_read = true;
                changed += 1;
            }
        }
        changed
    }

    /// Messages `reader` has not seen yet.
    #[must_use]
    pub fn unread_for(&self, reader: UserId) -> usize {
        self.messages
            .iter()
            .filter(|m| m.sender_id != reader && !m.is_read)
            .count()
    }
}
