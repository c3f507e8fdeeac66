//! Chat fragments and the conversation log.
//!
//! A fragment is one chat bubble. The log is the ordered, append-only list of
//! fragments shown during a session; it lives as long as the widget that owns
//! it and is never persisted.

use crate::timestamp::Timestamp;

/// Who a fragment is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    /// Text typed into the widget.
    User,
    /// The reply shown under each user message.
    Bot,
}

impl Speaker {
    /// Lowercase name, also used as the CSS class of the bubble.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Bot => "bot",
        }
    }
}

impl std::fmt::Display for Speaker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single chat bubble.
///
/// `content` holds the raw text as typed. Escaping happens at render time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFragment {
    /// Who the bubble is attributed to.
    pub speaker: Speaker,
    /// Raw message text.
    pub content: String,
    /// Wall-clock time of the submission that produced the bubble.
    pub timestamp: Timestamp,
}

impl MessageFragment {
    /// Create a new user fragment.
    pub fn user(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            speaker: Speaker::User,
            content: content.into(),
            timestamp,
        }
    }

    /// Create a new bot fragment.
    pub fn bot(content: impl Into<String>, timestamp: Timestamp) -> Self {
        Self {
            speaker: Speaker::Bot,
            content: content.into(),
            timestamp,
        }
    }

    /// Whether the bubble carries a redact button.
    ///
    /// User bubbles always do, bot bubbles never do. The button is inert.
    pub fn has_redact_control(&self) -> bool {
        self.speaker == Speaker::User
    }
}

/// Ordered, append-only list of fragments. Insertion order is display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationLog {
    fragments: Vec<MessageFragment>,
}

impl ConversationLog {
    /// Create a new empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fragment at the end.
    pub fn push(&mut self, fragment: MessageFragment) {
        self.fragments.push(fragment);
    }

    /// Number of fragments.
    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// All fragments in display order.
    pub fn fragments(&self) -> &[MessageFragment] {
        &self.fragments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MessageFragment> {
        self.fragments.iter()
    }
}

impl<'a> IntoIterator for &'a ConversationLog {
    type Item = &'a MessageFragment;
    type IntoIter = std::slice::Iter<'a, MessageFragment>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Text the widget keeps from the last input change.
///
/// Replaced verbatim on every change and read, not cleared, on submit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingInput {
    value: String,
}

impl PendingInput {
    /// Replace the stored value.
    pub fn set(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// Current value.
    pub fn as_str(&self) -> &str {
        &self.value
    }
}
