//! HTML rendering for the conversation log.
//!
//! Markup is built as a small element tree and serialized in one place, so
//! every piece of text and every attribute value goes through [`escape_into`].
//! Message content is user-typed and must never reach the page unescaped.

use std::fmt::Write;

use crate::fragment::{ConversationLog, MessageFragment};

/// A minimal HTML element: tag, class list, optional text, children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: &'static str,
    classes: Vec<String>,
    text: Option<String>,
    children: Vec<Element>,
}

impl Element {
    /// Create an empty element.
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            classes: Vec::new(),
            text: None,
            children: Vec::new(),
        }
    }

    /// Add a class.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the text content. Rendered before any children.
    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(child);
        self
    }

    /// Serialize into `out`.
    pub fn write_to(&self, out: &mut String) {
        let _ = write!(out, "<{}", self.tag);
        if !self.classes.is_empty() {
            out.push_str(" class=\"");
            escape_into(&self.classes.join(" "), out);
            out.push('"');
        }
        out.push('>');

        if let Some(text) = &self.text {
            escape_into(text, out);
        }
        for child in &self.children {
            child.write_to(out);
        }

        let _ = write!(out, "</{}>", self.tag);
    }

    /// Serialize to a new string.
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }
}

/// Append `text` to `out` with the five HTML-significant characters escaped.
pub fn escape_into(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}

/// Escape `text` into a new string.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    escape_into(text, &mut out);
    out
}

/// Build the element tree for one chat bubble.
///
/// ```text
/// div.message.<speaker>
/// ├── div                      content
/// ├── div.timestamp.<speaker>  HH:MM
/// └── button.redact.user       user bubbles only
/// ```
pub fn fragment_element(fragment: &MessageFragment) -> Element {
    let speaker = fragment.speaker.as_str();

    let mut bubble = Element::new("div")
        .class("message")
        .class(speaker)
        .child(Element::new("div").text(fragment.content.as_str()))
        .child(
            Element::new("div")
                .class("timestamp")
                .class(speaker)
                .text(fragment.timestamp.to_string()),
        );

    if fragment.has_redact_control() {
        bubble = bubble.child(Element::new("button").class("redact").class(speaker));
    }

    bubble
}

/// Render one chat bubble.
pub fn render_fragment(fragment: &MessageFragment) -> String {
    fragment_element(fragment).render()
}

/// Render the whole log, one bubble per line, in display order.
pub fn render_log(log: &ConversationLog) -> String {
    let mut out = String::new();
    for (i, fragment) in log.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        fragment_element(fragment).write_to(&mut out);
    }
    out
}
