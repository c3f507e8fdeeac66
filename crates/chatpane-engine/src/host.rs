//! Traits the widget uses to reach the page it is hosted in.
//!
//! The browser binding implements these over `web-sys`; the headless host in
//! [`crate::headless`] implements them in memory.

/// The chat container, as seen by the widget.
pub trait ChatSurface {
    /// Replace everything inside the container with `markup`.
    fn replace_content(&mut self, markup: &str);

    /// Full scrollable height of the container, in pixels.
    fn scroll_height(&self) -> u32;

    /// Scroll the container so `top` is the first visible pixel row.
    fn scroll_to(&mut self, top: u32);
}

/// The page the widget is bound to.
pub trait HostPage {
    type Surface: ChatSurface;

    /// Whether some element matches `selector`.
    fn has_element(&self, selector: &str) -> bool;

    /// The first element matching `selector`, as a chat surface.
    fn chat_surface(&self, selector: &str) -> Option<Self::Surface>;
}

/// The three page elements a widget needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRole {
    /// Submission source.
    Form,
    /// Text input source.
    TextInput,
    /// Render target.
    ChatContainer,
}

impl std::fmt::Display for ElementRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Form => write!(f, "form"),
            Self::TextInput => write!(f, "text input"),
            Self::ChatContainer => write!(f, "chat container"),
        }
    }
}
