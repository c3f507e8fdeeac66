//! Events the widget reacts to.

/// DOM events forwarded to the widget by its host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The text input's value changed. Carries the new value.
    InputChanged(String),
    /// The form was submitted.
    Submit,
}

/// What the host should do with the event after the widget handled it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Let the event continue as usual.
    Continue,
    /// Cancel the browser's default action.
    PreventDefault,
}

impl EventOutcome {
    pub fn prevents_default(self) -> bool {
        self == Self::PreventDefault
    }
}
