//! chatpane-engine: Headless controller for the chatpane chat widget
//!
//! This crate provides everything the widget does that does not touch a real
//! browser, including:
//! - Chat fragments, the conversation log, and pending input
//! - `HH:MM` timestamps and clocks
//! - Escaped HTML rendering of the log
//! - The controller and the host traits it is bound through
//! - An in-memory host for tests and embedding

pub mod config;
pub mod event;
pub mod fragment;
pub mod headless;
pub mod host;
pub mod markup;
pub mod timestamp;
pub mod widget;

// Re-export commonly used types
pub use config::{BotReply, ConfigError, WidgetConfig};
pub use event::{EventOutcome, WidgetEvent};
pub use fragment::{ConversationLog, MessageFragment, PendingInput, Speaker};
pub use headless::{HeadlessPage, HeadlessSurface};
pub use host::{ChatSurface, ElementRole, HostPage};
pub use markup::{render_fragment, render_log};
pub use timestamp::{Clock, FixedClock, ParseTimestampError, SystemClock, Timestamp};
pub use widget::{ChatWidget, WidgetError};

/// Returns the engine version.
pub fn engine_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
