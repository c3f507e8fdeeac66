//! The chat widget controller.
//!
//! A widget is bound to a host page once, then driven by two events: input
//! changes and form submissions. Handlers run synchronously to completion and
//! are never reentered; all state belongs to the widget instance.

use thiserror::Error;
use tracing::{debug, info, trace, warn};

use crate::config::WidgetConfig;
use crate::event::{EventOutcome, WidgetEvent};
use crate::fragment::{ConversationLog, MessageFragment, PendingInput};
use crate::host::{ChatSurface, ElementRole, HostPage};
use crate::markup::render_log;
use crate::timestamp::Clock;

/// Errors raised while binding a widget to its page.
#[derive(Debug, Error)]
pub enum WidgetError {
    #[error("no {element} element matches selector {selector:?}")]
    MissingElement {
        element: ElementRole,
        selector: String,
    },
}

/// Chat widget bound to one page.
#[derive(Debug)]
pub struct ChatWidget<S, C> {
    config: WidgetConfig,
    surface: S,
    clock: C,
    pending: PendingInput,
    log: ConversationLog,
}

impl<S: ChatSurface, C: Clock> ChatWidget<S, C> {
    /// Resolve the form, text input, and chat container on `page`.
    ///
    /// Fails on the first missing element, checked in that order.
    pub fn bind<H>(page: &H, config: WidgetConfig, clock: C) -> Result<Self, WidgetError>
    where
        H: HostPage<Surface = S>,
    {
        for role in [ElementRole::Form, ElementRole::TextInput] {
            let selector = config.selector_for(role);
            if !page.has_element(selector) {
                return Err(missing(role, selector));
            }
        }

        let surface = page
            .chat_surface(&config.chat_selector)
            .ok_or_else(|| missing(ElementRole::ChatContainer, &config.chat_selector))?;

        info!(
            form = %config.form_selector,
            input = %config.input_selector,
            chat = %config.chat_selector,
            "chat widget bound"
        );

        Ok(Self {
            config,
            surface,
            clock,
            pending: PendingInput::default(),
            log: ConversationLog::new(),
        })
    }

    /// Route an event to its handler.
    pub fn handle(&mut self, event: WidgetEvent) -> EventOutcome {
        match event {
            WidgetEvent::InputChanged(value) => self.on_input_change(value),
            WidgetEvent::Submit => self.on_submit(),
        }
    }

    /// Store the text input's new value verbatim.
    pub fn on_input_change(&mut self, value: impl Into<String>) -> EventOutcome {
        self.pending.set(value);
        trace!(len = self.pending.as_str().len(), "pending input updated");
        EventOutcome::Continue
    }

    /// Append the user and bot bubbles, re-render, and scroll to the bottom.
    ///
    /// Empty input is not rejected: it produces two empty bubbles. Pending
    /// input is not cleared, so submitting again repeats the same text.
    pub fn on_submit(&mut self) -> EventOutcome {
        let timestamp = self.clock.now();
        let text = self.pending.as_str();
        let reply = self.config.bot_reply.reply_to(text);

        self.log.push(MessageFragment::user(text, timestamp));
        self.log.push(MessageFragment::bot(reply, timestamp));

        self.surface.replace_content(&render_log(&self.log));
        let bottom = self.surface.scroll_height();
        self.surface.scroll_to(bottom);

        debug!(
            %timestamp,
            log_len = self.log.len(),
            content_len = text.len(),
            "message submitted"
        );

        EventOutcome::PreventDefault
    }
}

impl<S, C> ChatWidget<S, C> {
    /// Conversation so far.
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// Text that the next submission will post.
    pub fn pending_input(&self) -> &str {
        self.pending.as_str()
    }

    pub fn config(&self) -> &WidgetConfig {
        &self.config
    }

    /// The chat container the widget renders into.
    pub fn surface(&self) -> &S {
        &self.surface
    }
}

fn missing(element: ElementRole, selector: &str) -> WidgetError {
    warn!(%element, selector, "required element missing");
    WidgetError::MissingElement {
        element,
        selector: selector.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fragment::Speaker;
    use crate::headless::{HeadlessPage, HeadlessSurface};
    use crate::timestamp::{FixedClock, Timestamp};
    use insta::assert_snapshot;
    use std::cell::Cell;

    type TestWidget = ChatWidget<HeadlessSurface, FixedClock>;

    fn clock_at(hour: u32, minute: u32) -> FixedClock {
        FixedClock(Timestamp::new(hour, minute).unwrap())
    }

    fn bind_at(hour: u32, minute: u32) -> TestWidget {
        ChatWidget::bind(
            &HeadlessPage::standard(),
            WidgetConfig::default(),
            clock_at(hour, minute),
        )
        .unwrap()
    }

    #[test]
    fn test_bind_starts_empty() {
        let widget = bind_at(12, 0);
        assert!(widget.log().is_empty());
        assert_eq!(widget.pending_input(), "");
        assert_eq!(widget.surface().replacements(), 0);
    }

    #[test]
    fn test_bind_fails_without_form() {
        let page = HeadlessPage::standard().without_element("form");
        let err = TestWidget::bind(&page, WidgetConfig::default(), clock_at(0, 0)).unwrap_err();

        let WidgetError::MissingElement { element, selector } = &err;
        assert_eq!(*element, ElementRole::Form);
        assert_eq!(selector, "form");
        assert_eq!(err.to_string(), "no form element matches selector \"form\"");
    }

    #[test]
    fn test_bind_fails_without_textarea() {
        let page = HeadlessPage::standard().without_element("textarea");
        let err = TestWidget::bind(&page, WidgetConfig::default(), clock_at(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            WidgetError::MissingElement {
                element: ElementRole::TextInput,
                ..
            }
        ));
    }

    #[test]
    fn test_bind_fails_without_chat_container() {
        let page = HeadlessPage::standard().without_element(".chat");
        let err = TestWidget::bind(&page, WidgetConfig::default(), clock_at(0, 0)).unwrap_err();
        assert!(matches!(
            err,
            WidgetError::MissingElement {
                element: ElementRole::ChatContainer,
                ..
            }
        ));
    }

    #[test]
    fn test_bind_reports_first_missing_element() {
        let err = TestWidget::bind(&HeadlessPage::empty(), WidgetConfig::default(), clock_at(0, 0))
            .unwrap_err();
        assert!(matches!(
            err,
            WidgetError::MissingElement {
                element: ElementRole::Form,
                ..
            }
        ));
    }

    #[test]
    fn test_bind_uses_configured_selectors() {
        let page = HeadlessPage::empty()
            .with_element("#composer")
            .with_element("#message")
            .with_element("#log");
        let config = WidgetConfig {
            form_selector: "#composer".into(),
            input_selector: "#message".into(),
            chat_selector: "#log".into(),
            ..Default::default()
        };

        assert!(TestWidget::bind(&page, config, clock_at(0, 0)).is_ok());
        assert!(TestWidget::bind(&page, WidgetConfig::default(), clock_at(0, 0)).is_err());
    }

    #[test]
    fn test_input_change_stores_value_verbatim() {
        let mut widget = bind_at(12, 0);

        let outcome = widget.on_input_change("  padded\n");
        assert_eq!(outcome, EventOutcome::Continue);
        assert_eq!(widget.pending_input(), "  padded\n");

        widget.on_input_change("");
        assert_eq!(widget.pending_input(), "");
    }

    #[test]
    fn test_reading_pending_input_does_not_change_it() {
        let mut widget = bind_at(12, 0);
        widget.on_input_change("draft");

        assert_eq!(widget.pending_input(), "draft");
        assert_eq!(widget.pending_input(), "draft");
        widget.on_submit();
        assert_eq!(widget.pending_input(), "draft");
    }

    #[test]
    fn test_submit_appends_user_and_bot() {
        let mut widget = bind_at(14, 30);
        widget.on_input_change("hello");

        let outcome = widget.on_submit();
        assert!(outcome.prevents_default());

        let fragments = widget.log().fragments();
        assert_eq!(fragments.len(), 2);

        assert_eq!(fragments[0].speaker, Speaker::User);
        assert_eq!(fragments[0].content, "hello");
        assert_eq!(fragments[0].timestamp.to_string(), "14:30");
        assert!(fragments[0].has_redact_control());

        assert_eq!(fragments[1].speaker, Speaker::Bot);
        assert_eq!(fragments[1].content, "hello");
        assert_eq!(fragments[1].timestamp.to_string(), "14:30");
        assert!(!fragments[1].has_redact_control());
    }

    #[test]
    fn test_end_to_end_markup() {
        let mut widget = bind_at(14, 30);
        widget.handle(WidgetEvent::InputChanged("hello".into()));
        widget.handle(WidgetEvent::Submit);

        assert_snapshot!(widget.surface().content(), @r#"
        <div class="message user"><div>hello</div><div class="timestamp user">14:30</div><button class="redact user"></button></div>
        <div class="message bot"><div>hello</div><div class="timestamp bot">14:30</div></div>
        "#);
    }

    #[test]
    fn test_each_submit_grows_log_by_two() {
        let mut widget = bind_at(9, 5);

        for expected in [2, 4, 6] {
            widget.on_input_change("again");
            widget.on_submit();
            assert_eq!(widget.log().len(), expected);
        }
        assert_eq!(widget.surface().replacements(), 3);
    }

    #[test]
    fn test_repeated_submit_without_change_repeats_text() {
        let mut widget = bind_at(9, 5);
        widget.on_input_change("same");
        widget.on_submit();
        widget.on_submit();

        assert_eq!(widget.log().len(), 4);
        assert!(widget.log().iter().all(|f| f.content == "same"));
    }

    #[test]
    fn test_empty_submit_still_appends() {
        // Current behavior: no guard against empty submissions.
        let mut widget = bind_at(0, 0);
        widget.on_submit();

        let fragments = widget.log().fragments();
        assert_eq!(fragments.len(), 2);
        assert!(fragments.iter().all(|f| f.content.is_empty()));
        assert!(fragments.iter().all(|f| f.timestamp.to_string() == "00:00"));
    }

    #[test]
    fn test_submit_scrolls_to_bottom() {
        let mut widget = bind_at(8, 15);

        for _ in 0..3 {
            widget.on_input_change("line");
            widget.on_submit();
            let surface = widget.surface();
            assert!(surface.scroll_height() > 0);
            assert_eq!(surface.scroll_top(), surface.scroll_height());
        }
    }

    #[test]
    fn test_rerender_replaces_whole_content() {
        let mut widget = bind_at(10, 0);
        widget.on_input_change("first");
        widget.on_submit();
        widget.on_input_change("second");
        widget.on_submit();

        let content = widget.surface().content();
        assert_eq!(content.lines().count(), 4);
        let first = content.find("first").unwrap();
        let second = content.find("second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_user_and_bot_share_one_clock_reading() {
        let minute = Cell::new(0);
        let clock = || {
            let ts = Timestamp::new(11, minute.get()).unwrap();
            minute.set(minute.get() + 1);
            ts
        };
        let mut widget = ChatWidget::bind(&HeadlessPage::standard(), WidgetConfig::default(), clock)
            .unwrap();

        widget.on_submit();
        widget.on_submit();

        let stamps: Vec<String> = widget
            .log()
            .iter()
            .map(|f| f.timestamp.to_string())
            .collect();
        assert_eq!(stamps, vec!["11:00", "11:00", "11:01", "11:01"]);
    }

    #[test]
    fn test_user_text_is_escaped_in_container() {
        let mut widget = bind_at(13, 0);
        widget.on_input_change("<img src=x onerror=alert(1)>");
        widget.on_submit();

        let content = widget.surface().content();
        assert!(!content.contains("<img"));
        assert!(content.contains("&lt;img src=x onerror=alert(1)&gt;"));
        // The log keeps the raw text.
        assert_eq!(widget.log().fragments()[0].content, "<img src=x onerror=alert(1)>");
    }

    #[test]
    fn test_widgets_are_independent() {
        let page = HeadlessPage::standard();
        let mut a = TestWidget::bind(&page, WidgetConfig::default(), clock_at(1, 0)).unwrap();
        let mut b = TestWidget::bind(&page, WidgetConfig::default(), clock_at(2, 0)).unwrap();

        a.on_input_change("for a");
        a.on_submit();

        assert_eq!(a.log().len(), 2);
        assert!(b.log().is_empty());
        assert_eq!(b.pending_input(), "");

        b.on_submit();
        assert_eq!(b.log().fragments()[0].timestamp.to_string(), "02:00");
        assert_eq!(a.log().len(), 2);
    }
}
