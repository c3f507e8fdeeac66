//! Headless host for the chat widget.
//!
//! This module provides a page that lives entirely in memory, so the widget
//! can be bound, driven, and inspected without a browser. Each rendered line
//! of markup counts as one row of fixed height when computing scroll height.

use std::collections::BTreeSet;

use crate::host::{ChatSurface, HostPage};

/// Height of one rendered line, in pixels.
pub const LINE_HEIGHT: u32 = 20;

/// In-memory page: a set of selectors that resolve to an element.
#[derive(Debug, Clone, Default)]
pub struct HeadlessPage {
    elements: BTreeSet<String>,
}

impl HeadlessPage {
    /// Page with no elements.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Page with the stock `form`, `textarea` and `.chat` elements.
    pub fn standard() -> Self {
        Self::empty()
            .with_element("form")
            .with_element("textarea")
            .with_element(".chat")
    }

    /// Add an element matched by `selector`.
    #[must_use]
    pub fn with_element(mut self, selector: impl Into<String>) -> Self {
        self.elements.insert(selector.into());
        self
    }

    /// Remove the element matched by `selector`.
    #[must_use]
    pub fn without_element(mut self, selector: &str) -> Self {
        self.elements.remove(selector);
        self
    }
}

impl HostPage for HeadlessPage {
    type Surface = HeadlessSurface;

    fn has_element(&self, selector: &str) -> bool {
        self.elements.contains(selector)
    }

    fn chat_surface(&self, selector: &str) -> Option<HeadlessSurface> {
        self.has_element(selector).then(HeadlessSurface::default)
    }
}

/// In-memory chat container.
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    content: String,
    scroll_top: u32,
    replacements: usize,
}

impl HeadlessSurface {
    /// Current markup inside the container.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Last scroll position requested.
    pub fn scroll_top(&self) -> u32 {
        self.scroll_top
    }

    /// How many times the content was replaced.
    pub fn replacements(&self) -> usize {
        self.replacements
    }
}

impl ChatSurface for HeadlessSurface {
    fn replace_content(&mut self, markup: &str) {
        markup.clone_into(&mut self.content);
        self.replacements += 1;
    }

    fn scroll_height(&self) -> u32 {
        let lines = u32::try_from(self.content.lines().count()).unwrap_or(u32::MAX);
        lines.saturating_mul(LINE_HEIGHT)
    }

    fn scroll_to(&mut self, top: u32) {
        self.scroll_top = top;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_page_has_stock_elements() {
        let page = HeadlessPage::standard();
        assert!(page.has_element("form"));
        assert!(page.has_element("textarea"));
        assert!(page.has_element(".chat"));
        assert!(!page.has_element("#other"));
    }

    #[test]
    fn test_without_element() {
        let page = HeadlessPage::standard().without_element("textarea");
        assert!(!page.has_element("textarea"));
        assert!(page.chat_surface(".chat").is_some());
        assert!(page.chat_surface("textarea").is_none());
    }

    #[test]
    fn test_surface_tracks_content_and_height() {
        let mut surface = HeadlessSurface::default();
        assert_eq!(surface.scroll_height(), 0);
        assert_eq!(surface.replacements(), 0);

        surface.replace_content("<div>a</div>\n<div>b</div>");
        assert_eq!(surface.content(), "<div>a</div>\n<div>b</div>");
        assert_eq!(surface.scroll_height(), 2 * LINE_HEIGHT);
        assert_eq!(surface.replacements(), 1);

        surface.scroll_to(40);
        assert_eq!(surface.scroll_top(), 40);
    }
}
