//! Host traits implemented over the live DOM.

use chatpane_engine::{ChatSurface, ElementRole, HostPage, WidgetError};
use web_sys::{Document, Element};

/// The document the widget is mounted into.
pub struct DomPage {
    document: Document,
}

impl DomPage {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    /// First element matching `selector`. Invalid selectors match nothing.
    pub fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    /// Like [`query`](Self::query), but a miss is a bind error for `role`.
    pub fn require(&self, role: ElementRole, selector: &str) -> Result<Element, WidgetError> {
        self.query(selector)
            .ok_or_else(|| WidgetError::MissingElement {
                element: role,
                selector: selector.to_string(),
            })
    }
}

impl HostPage for DomPage {
    type Surface = DomChatSurface;

    fn has_element(&self, selector: &str) -> bool {
        self.query(selector).is_some()
    }

    fn chat_surface(&self, selector: &str) -> Option<DomChatSurface> {
        self.query(selector).map(DomChatSurface)
    }
}

/// Chat container backed by a DOM element.
pub struct DomChatSurface(Element);

impl ChatSurface for DomChatSurface {
    fn replace_content(&mut self, markup: &str) {
        self.0.set_inner_html(markup);
    }

    fn scroll_height(&self) -> u32 {
        u32::try_from(self.0.scroll_height()).unwrap_or(0)
    }

    fn scroll_to(&mut self, top: u32) {
        self.0.scroll_to_with_x_and_y(0.0, f64::from(top));
    }
}
