//! chatpane-web: Browser binding for the chatpane chat widget
//!
//! Binds a [`ChatWidget`] to the live page: `change` on the text input
//! updates pending input, `submit` on the form posts the message. Both
//! handlers run synchronously on the UI thread and borrow the widget only for
//! the duration of one event.

mod dom;
mod logging;

use std::cell::RefCell;
use std::rc::Rc;

use chatpane_engine::{
    ChatSurface, ChatWidget, Clock, ConfigError, ElementRole, EventOutcome, SystemClock,
    WidgetConfig, WidgetError, WidgetEvent,
};
use thiserror::Error;
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, HtmlTextAreaElement};

pub use dom::{DomChatSurface, DomPage};

type DomWidget = ChatWidget<DomChatSurface, SystemClock>;
type Listener = Closure<dyn FnMut(Event)>;

/// Errors raised while mounting a widget.
#[derive(Debug, Error)]
pub enum MountError {
    #[error("no document available")]
    NoDocument,

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Bind(#[from] WidgetError),

    #[error("element matching {0:?} is not a textarea")]
    NotATextArea(String),

    #[error("failed to attach {event} listener: {message}")]
    Listener {
        event: &'static str,
        message: String,
    },
}

impl From<MountError> for JsValue {
    fn from(err: MountError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// A widget mounted on the page. Dropping it removes both listeners.
#[wasm_bindgen]
pub struct MountedWidget {
    widget: Rc<RefCell<DomWidget>>,
    form: Element,
    input: HtmlTextAreaElement,
    on_change: Listener,
    on_submit: Listener,
}

#[wasm_bindgen]
impl MountedWidget {
    /// Number of bubbles in the conversation.
    pub fn len(&self) -> usize {
        self.widget.borrow().log().len()
    }

    #[wasm_bindgen(js_name = isEmpty)]
    pub fn is_empty(&self) -> bool {
        self.widget.borrow().log().is_empty()
    }
}

impl Drop for MountedWidget {
    fn drop(&mut self) {
        detach(&self.input, "change", &self.on_change);
        detach(&self.form, "submit", &self.on_submit);
    }
}

/// Mount a widget on the current document.
///
/// `config_json` is an optional JSON [`WidgetConfig`]; missing fields take
/// their defaults. Fails if any of the three elements is missing.
#[wasm_bindgen]
pub fn mount(config_json: Option<String>) -> Result<MountedWidget, JsValue> {
    Ok(mount_with(config_json.as_deref())?)
}

fn mount_with(config_json: Option<&str>) -> Result<MountedWidget, MountError> {
    let config = match config_json {
        Some(json) => WidgetConfig::from_json(json)?,
        None => WidgetConfig::default(),
    };

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(MountError::NoDocument)?;
    let page = DomPage::new(document);

    let widget = ChatWidget::bind(&page, config, SystemClock)?;

    let form_selector = widget.config().form_selector.clone();
    let input_selector = widget.config().input_selector.clone();
    let form = page.require(ElementRole::Form, &form_selector)?;
    let input = page
        .require(ElementRole::TextInput, &input_selector)?
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| MountError::NotATextArea(input_selector))?;

    let widget = Rc::new(RefCell::new(widget));

    let on_change = {
        let widget = Rc::clone(&widget);
        let input = input.clone();
        Listener::new(move |_event: Event| {
            dispatch(&widget, WidgetEvent::InputChanged(input.value()));
        })
    };

    let on_submit = {
        let widget = Rc::clone(&widget);
        Listener::new(move |event: Event| {
            if should_prevent_default(dispatch(&widget, WidgetEvent::Submit)) {
                event.prevent_default();
            }
        })
    };

    attach(&input, "change", &on_change)?;
    // on_change is dropped on an early return and must not stay registered.
    or_undo(attach(&form, "submit", &on_submit), || {
        detach(&input, "change", &on_change);
    })?;

    info!(form = %form_selector, "chat widget mounted");

    Ok(MountedWidget {
        widget,
        form,
        input,
        on_change,
        on_submit,
    })
}

fn attach(
    target: &web_sys::EventTarget,
    event: &'static str,
    listener: &Listener,
) -> Result<(), MountError> {
    target
        .add_event_listener_with_callback(event, listener.as_ref().unchecked_ref())
        .map_err(|err| MountError::Listener {
            event,
            message: format!("{err:?}"),
        })
}

fn detach(target: &web_sys::EventTarget, event: &str, listener: &Listener) {
    let _ = target.remove_event_listener_with_callback(event, listener.as_ref().unchecked_ref());
}

/// Pass `result` through, running `undo` first if it is an error.
fn or_undo<E>(result: Result<(), E>, undo: impl FnOnce()) -> Result<(), E> {
    if result.is_err() {
        undo();
    }
    result
}

/// Run one event through the widget. `None` if the widget is already busy.
fn dispatch<S, C>(widget: &RefCell<ChatWidget<S, C>>, event: WidgetEvent) -> Option<EventOutcome>
where
    S: ChatSurface,
    C: Clock,
{
    match widget.try_borrow_mut() {
        Ok(mut widget) => Some(widget.handle(event)),
        Err(_) => {
            warn!(?event, "widget busy, event dropped");
            None
        }
    }
}

/// Whether a submit must be default-prevented. A submit the widget could not
/// handle is still cancelled, so no request is ever sent.
fn should_prevent_default(outcome: Option<EventOutcome>) -> bool {
    !matches!(outcome, Some(EventOutcome::Continue))
}

/// Module entry point: install console logging and mount a default widget
/// once the DOM is ready. A failed mount is thrown as a JS exception.
#[cfg(feature = "autostart")]
#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    logging::init(logging::DEFAULT_LEVEL);

    let document = web_sys::window()
        .and_then(|window| window.document())
        .ok_or(MountError::NoDocument)?;

    if document.ready_state() != "loading" {
        return mount_for_page_lifetime();
    }

    let on_ready = Closure::<dyn FnMut()>::new(|| {
        if let Err(err) = mount_for_page_lifetime() {
            wasm_bindgen::throw_val(err);
        }
    });
    document
        .add_event_listener_with_callback("DOMContentLoaded", on_ready.as_ref().unchecked_ref())?;
    // Fires once and lives as long as the page.
    on_ready.forget();

    Ok(())
}

#[cfg(feature = "autostart")]
fn mount_for_page_lifetime() -> Result<(), JsValue> {
    let mounted = mount_with(None)?;
    std::mem::forget(mounted);
    Ok(())
}

/// Install console logging without mounting anything, for pages that call
/// [`mount`] themselves.
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    logging::init(logging::DEFAULT_LEVEL);
}
