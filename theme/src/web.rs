//! Browser bindings for the host traits, and the WASM entry point.
//!
//! Page contract: `.theme-toggle` is required; `.sidebar-toggle`,
//! `.sidebar` and `main` are wired up only when all three exist.
//! When `localStorage` is unavailable (private browsing, sandboxed frames)
//! the preference lives in memory for the page's lifetime.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{Document, Element, EventTarget, HtmlElement, MediaQueryList, Storage};

use crate::controller::ThemeController;
use crate::host::{
    ClassTarget, Clickable, ColorSchemeSource, PreferenceStore, ThemeDocument, ThemeHost, ThemeSettings, Timer,
    ToggleControl,
};
use crate::sidebar::SidebarController;
use crate::store::MemoryStore;
use crate::subscription::Subscription;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";
const THEME_TOGGLE: &str = ".theme-toggle";
const SIDEBAR_TOGGLE: &str = ".sidebar-toggle";
const SIDEBAR: &str = ".sidebar";
const MAIN: &str = "main";

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    /// Not running in a window context (e.g. a worker).
    #[error("no window")]
    NoWindow,

    #[error("no document, root element, or body")]
    NoDocument,

    /// A required element is absent from the page.
    #[error("missing element `{0}`")]
    MissingElement(&'static str),

    /// A DOM call threw.
    #[error("dom error: {0}")]
    Js(String),
}

impl WebError {
    fn js(err: &JsValue) -> Self {
        Self::Js(format!("{err:?}"))
    }
}

// =============================================================
// Host implementations
// =============================================================

pub struct LocalStorage(Storage);

impl PreferenceStore for LocalStorage {
    fn load(&self, key: &str) -> Option<String> {
        match self.0.get_item(key) {
            Ok(value) => value,
            Err(err) => {
                log::warn!("localStorage read of {key} failed: {err:?}");
                None
            }
        }
    }

    fn save(&self, key: &str, value: &str) {
        if let Err(err) = self.0.set_item(key, value) {
            log::warn!("localStorage write of {key} failed: {err:?}");
        }
    }
}

pub struct HtmlDocument {
    root: Element,
    body: HtmlElement,
}

impl ThemeDocument for HtmlDocument {
    fn attribute(&self, name: &str) -> Option<String> {
        self.root.get_attribute(name)
    }

    fn set_attribute(&self, name: &str, value: &str) {
        if let Err(err) = self.root.set_attribute(name, value) {
            log::warn!("set {name} failed: {err:?}");
        }
    }

    fn remove_attribute(&self, name: &str) {
        if let Err(err) = self.root.remove_attribute(name) {
            log::warn!("remove {name} failed: {err:?}");
        }
    }

    fn add_body_class(&self, class: &str) {
        if let Err(err) = self.body.class_list().add_1(class) {
            log::warn!("add body class {class} failed: {err:?}");
        }
    }

    fn remove_body_class(&self, class: &str) {
        if let Err(err) = self.body.class_list().remove_1(class) {
            log::warn!("remove body class {class} failed: {err:?}");
        }
    }
}

pub struct DomElement(Element);

impl Clickable for DomElement {
    fn on_click(&self, handler: Box<dyn Fn()>) -> Subscription {
        listen(&self.0, "click", handler)
    }
}

impl ToggleControl for DomElement {
    fn set_label(&self, label: &str) {
        self.0.set_text_content(Some(label));
    }
}

impl ClassTarget for DomElement {
    fn toggle_class(&self, class: &str) {
        if let Err(err) = self.0.class_list().toggle(class) {
            log::warn!("toggle class {class} failed: {err:?}");
        }
    }

    fn add_class(&self, class: &str) {
        if let Err(err) = self.0.class_list().add_1(class) {
            log::warn!("add class {class} failed: {err:?}");
        }
    }
}

/// `setTimeout` through gloo; dropping the `Timeout` clears it.
pub struct GlooTimer;

impl Timer for GlooTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        let timeout = Timeout::new(millis, task);
        Subscription::new(move || drop(timeout))
    }
}

pub struct MediaQuery(MediaQueryList);

impl ColorSchemeSource for MediaQuery {
    fn on_change(&self, handler: Box<dyn Fn()>) -> Subscription {
        listen(&self.0, "change", handler)
    }
}

/// Used when `matchMedia` is unavailable: the scheme never reports changes.
pub struct StaticColorScheme;

impl ColorSchemeSource for StaticColorScheme {
    fn on_change(&self, _handler: Box<dyn Fn()>) -> Subscription {
        Subscription::noop()
    }
}

fn listen(target: &EventTarget, event: &'static str, handler: Box<dyn Fn()>) -> Subscription {
    let target = target.clone();
    let closure = Closure::wrap(handler);
    if let Err(err) = target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        log::warn!("listening for {event} failed: {err:?}");
        return Subscription::noop();
    }
    Subscription::new(move || {
        if let Err(err) = target.remove_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            log::warn!("removing {event} listener failed: {err:?}");
        }
        drop(closure);
    })
}

// =============================================================
// Mounting
// =============================================================

/// Controllers mounted on the current page.
pub struct Page {
    _theme: ThemeController,
    _sidebar: Option<SidebarController>,
}

thread_local! {
    static PAGE: RefCell<Option<Page>> = const { RefCell::new(None) };
}

fn query(document: &Document, selector: &str) -> Result<Option<Element>, WebError> {
    document.query_selector(selector).map_err(|err| WebError::js(&err))
}

/// Wire the theme toggle and, when present, the sidebar.
pub fn mount_page() -> Result<Page, WebError> {
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;
    let root = document.document_element().ok_or(WebError::NoDocument)?;
    let body = document.body().ok_or(WebError::NoDocument)?;
    let toggle = query(&document, THEME_TOGGLE)?.ok_or(WebError::MissingElement(THEME_TOGGLE))?;

    let store: Rc<dyn PreferenceStore> = match window.local_storage() {
        Ok(Some(storage)) => Rc::new(LocalStorage(storage)),
        Ok(None) | Err(_) => {
            log::warn!("localStorage unavailable, theme preference will not persist");
            Rc::new(MemoryStore::new())
        }
    };
    let color_scheme: Rc<dyn ColorSchemeSource> = match window.match_media(DARK_QUERY) {
        Ok(Some(list)) => Rc::new(MediaQuery(list)),
        Ok(None) | Err(_) => Rc::new(StaticColorScheme),
    };

    let host = ThemeHost {
        store,
        document: Rc::new(HtmlDocument { root, body }),
        toggle: Rc::new(DomElement(toggle)),
        timer: Rc::new(GlooTimer),
        color_scheme,
    };
    let theme = ThemeController::mount(host, ThemeSettings::default());

    let sidebar = match (query(&document, SIDEBAR)?, query(&document, SIDEBAR_TOGGLE)?, query(&document, MAIN)?) {
        (Some(sidebar), Some(toggle), Some(main)) => {
            Some(SidebarController::mount(Rc::new(DomElement(sidebar)), &DomElement(toggle), &DomElement(main)))
        }
        _ => {
            log::debug!("sidebar elements not found, sidebar toggle disabled");
            None
        }
    };

    Ok(Page { _theme: theme, _sidebar: sidebar })
}

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if let Err(err) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&JsValue::from(format!("console logger unavailable: {err}")));
    }

    match mount_page() {
        Ok(page) => PAGE.with(|slot| *slot.borrow_mut() = Some(page)),
        Err(err) => log::error!("page controllers not mounted: {err}"),
    }
}
