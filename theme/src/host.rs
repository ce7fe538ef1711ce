//! Host capabilities the controllers depend on.
//!
//! Each trait is the smallest slice of the browser a controller needs.
//! Implementations for the real page live in `web` (`hydrate` feature).
//! All methods take `&self`: hosts are shared through `Rc` and mutate
//! through interior mutability, like the DOM objects they wrap.

use std::rc::Rc;
use std::time::Duration;

use crate::subscription::Subscription;

/// Persistent key/value storage (`localStorage` in the browser).
pub trait PreferenceStore {
    fn load(&self, key: &str) -> Option<String>;
    /// Best effort. Failures are logged by the implementation.
    fn save(&self, key: &str, value: &str);
}

/// The root element carrying the theme marker, plus the body class list.
pub trait ThemeDocument {
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_attribute(&self, name: &str, value: &str);
    fn remove_attribute(&self, name: &str);
    fn add_body_class(&self, class: &str);
    fn remove_body_class(&self, class: &str);
}

pub trait Clickable {
    /// Run `handler` on every click until the subscription is dropped.
    fn on_click(&self, handler: Box<dyn Fn()>) -> Subscription;
}

/// The theme toggle button.
pub trait ToggleControl: Clickable {
    fn set_label(&self, label: &str);
}

/// An element whose class list can be changed.
pub trait ClassTarget {
    fn toggle_class(&self, class: &str);
    fn add_class(&self, class: &str);
}

pub trait Timer {
    /// Run `task` once after `delay`. Dropping the subscription first cancels it.
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription;
}

/// System color-scheme change notifications (`prefers-color-scheme`).
pub trait ColorSchemeSource {
    fn on_change(&self, handler: Box<dyn Fn()>) -> Subscription;
}

/// Everything [`crate::ThemeController`] talks to.
#[derive(Clone)]
pub struct ThemeHost {
    pub store: Rc<dyn PreferenceStore>,
    pub document: Rc<dyn ThemeDocument>,
    pub toggle: Rc<dyn ToggleControl>,
    pub timer: Rc<dyn Timer>,
    pub color_scheme: Rc<dyn ColorSchemeSource>,
}

pub const DEFAULT_STORAGE_KEY: &str = "theme";
pub const DEFAULT_ATTRIBUTE: &str = "data-theme";
pub const DEFAULT_SWITCHING_CLASS: &str = "theme-switching";
pub const DEFAULT_TRANSITION_GUARD: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSettings {
    pub storage_key: String,
    /// Attribute on the root element: `"dark"`, `"light"`, or absent for auto.
    pub attribute: String,
    /// Body class suppressing CSS transitions while the theme flips.
    pub switching_class: String,
    pub transition_guard: Duration,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            switching_class: DEFAULT_SWITCHING_CLASS.to_string(),
            transition_guard: DEFAULT_TRANSITION_GUARD,
        }
    }
}
