//! Theme preference controller.
//!
//! DESIGN
//! ======
//! The document marker attribute is the source of truth for what is applied;
//! storage only records what the user picked. On mount the stored value is
//! applied without a transition guard. Each toggle click then steps the
//! applied state along the ring, persists it, and re-applies it with the
//! `theme-switching` body class held for `transition_guard`.
//!
//! System color-scheme changes only refresh the toggle label. In `Auto` the
//! page follows `prefers-color-scheme` through CSS alone.
//!
//! TRADE-OFFS
//! ==========
//! Listener closures hold a `Weak` to the controller state, so dropping the
//! controller tears everything down even if a host leaks a listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::host::{ThemeHost, ThemeSettings};
use crate::preference::ThemePreference;
use crate::subscription::Subscription;

pub struct ThemeController {
    state: Rc<State>,
    _listeners: Vec<Subscription>,
}

struct State {
    host: ThemeHost,
    settings: ThemeSettings,
    /// Pending removal of the switching class.
    guard: RefCell<Option<Subscription>>,
}

impl ThemeController {
    /// Apply the stored preference, set the label, and start listening.
    pub fn mount(host: ThemeHost, settings: ThemeSettings) -> Self {
        let state = Rc::new(State { host, settings, guard: RefCell::new(None) });

        let initial = state.stored();
        state.set_marker(initial);
        state.update_toggle_label();

        let on_click = {
            let weak = Rc::downgrade(&state);
            state.host.toggle.on_click(Box::new(move || with_state(&weak, |state| {
                state.cycle_theme();
            })))
        };
        let on_scheme = {
            let weak = Rc::downgrade(&state);
            state.host.color_scheme.on_change(Box::new(move || with_state(&weak, State::update_toggle_label)))
        };

        log::debug!("theme controller mounted, stored preference {initial}");
        Self { state, _listeners: vec![on_click, on_scheme] }
    }

    pub fn apply_theme(&self, preference: ThemePreference) {
        self.state.apply_theme(preference);
    }

    /// Step the applied theme along the ring and persist it.
    pub fn cycle_theme(&self) -> ThemePreference {
        self.state.cycle_theme()
    }

    pub fn update_toggle_label(&self) {
        self.state.update_toggle_label();
    }

    /// Preference currently applied to the document.
    pub fn current(&self) -> ThemePreference {
        self.state.applied()
    }
}

fn with_state(weak: &Weak<State>, f: impl FnOnce(&State)) {
    if let Some(state) = weak.upgrade() {
        f(&state);
    }
}

impl State {
    fn stored(&self) -> ThemePreference {
        ThemePreference::from_stored(self.host.store.load(&self.settings.storage_key).as_deref())
    }

    fn applied(&self) -> ThemePreference {
        ThemePreference::from_attribute(self.host.document.attribute(&self.settings.attribute).as_deref())
    }

    fn set_marker(&self, preference: ThemePreference) {
        let document = &self.host.document;
        match preference.attribute() {
            Some(value) => document.set_attribute(&self.settings.attribute, value),
            None => document.remove_attribute(&self.settings.attribute),
        }
    }

    fn apply_theme(&self, preference: ThemePreference) {
        let class = self.settings.switching_class.clone();
        self.host.document.add_body_class(&class);
        self.set_marker(preference);

        let document = Rc::clone(&self.host.document);
        let pending = self
            .host
            .timer
            .schedule(self.settings.transition_guard, Box::new(move || document.remove_body_class(&class)));

        // The replaced handle is dropped here, cancelling its removal.
        drop(self.guard.replace(Some(pending)));
    }

    fn cycle_theme(&self) -> ThemePreference {
        let next = self.applied().next();
        self.host.store.save(&self.settings.storage_key, next.as_str());
        self.apply_theme(next);
        self.update_toggle_label();
        log::debug!("theme switched to {next}");
        next
    }

    fn update_toggle_label(&self) {
        self.host.toggle.set_label(self.applied().toggle_label());
    }
}

#[cfg(test)]
#[path = "controller_test.rs"]
mod tests;
