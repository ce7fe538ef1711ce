//! In-memory hosts for controller tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, HashMap};
use std::rc::{Rc, Weak};
use std::time::Duration;

use crate::controller::ThemeController;
use crate::host::{
    ClassTarget, Clickable, ColorSchemeSource, PreferenceStore, ThemeDocument, ThemeHost, ThemeSettings, Timer,
    ToggleControl,
};
use crate::store::MemoryStore;
use crate::subscription::Subscription;

// =============================================================
// Listener registry
// =============================================================

#[derive(Default)]
struct ListenerSet {
    next_id: u64,
    handlers: Vec<(u64, Rc<dyn Fn()>)>,
}

#[derive(Default, Clone)]
pub struct Listeners {
    set: Rc<RefCell<ListenerSet>>,
}

impl Listeners {
    pub fn subscribe(&self, handler: Box<dyn Fn()>) -> Subscription {
        let id = {
            let mut set = self.set.borrow_mut();
            set.next_id += 1;
            let id = set.next_id;
            set.handlers.push((id, Rc::from(handler)));
            id
        };
        let weak: Weak<RefCell<ListenerSet>> = Rc::downgrade(&self.set);
        Subscription::new(move || {
            if let Some(set) = weak.upgrade() {
                set.borrow_mut().handlers.retain(|(existing, _)| *existing != id);
            }
        })
    }

    pub fn fire(&self) {
        let handlers: Vec<Rc<dyn Fn()>> = self.set.borrow().handlers.iter().map(|(_, h)| Rc::clone(h)).collect();
        for handler in handlers {
            handler();
        }
    }

    pub fn len(&self) -> usize {
        self.set.borrow().handlers.len()
    }
}

// =============================================================
// Store
// =============================================================

#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    pub saves: RefCell<Vec<(String, String)>>,
}

impl RecordingStore {
    pub fn with_entry(key: &str, value: &str) -> Self {
        Self { inner: MemoryStore::with_entry(key, value), saves: RefCell::default() }
    }

    pub fn save_count(&self) -> usize {
        self.saves.borrow().len()
    }
}

impl PreferenceStore for RecordingStore {
    fn load(&self, key: &str) -> Option<String> {
        self.inner.load(key)
    }

    fn save(&self, key: &str, value: &str) {
        self.saves.borrow_mut().push((key.to_string(), value.to_string()));
        self.inner.save(key, value);
    }
}

// =============================================================
// Document
// =============================================================

#[derive(Default)]
pub struct FakeDocument {
    attributes: RefCell<HashMap<String, String>>,
    body_classes: RefCell<BTreeSet<String>>,
    pub log: RefCell<Vec<String>>,
}

impl FakeDocument {
    pub fn has_body_class(&self, class: &str) -> bool {
        self.body_classes.borrow().contains(class)
    }

    pub fn take_log(&self) -> Vec<String> {
        self.log.take()
    }
}

impl ThemeDocument for FakeDocument {
    fn attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).cloned()
    }

    fn set_attribute(&self, name: &str, value: &str) {
        self.log.borrow_mut().push(format!("set {name}={value}"));
        self.attributes.borrow_mut().insert(name.to_string(), value.to_string());
    }

    fn remove_attribute(&self, name: &str) {
        self.log.borrow_mut().push(format!("remove {name}"));
        self.attributes.borrow_mut().remove(name);
    }

    fn add_body_class(&self, class: &str) {
        self.log.borrow_mut().push(format!("add-class {class}"));
        self.body_classes.borrow_mut().insert(class.to_string());
    }

    fn remove_body_class(&self, class: &str) {
        self.log.borrow_mut().push(format!("remove-class {class}"));
        self.body_classes.borrow_mut().remove(class);
    }
}

// =============================================================
// Controls
// =============================================================

#[derive(Default)]
pub struct FakeControl {
    label: RefCell<String>,
    pub clicks: Listeners,
}

impl FakeControl {
    pub fn label(&self) -> String {
        self.label.borrow().clone()
    }

    pub fn click(&self) {
        self.clicks.fire();
    }
}

impl Clickable for FakeControl {
    fn on_click(&self, handler: Box<dyn Fn()>) -> Subscription {
        self.clicks.subscribe(handler)
    }
}

impl ToggleControl for FakeControl {
    fn set_label(&self, label: &str) {
        label.clone_into(&mut self.label.borrow_mut());
    }
}

#[derive(Default)]
pub struct FakeElement {
    classes: RefCell<BTreeSet<String>>,
    pub clicks: Listeners,
}

impl FakeElement {
    pub fn click(&self) {
        self.clicks.fire();
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.borrow().contains(class)
    }
}

impl Clickable for FakeElement {
    fn on_click(&self, handler: Box<dyn Fn()>) -> Subscription {
        self.clicks.subscribe(handler)
    }
}

impl ClassTarget for FakeElement {
    fn toggle_class(&self, class: &str) {
        let mut classes = self.classes.borrow_mut();
        if !classes.remove(class) {
            classes.insert(class.to_string());
        }
    }

    fn add_class(&self, class: &str) {
        self.classes.borrow_mut().insert(class.to_string());
    }
}

// =============================================================
// Timer and color scheme
// =============================================================

type Task = (u64, Duration, Box<dyn FnOnce()>);

#[derive(Default)]
pub struct ManualTimer {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    tasks: Rc<RefCell<Vec<Task>>>,
    pub delays: RefCell<Vec<Duration>>,
}

impl ManualTimer {
    /// Move the clock forward and run every task that came due.
    pub fn advance(&self, by: Duration) {
        let now = self.now.get() + by;
        self.now.set(now);
        let due: Vec<Task> = {
            let mut tasks = self.tasks.borrow_mut();
            let (due, pending): (Vec<Task>, Vec<Task>) = tasks.drain(..).partition(|(_, at, _)| *at <= now);
            *tasks = pending;
            due
        };
        for (_, _, task) in due {
            task();
        }
    }

    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Timer for ManualTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) -> Subscription {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.delays.borrow_mut().push(delay);
        self.tasks.borrow_mut().push((id, self.now.get() + delay, task));

        let tasks = Rc::downgrade(&self.tasks);
        Subscription::new(move || {
            if let Some(tasks) = tasks.upgrade() {
                tasks.borrow_mut().retain(|(existing, _, _)| *existing != id);
            }
        })
    }
}

#[derive(Default)]
pub struct ManualColorScheme {
    pub listeners: Listeners,
}

impl ManualColorScheme {
    pub fn notify(&self) {
        self.listeners.fire();
    }
}

impl ColorSchemeSource for ManualColorScheme {
    fn on_change(&self, handler: Box<dyn Fn()>) -> Subscription {
        self.listeners.subscribe(handler)
    }
}

// =============================================================
// Harness
// =============================================================

#[derive(Default)]
pub struct Harness {
    pub store: Rc<RecordingStore>,
    pub document: Rc<FakeDocument>,
    pub toggle: Rc<FakeControl>,
    pub timer: Rc<ManualTimer>,
    pub scheme: Rc<ManualColorScheme>,
}

impl Harness {
    pub fn with_stored(value: &str) -> Self {
        Self { store: Rc::new(RecordingStore::with_entry("theme", value)), ..Self::default() }
    }

    pub fn host(&self) -> ThemeHost {
        ThemeHost {
            store: self.store.clone(),
            document: self.document.clone(),
            toggle: self.toggle.clone(),
            timer: self.timer.clone(),
            color_scheme: self.scheme.clone(),
        }
    }

    pub fn mount(&self) -> ThemeController {
        ThemeController::mount(self.host(), ThemeSettings::default())
    }

    pub fn marker(&self) -> Option<String> {
        self.document.attribute("data-theme")
    }

    pub fn stored(&self) -> Option<String> {
        self.store.load("theme")
    }
}
