//! Collapsible sidebar.
//!
//! The sidebar toggle flips the `collapsed` class; any click in the main
//! content collapses it. State is not persisted.

use std::rc::Rc;

use crate::host::{ClassTarget, Clickable};
use crate::subscription::Subscription;

pub const COLLAPSED_CLASS: &str = "collapsed";

pub struct SidebarController {
    _listeners: [Subscription; 2],
}

impl SidebarController {
    pub fn mount(sidebar: Rc<dyn ClassTarget>, toggle: &dyn Clickable, main: &dyn Clickable) -> Self {
        let flip = {
            let sidebar = Rc::clone(&sidebar);
            toggle.on_click(Box::new(move || sidebar.toggle_class(COLLAPSED_CLASS)))
        };
        let collapse = main.on_click(Box::new(move || sidebar.add_class(COLLAPSED_CLASS)));
        Self { _listeners: [flip, collapse] }
    }
}

#[cfg(test)]
#[path = "sidebar_test.rs"]
mod tests;
