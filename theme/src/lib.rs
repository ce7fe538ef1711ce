//! # theme
//!
//! Page chrome behavior for the generated site: the Light / Dark / Auto
//! theme toggle and the collapsible sidebar.
//!
//! SYSTEM CONTEXT
//! ==============
//! The controllers never touch the DOM directly. They talk to small host
//! traits ([`host`]) so the same state machine runs against in-memory fakes
//! in tests and against `web-sys` in the browser (`hydrate` feature, see
//! `web`). The compiled WASM module mounts itself on load.

pub mod controller;
pub mod host;
pub mod preference;
pub mod sidebar;
pub mod store;
pub mod subscription;

#[cfg(feature = "hydrate")]
pub mod web;

#[cfg(test)]
mod test_support;

pub use controller::ThemeController;
pub use host::{ThemeHost, ThemeSettings};
pub use preference::ThemePreference;
pub use sidebar::SidebarController;
pub use subscription::Subscription;
