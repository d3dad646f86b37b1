//! Application layer of the Nuxeo browser.
//!
//! [`BrowserController`] owns the browsing state and runs every user action
//! against the current session, reporting failures through a
//! [`Presenter`](nxb_core::presenter::Presenter).

pub mod browser;

pub use browser::{BrowserController, DEFAULT_PATH};
