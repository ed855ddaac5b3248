//! UI utility layer for a server-rendered page: notifications with
//! auto-expiry, a trailing-edge debouncer, required-field form
//! validation, and thin wrappers for CSV export, printing, clipboard,
//! cookies and data fetching. Timers run through an injected scheduler
//! so everything is unit-testable against a manual clock.

pub mod clipboard;
pub mod config;
pub mod cookies;
pub mod debounce;
pub mod dom;
pub mod export;
pub mod fetch;
pub mod format;
pub mod forms;
pub mod logging;
pub mod notify;
pub mod page;
pub mod print;
pub mod scheduler;

pub use config::PageConfig;
pub use debounce::Debouncer;
pub use dom::{Document, NodeId};
pub use forms::FormValidator;
pub use notify::{Notifier, Severity};
pub use page::{Page, PageEvent};
pub use scheduler::{ManualClock, Scheduler, SystemClock};
