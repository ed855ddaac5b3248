use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::Result;

use crate::clipboard::{self, ClipboardBackend};
use crate::config::PageConfig;
use crate::cookies;
use crate::debounce::Debouncer;
use crate::dom::{Document, NodeId};
use crate::export::TableExporter;
use crate::forms::FormValidator;
use crate::notify::{Notifier, Severity, ALERT_CLASS, DISMISS_CLASS};
use crate::print::{self, PrintSurface};
use crate::scheduler::{Clock, Scheduler, SystemClock};

pub const VALIDATION_WARNING: &str = "Please fill all required fields correctly";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete this item?";

/// UI events delivered by the host to the page layer.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// A form was submitted; carries the form's element id.
    Submit(String),
    /// The user edited a field.
    Input(NodeId),
    /// The user clicked an element.
    Click(NodeId),
}

/// What the host should do with the event's native behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventOutcome {
    pub default_prevented: bool,
}

impl EventOutcome {
    fn proceed() -> Self {
        Self {
            default_prevented: false,
        }
    }

    fn prevented() -> Self {
        Self {
            default_prevented: true,
        }
    }
}

/// An activated tooltip: the owning element and its title text.
#[derive(Debug, Clone)]
pub struct Tooltip {
    pub owner: NodeId,
    pub title: String,
}

/// Modal confirmation seam (the `confirm()` analog).
pub trait ConfirmPrompt {
    fn confirm(&mut self, message: &str) -> bool;
}

/// Ask before a destructive action, with the stock message by default.
pub fn confirm_delete(prompt: &mut dyn ConfirmPrompt, message: Option<&str>) -> bool {
    prompt.confirm(message.unwrap_or(DELETE_PROMPT))
}

type SearchHook = Arc<Mutex<Box<dyn FnMut(&mut Document, &str) + Send>>>;

/// The page's utility layer, wired together: document, timer queue,
/// notification sink, form validation, and a debounced search entry
/// point. The host delivers events through [`Page::dispatch`] and pumps
/// timers with [`Page::tick`].
pub struct Page {
    pub doc: Document,
    pub scheduler: Scheduler,
    pub notifier: Notifier,
    config: PageConfig,
    search: Debouncer<String>,
    search_hook: SearchHook,
    csrf_token: Option<String>,
    tooltips: Vec<Tooltip>,
}

impl Page {
    pub fn new(doc: Document, config: PageConfig) -> Self {
        Self::with_clock(doc, config, Arc::new(SystemClock))
    }

    /// Construct with an injected clock so tests drive time manually.
    pub fn with_clock(doc: Document, config: PageConfig, clock: Arc<dyn Clock>) -> Self {
        let default_handler: Box<dyn FnMut(&mut Document, &str) + Send> =
            Box::new(|_doc, query| {
                tracing::info!(target: "search", "searching for: {}", query);
            });
        let hook: SearchHook = Arc::new(Mutex::new(default_handler));

        let min_len = config.search.min_query_len;
        let debounce_hook = Arc::clone(&hook);
        let search = Debouncer::new(config.search_debounce(), move |doc, query: String| {
            if query.chars().count() < min_len {
                return;
            }
            let mut hook = debounce_hook.lock().unwrap();
            (*hook)(doc, &query);
        });

        Self {
            notifier: Notifier::new(config.notification_ttl()),
            scheduler: Scheduler::new(clock),
            doc,
            config,
            search,
            search_hook: hook,
            csrf_token: None,
            tooltips: Vec::new(),
        }
    }

    /// Page-load wiring: read the CSRF token and activate tooltips.
    /// Event bindings themselves live in [`Page::dispatch`].
    pub fn init(&mut self) {
        self.csrf_token = cookies::get_cookie(&self.doc, &self.config.security.csrf_cookie);
        self.tooltips = self
            .doc
            .elements_by_attr("data-bs-toggle", "tooltip")
            .into_iter()
            .map(|owner| Tooltip {
                owner,
                title: self
                    .doc
                    .attr(owner, "title")
                    .unwrap_or_default()
                    .to_string(),
            })
            .collect();
        tracing::debug!(
            target: "page",
            "page initialized: {} tooltips, csrf {}",
            self.tooltips.len(),
            if self.csrf_token.is_some() { "present" } else { "absent" }
        );
    }

    pub fn tooltips(&self) -> &[Tooltip] {
        &self.tooltips
    }

    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    /// Deliver one UI event.
    pub fn dispatch(&mut self, event: PageEvent) -> EventOutcome {
        match event {
            PageEvent::Submit(form_id) => self.handle_submit(&form_id),
            PageEvent::Input(field) => {
                FormValidator::clear_mark(&mut self.doc, field);
                EventOutcome::proceed()
            }
            PageEvent::Click(node) => self.handle_click(node),
        }
    }

    /// Fire due timers (notification expiry, debounced search).
    pub fn tick(&mut self) -> usize {
        self.scheduler.run_due(&mut self.doc)
    }

    pub fn notify(&mut self, message: &str, severity: Severity) -> NodeId {
        self.notifier
            .notify(&mut self.doc, &mut self.scheduler, message, severity)
    }

    /// Debounced search entry: bursts of keystrokes collapse into one
    /// trailing lookup. Queries shorter than the configured minimum are
    /// dropped after the window elapses.
    pub fn search(&mut self, query: &str) {
        self.search.call(&mut self.scheduler, query.to_string());
    }

    /// Replace the search backend (a callback; the lookup itself is out
    /// of scope here).
    pub fn set_search_handler<F>(&mut self, handler: F)
    where
        F: FnMut(&mut Document, &str) + Send + 'static,
    {
        *self.search_hook.lock().unwrap() = Box::new(handler);
    }

    pub fn copy_to_clipboard(&mut self, backend: &mut dyn ClipboardBackend, text: &str) -> bool {
        clipboard::copy_to_clipboard(
            backend,
            &mut self.doc,
            &mut self.scheduler,
            &mut self.notifier,
            text,
        )
    }

    pub fn export_table(&self, table_id: &str, path: &Path) -> Result<Option<(PathBuf, usize)>> {
        TableExporter::export_to_file(&self.doc, table_id, path)
    }

    pub fn print_element(&self, element_id: &str, surface: &mut dyn PrintSurface) -> Result<bool> {
        print::print_element(
            &self.doc,
            element_id,
            &self.config.print.stylesheet_href,
            surface,
        )
    }

    fn handle_submit(&mut self, form_id: &str) -> EventOutcome {
        if FormValidator::validate(&mut self.doc, form_id) {
            EventOutcome::proceed()
        } else {
            self.notify(VALIDATION_WARNING, Severity::Warning);
            EventOutcome::prevented()
        }
    }

    fn handle_click(&mut self, node: NodeId) -> EventOutcome {
        if !self.doc.is_alive(node) {
            return EventOutcome::proceed();
        }

        // Dismiss button inside an alert
        if self.doc.has_class(node, DISMISS_CLASS) {
            if let Some(alert) = self.doc.closest_with_class(node, ALERT_CLASS) {
                self.notifier.dismiss(&mut self.doc, alert);
            }
            return EventOutcome::proceed();
        }

        // Mobile menu toggle
        if self.doc.attr(node, "data-toggle") == Some("mobile-menu") {
            let menus = self.doc.elements_by_class("mobile-menu");
            if let Some(menu) = menus.first() {
                self.doc.toggle_class(*menu, "hidden");
            }
            return EventOutcome::proceed();
        }

        // Smooth scroll for in-page anchors; bare "#" is left alone
        if self.doc.get(node).map(|el| el.tag == "a").unwrap_or(false) {
            if let Some(href) = self.doc.attr(node, "href") {
                if let Some(target_id) = href.strip_prefix('#') {
                    if target_id.is_empty() {
                        return EventOutcome::proceed();
                    }
                    let target_id = target_id.to_string();
                    if let Some(target) = self.doc.get_element_by_id(&target_id) {
                        self.doc.scroll_into_view(target);
                    }
                    return EventOutcome::prevented();
                }
            }
        }

        EventOutcome::proceed()
    }
}
