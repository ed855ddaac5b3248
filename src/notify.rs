use std::time::Duration;

use crate::dom::{Document, NodeId};
use crate::scheduler::Scheduler;

pub const CONTAINER_ID: &str = "notification-container";
pub const DISMISS_CLASS: &str = "notification-close";
pub const ALERT_CLASS: &str = "alert";

/// Categorical label controlling a notification's styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Severity {
    Success,
    Error,
    Warning,
    #[default]
    Info,
}

impl Severity {
    /// Parse a severity label. Unknown labels fall back to `Info`.
    pub fn parse(label: &str) -> Self {
        match label {
            "success" => Severity::Success,
            "error" => Severity::Error,
            "warning" => Severity::Warning,
            "info" => Severity::Info,
            _ => Severity::Info,
        }
    }

    pub fn alert_class(&self) -> &'static str {
        match self {
            Severity::Success => "alert-success",
            Severity::Error => "alert-error",
            Severity::Warning => "alert-warning",
            Severity::Info => "alert-info",
        }
    }
}

/// The page's notification sink. Creates the floating container lazily
/// (one per document), appends dismissible alerts to it, and schedules
/// each alert's auto-removal.
///
/// There is deliberately no cap on the number of live alerts: a burst
/// simply grows the container until the individual timers retire entries.
pub struct Notifier {
    container: Option<NodeId>,
    ttl: Duration,
}

impl Notifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            container: None,
            ttl,
        }
    }

    /// The container element, created on first use and reused after.
    /// Re-created if something removed it from the document.
    pub fn ensure_container(&mut self, doc: &mut Document) -> NodeId {
        if let Some(container) = self.container {
            if doc.is_alive(container) {
                return container;
            }
        }
        let container = match doc.get_element_by_id(CONTAINER_ID) {
            Some(existing) => existing,
            None => {
                let container = doc.create_element("div");
                doc.set_id(container, CONTAINER_ID);
                doc.add_class(container, "fixed");
                let body = doc.body();
                doc.append_child(body, container);
                container
            }
        };
        self.container = Some(container);
        container
    }

    /// Show a message. The alert carries a severity class, the message
    /// text, and a dismiss button; it is auto-removed after the TTL
    /// unless the user dismisses it first.
    pub fn notify(
        &mut self,
        doc: &mut Document,
        sched: &mut Scheduler,
        message: &str,
        severity: Severity,
    ) -> NodeId {
        let container = self.ensure_container(doc);

        let alert = doc.create_element("div");
        doc.add_class(alert, ALERT_CLASS);
        doc.add_class(alert, severity.alert_class());
        doc.set_text(alert, message);
        doc.set_attr(alert, "role", "alert");

        let close = doc.create_element("button");
        doc.add_class(close, DISMISS_CLASS);
        doc.set_text(close, "\u{d7}");
        doc.append_child(alert, close);

        doc.append_child(container, alert);

        // Removal is idempotent, so this racing a manual dismiss is fine.
        sched.schedule_after(self.ttl, move |doc| doc.remove(alert));

        alert
    }

    /// Dismiss an alert now. No-op if it is already gone.
    pub fn dismiss(&self, doc: &mut Document, alert: NodeId) {
        doc.remove(alert);
    }

    /// Live alerts in insertion order (oldest first).
    pub fn active(&self, doc: &Document) -> Vec<NodeId> {
        let Some(container) = self.container else {
            return Vec::new();
        };
        doc.children(container)
            .into_iter()
            .filter(|n| doc.has_class(*n, ALERT_CLASS))
            .collect()
    }
}
