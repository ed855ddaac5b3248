use anyhow::{anyhow, Result};
use serde_json::Value;

use crate::dom::Document;
use crate::notify::{Notifier, Severity};
use crate::scheduler::Scheduler;

/// Fetches structured data for the page. One attempt, no retry: a
/// failure is logged, surfaced once through the notifier, and swallowed.
pub struct DataLoader {
    client: reqwest::Client,
    csrf_token: Option<String>,
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            csrf_token: None,
        }
    }

    /// Attach the CSRF token read from the document cookie; it is sent
    /// with every request from then on.
    pub fn with_csrf_token(mut self, token: Option<String>) -> Self {
        self.csrf_token = token;
        self
    }

    /// GET `url` and parse the JSON body. Non-2xx statuses are errors.
    pub async fn load_data(&self, url: &str) -> Result<Value> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/json")
            .header("X-Requested-With", "XMLHttpRequest");
        if let Some(token) = &self.csrf_token {
            request = request.header("X-CSRFToken", token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(anyhow!("HTTP error: status {}", response.status()));
        }
        Ok(response.json().await?)
    }

    /// Fire-and-forget variant: on failure, log the cause and raise one
    /// `error` notification, returning `None`.
    pub async fn load_or_notify(
        &self,
        doc: &mut Document,
        sched: &mut Scheduler,
        notifier: &mut Notifier,
        url: &str,
    ) -> Option<Value> {
        match self.load_data(url).await {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::error!("error loading data from {}: {:#}", url, err);
                notifier.notify(doc, sched, "Error loading data", Severity::Error);
                None
            }
        }
    }
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}
