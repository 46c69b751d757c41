use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use tracing::info;

/// Usage events worth reporting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsEvent {
    PageView { path: String, title: String },
    Shortcut { action: String },
    FilterClick { key: String, label: String },
}

impl AnalyticsEvent {
    /// Category/label pair the event is reported under.
    pub fn category_label(&self) -> (&str, &str) {
        match self {
            AnalyticsEvent::PageView { path, .. } => ("pageview", path),
            AnalyticsEvent::Shortcut { action } => ("shortcut", action),
            AnalyticsEvent::FilterClick { label, .. } => ("filter", label),
        }
    }
}

pub trait AnalyticsSink: Send {
    fn record(&mut self, event: AnalyticsEvent);
}

/// Reports events on the `analytics` tracing target.
#[derive(Debug, Default)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn record(&mut self, event: AnalyticsEvent) {
        let (category, label) = event.category_label();
        info!(target: "analytics", category, label, ?event);
    }
}

/// Keeps every event in memory. Clones share the same buffer.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<AnalyticsEvent>>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        lock(&self.events).clone()
    }
}

impl AnalyticsSink for MemorySink {
    fn record(&mut self, event: AnalyticsEvent) {
        lock(&self.events).push(event);
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
