use crate::model::{MonitorEvent, MonitorSummary, Severity};

/// Append-only log of everything one monitor session emitted.
///
/// Summaries are recomputed from the log on every call rather than kept
/// as running counters.
#[derive(Debug, Default, Clone)]
pub struct SessionLog {
    events: Vec<MonitorEvent>,
}

impl SessionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: MonitorEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[MonitorEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn summarize(&self) -> MonitorSummary {
        let alerts_high = self
            .events
            .iter()
            .filter(|e| e.severity().is_high_alert())
            .count();
        let alerts_medium = self
            .events
            .iter()
            .filter(|e| e.severity() == Severity::Medium)
            .count();
        MonitorSummary {
            events: self.events.len(),
            alerts_high,
            alerts_medium,
        }
    }
}
