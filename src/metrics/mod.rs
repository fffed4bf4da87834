use crate::logging::{LogEvent, LogLevel, json_kv};
use std::time::Duration;

/// Counters accumulated by the runtime loop.
#[derive(Debug, Default, Clone)]
pub struct RuntimeMetrics {
    events: u64,
    renders: u64,
    panels_drawn: u64,
    composes: u64,
    focus_changes: u64,
}

impl RuntimeMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_event(&mut self) {
        self.events = self.events.saturating_add(1);
    }

    pub fn record_render(&mut self, panel_count: usize) {
        self.renders = self.renders.saturating_add(1);
        self.panels_drawn = self.panels_drawn.saturating_add(panel_count as u64);
    }

    pub fn record_compose(&mut self) {
        self.composes = self.composes.saturating_add(1);
    }

    pub fn record_focus_change(&mut self) {
        self.focus_changes = self.focus_changes.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            events: self.events,
            renders: self.renders,
            panels_drawn: self.panels_drawn,
            composes: self.composes,
            focus_changes: self.focus_changes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub events: u64,
    pub renders: u64,
    pub panels_drawn: u64,
    pub composes: u64,
    pub focus_changes: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(
            LogLevel::Info,
            target,
            "runtime_metrics",
            [
                json_kv("uptime_ms", self.uptime_ms),
                json_kv("events", self.events),
                json_kv("renders", self.renders),
                json_kv("panels_drawn", self.panels_drawn),
                json_kv("composes", self.composes),
                json_kv("focus_changes", self.focus_changes),
            ],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snapshot_reflects_counters() {
        let mut metrics = RuntimeMetrics::new();
        metrics.record_event();
        metrics.record_event();
        metrics.record_render(3);
        metrics.record_compose();
        metrics.record_focus_change();

        let snapshot = metrics.snapshot(Duration::from_millis(1500));
        assert_eq!(snapshot.events, 2);
        assert_eq!(snapshot.panels_drawn, 3);
        assert_eq!(snapshot.uptime_ms, 1500);

        let event = snapshot.to_log_event("accordion::metrics");
        assert_eq!(event.message, "runtime_metrics");
        assert_eq!(event.field("composes"), Some(&json!(1)));
    }
}
