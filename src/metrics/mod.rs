use crate::logging::{LogEvent, LogFields, LogLevel};
use serde_json::json;
use std::time::Duration;

/// Counters collected by a layout engine while metrics are enabled.
#[derive(Debug, Default, Clone)]
pub struct LayoutMetrics {
    passes: u64,
    relayouts: u64,
    skipped_relayouts: u64,
    slot_switches: u64,
    animations_started: u64,
    animations_settled: u64,
    ticks: u64,
}

impl LayoutMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// One call to `layout`, whether or not geometry was re-solved.
    pub fn record_pass(&mut self, relayout: bool) {
        self.passes = self.passes.saturating_add(1);
        if relayout {
            self.relayouts = self.relayouts.saturating_add(1);
        } else {
            self.skipped_relayouts = self.skipped_relayouts.saturating_add(1);
        }
    }

    pub fn record_switches(&mut self, count: usize) {
        if count > 0 {
            self.slot_switches = self.slot_switches.saturating_add(count as u64);
        }
    }

    pub fn record_animation_started(&mut self) {
        self.animations_started = self.animations_started.saturating_add(1);
    }

    pub fn record_animation_settled(&mut self) {
        self.animations_settled = self.animations_settled.saturating_add(1);
    }

    pub fn record_tick(&mut self) {
        self.ticks = self.ticks.saturating_add(1);
    }

    pub fn snapshot(&self, uptime: Duration) -> MetricSnapshot {
        MetricSnapshot {
            uptime_ms: uptime.as_millis() as u64,
            passes: self.passes,
            relayouts: self.relayouts,
            skipped_relayouts: self.skipped_relayouts,
            slot_switches: self.slot_switches,
            animations_started: self.animations_started,
            animations_settled: self.animations_settled,
            ticks: self.ticks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub uptime_ms: u64,
    pub passes: u64,
    pub relayouts: u64,
    pub skipped_relayouts: u64,
    pub slot_switches: u64,
    pub animations_started: u64,
    pub animations_settled: u64,
    pub ticks: u64,
}

impl MetricSnapshot {
    pub fn to_log_event(&self, target: &str) -> LogEvent {
        LogEvent::with_fields(LogLevel::Info, target, "layout_metrics", self.as_fields())
    }

    pub fn as_fields(&self) -> LogFields {
        let mut map = LogFields::new();
        map.insert("uptime_ms".to_string(), json!(self.uptime_ms));
        map.insert("passes".to_string(), json!(self.passes));
        map.insert("relayouts".to_string(), json!(self.relayouts));
        map.insert(
            "skipped_relayouts".to_string(),
            json!(self.skipped_relayouts),
        );
        map.insert("slot_switches".to_string(), json!(self.slot_switches));
        map.insert(
            "animations_started".to_string(),
            json!(self.animations_started),
        );
        map.insert(
            "animations_settled".to_string(),
            json!(self.animations_settled),
        );
        map.insert("ticks".to_string(), json!(self.ticks));
        map
    }
}

pub fn snapshot_event(snapshot: &MetricSnapshot, target: &str) -> LogEvent {
    snapshot.to_log_event(target)
}
