use std::fmt;
use std::time::{Duration, Instant};

use crate::content::Measure;
use crate::environment::Environment;
use crate::error::Result;
use crate::geometry::Size;
use crate::logging::{LogEvent, LogLevel, METRICS_TARGET, event_with_fields, json_kv, json_ser, json_str};
use crate::metrics::{LayoutMetrics, MetricSnapshot};
use crate::slot::{SlotConfig, SlotId, SlotLayout, SlotMap};

use super::config::{LayoutConfig, LayoutSettings};
use super::delegate::{Geometry, LayoutDelegate};
use super::frame::{LayoutFrame, RegionFrame};
use super::state::LayoutState;

/// Six-slot adaptive layout.
///
/// Each pass resolves every configured slot against the environment, feeds
/// the per-slot switchers, re-solves geometry only when the environment or
/// the slot-to-config mapping changed, and tweens changed regions on one
/// shared timeline. The host drives time through [`AdaptiveLayout::tick`].
pub struct AdaptiveLayout<C> {
    slots: SlotMap<Option<SlotLayout<C>>>,
    config: LayoutConfig,
    state: LayoutState<C>,
    started: Instant,
}

impl<C> AdaptiveLayout<C> {
    pub fn builder() -> AdaptiveLayoutBuilder<C> {
        AdaptiveLayoutBuilder::new()
    }

    pub fn settings(&self) -> &LayoutSettings {
        &self.config.settings
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn state(&self) -> &LayoutState<C> {
        &self.state
    }

    pub fn slot(&self, slot: SlotId) -> Option<&SlotLayout<C>> {
        self.slots[slot].as_ref()
    }

    /// True while a tween or content switch still needs ticks.
    pub fn is_animating(&self) -> bool {
        self.state.is_in_motion()
    }

    /// Drop all remembered state; the next pass lays out from scratch.
    pub fn reset(&mut self) {
        self.state = LayoutState::new(
            self.config.settings.animation_duration(),
            self.config.settings.switch_duration(),
        );
    }

    /// Advance animations by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        with_metrics(&self.config, LayoutMetrics::record_tick);
        if let Some(committed) = self.state.advance(dt) {
            with_metrics(&self.config, LayoutMetrics::record_animation_settled);
            emit(
                &self.config,
                event_with_fields(
                    LogLevel::Debug,
                    &self.config.log_target,
                    "animation_settled",
                    [json_kv("committed", committed as u64)],
                ),
            );
        }
    }

    pub fn metrics_snapshot(&self) -> Option<MetricSnapshot> {
        let handle = self.config.metrics.as_ref()?;
        let metrics = handle.lock().ok()?;
        Some(metrics.snapshot(self.started.elapsed()))
    }

    /// Log the current metrics snapshot, if metrics are enabled.
    pub fn emit_metrics(&self) {
        if let Some(snapshot) = self.metrics_snapshot() {
            emit(&self.config, snapshot.to_log_event(METRICS_TARGET));
        }
    }
}

impl<C: Measure> AdaptiveLayout<C> {
    /// Run one layout pass. Never fails: configuration problems are rejected
    /// when the engine is built.
    pub fn layout(&mut self, env: &Environment) -> LayoutFrame<C> {
        let Self {
            slots,
            config,
            state,
            ..
        } = self;

        let resolved: SlotMap<Option<&SlotConfig<C>>> = SlotMap::from_fn(|slot| {
            slots[slot]
                .as_ref()
                .and_then(|layout| layout.resolve(env))
        });

        let mut switched = Vec::new();
        for slot in SlotId::ALL {
            if slots[slot].is_none() {
                continue;
            }
            let from = state.switchers[slot].current_key().to_string();
            if state.switchers[slot].switch_to(resolved[slot]) {
                let to = state.switchers[slot].current_key().to_string();
                emit(
                    config,
                    event_with_fields(
                        LogLevel::Info,
                        &config.log_target,
                        "slot_switched",
                        [
                            json_str("slot", slot.name()),
                            json_str("from", from),
                            json_str("to", to),
                        ],
                    ),
                );
                switched.push(slot);
            }
            state.keys[slot] = resolved[slot].map(|config| config.key().clone());
        }
        with_metrics(config, |metrics| metrics.record_switches(switched.len()));

        let fingerprint = structure_fingerprint(slots, &resolved);
        let relayout = state.last_env.as_ref() != Some(env)
            || state.fingerprint != Some(fingerprint)
            || state.geometry.is_none();

        if relayout {
            let geometry = solve(env, &config.settings, slots, &resolved);
            emit(
                config,
                event_with_fields(
                    LogLevel::Debug,
                    &config.log_target,
                    "relayout",
                    [
                        json_ser("viewport", &env.viewport()),
                        json_ser("remaining", &geometry.remaining),
                    ],
                ),
            );
            state.last_env = Some(env.clone());
            state.fingerprint = Some(fingerprint);
            state.geometry = Some(geometry);
        }
        with_metrics(config, |metrics| metrics.record_pass(relayout));

        if relayout || !switched.is_empty() {
            if let Some(geometry) = state.geometry.take() {
                let changed = state.retarget(&geometry, &switched);
                if !changed.is_empty() && state.timeline.is_running() {
                    with_metrics(config, LayoutMetrics::record_animation_started);
                    let names: Vec<&str> = changed.iter().map(|slot| slot.name()).collect();
                    emit(
                        config,
                        event_with_fields(
                            LogLevel::Debug,
                            &config.log_target,
                            "animation_started",
                            [
                                json_ser("slots", &names),
                                json_kv(
                                    "duration_ms",
                                    state.timeline.duration().as_millis() as u64,
                                ),
                            ],
                        ),
                    );
                }
                state.geometry = Some(geometry);
            }
        }

        let regions = match state.geometry.as_ref() {
            Some(geometry) => SlotId::ALL
                .into_iter()
                .filter_map(|slot| {
                    let placement = geometry.placement(slot)?;
                    Some(RegionFrame {
                        slot,
                        rect: state.displayed(slot).unwrap_or(placement.rect),
                        target: placement.rect,
                        visible: placement.visible,
                        animating: state.is_animating(slot),
                        children: state.switchers[slot].children(env),
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        LayoutFrame {
            viewport: env.viewport(),
            regions,
            progress: state.timeline.value(),
            relayout,
        }
    }
}

impl<C> fmt::Debug for AdaptiveLayout<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveLayout")
            .field("slots", &self.slots)
            .field("config", &self.config)
            .field("state", &self.state)
            .finish()
    }
}

fn solve<C: Measure>(
    env: &Environment,
    settings: &LayoutSettings,
    slots: &SlotMap<Option<SlotLayout<C>>>,
    resolved: &SlotMap<Option<&SlotConfig<C>>>,
) -> Geometry {
    let present = slots.map(|_, layout| layout.is_some());
    let secondary_has_content = resolved[SlotId::SecondaryBody]
        .is_some_and(|config| config.has_content());

    LayoutDelegate::solve(env, settings, &present, secondary_has_content, |slot, available| {
        resolved[slot]
            .and_then(|config| config.build(env))
            .map_or(Size::ZERO, |content| content.measure(available))
    })
}

/// Identity of the slot-to-config mapping: which slots exist, which key
/// each resolved to, and whether that config renders anything.
fn structure_fingerprint<C>(
    slots: &SlotMap<Option<SlotLayout<C>>>,
    resolved: &SlotMap<Option<&SlotConfig<C>>>,
) -> blake3::Hash {
    let mut hasher = blake3::Hasher::new();
    for slot in SlotId::ALL {
        hasher.update(&[slot as u8, slots[slot].is_some() as u8]);
        match resolved[slot] {
            Some(config) => {
                hasher.update(&[1, config.has_content() as u8]);
                hasher.update(config.key().as_str().as_bytes());
            }
            None => {
                hasher.update(&[0]);
            }
        }
        hasher.update(&[0xff]);
    }
    hasher.finalize()
}

fn emit(config: &LayoutConfig, event: LogEvent) {
    if let Some(logger) = &config.logger {
        let _ = logger.log_event(event);
    }
}

fn with_metrics(config: &LayoutConfig, f: impl FnOnce(&mut LayoutMetrics)) {
    if let Some(handle) = &config.metrics {
        if let Ok(mut metrics) = handle.lock() {
            f(&mut metrics);
        }
    }
}

/// Collects the per-slot breakpoint tables for an [`AdaptiveLayout`].
pub struct AdaptiveLayoutBuilder<C> {
    slots: SlotMap<Option<SlotLayout<C>>>,
    config: LayoutConfig,
}

impl<C> AdaptiveLayoutBuilder<C> {
    pub fn new() -> Self {
        Self {
            slots: SlotMap::from_fn(|_| None),
            config: LayoutConfig::default(),
        }
    }

    pub fn slot(mut self, slot: SlotId, layout: SlotLayout<C>) -> Self {
        self.slots[slot] = Some(layout);
        self
    }

    pub fn top_navigation(self, layout: SlotLayout<C>) -> Self {
        self.slot(SlotId::TopNavigation, layout)
    }

    pub fn bottom_navigation(self, layout: SlotLayout<C>) -> Self {
        self.slot(SlotId::BottomNavigation, layout)
    }

    pub fn primary_navigation(self, layout: SlotLayout<C>) -> Self {
        self.slot(SlotId::PrimaryNavigation, layout)
    }

    pub fn secondary_navigation(self, layout: SlotLayout<C>) -> Self {
        self.slot(SlotId::SecondaryNavigation, layout)
    }

    pub fn body(self, layout: SlotLayout<C>) -> Self {
        self.slot(SlotId::Body, layout)
    }

    pub fn secondary_body(self, layout: SlotLayout<C>) -> Self {
        self.slot(SlotId::SecondaryBody, layout)
    }

    pub fn settings(mut self, settings: LayoutSettings) -> Self {
        self.config.settings = settings;
        self
    }

    /// Replace the whole config, including logger and metrics.
    pub fn config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<AdaptiveLayout<C>> {
        self.config.settings.validate()?;
        let state = LayoutState::new(
            self.config.settings.animation_duration(),
            self.config.settings.switch_duration(),
        );
        Ok(AdaptiveLayout {
            slots: self.slots,
            config: self.config,
            state,
            started: Instant::now(),
        })
    }
}

impl<C> Default for AdaptiveLayoutBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::breakpoint::{Breakpoint, Breakpoints};
    use crate::content::{Block, RAIL_WIDTH};
    use crate::error::LayoutError;
    use crate::geometry::Rect;
    use crate::logging::{Logger, MemorySink};
    use crate::slot::{ChildPhase, transitions};

    const EPS: f64 = 1e-6;

    fn env(width: f64) -> Environment {
        Environment::new(Size::new(width, 800.0)).unwrap()
    }

    fn rail(key: &'static str, width: f64) -> SlotConfig<Block> {
        SlotConfig::new(key, move |_: &Environment| Block::new(key).with_width(width))
    }

    fn pane(key: &'static str) -> SlotConfig<Block> {
        SlotConfig::new(key, move |_: &Environment| Block::new(key))
            .with_enter(transitions::fade_in())
            .with_exit(transitions::fade_out())
    }

    fn engine(settings: LayoutSettings) -> AdaptiveLayout<Block> {
        AdaptiveLayout::builder()
            .primary_navigation(
                SlotLayout::builder()
                    .at(Breakpoints::medium(), rail("rail", RAIL_WIDTH))
                    .at(Breakpoints::large(), rail("extended", 192.0))
                    .build()
                    .unwrap(),
            )
            .body(
                SlotLayout::builder()
                    .at(Breakpoints::standard(), pane("body"))
                    .at(Breakpoints::small(), pane("small_body"))
                    .build()
                    .unwrap(),
            )
            .secondary_body(
                SlotLayout::builder()
                    .at(Breakpoints::standard(), pane("secondary"))
                    .hide_at(Breakpoints::small())
                    .build()
                    .unwrap(),
            )
            .settings(settings)
            .build()
            .unwrap()
    }

    fn assert_rect(actual: Option<Rect>, expected: Rect) {
        let actual = actual.expect("region should be laid out");
        assert!(
            actual.approx_eq(&expected, EPS),
            "expected {expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn first_pass_places_regions_without_animating() {
        let mut layout = engine(LayoutSettings::default());
        let frame = layout.layout(&env(1000.0));
        assert!(frame.relayout);
        assert_rect(frame.rect(SlotId::PrimaryNavigation), Rect::new(0.0, 0.0, 192.0, 800.0));
        assert_rect(frame.rect(SlotId::Body), Rect::new(192.0, 0.0, 308.0, 800.0));
        assert_rect(frame.rect(SlotId::SecondaryBody), Rect::new(500.0, 0.0, 500.0, 800.0));
        assert!(!frame.is_animating());
        assert!(!layout.is_animating());
    }

    #[test]
    fn unchanged_pass_reuses_geometry() {
        let mut layout = engine(LayoutSettings::default());
        layout.layout(&env(1000.0));
        let fingerprint = layout.state().fingerprint();
        let frame = layout.layout(&env(1000.0));
        assert!(!frame.relayout);
        assert_eq!(layout.state().fingerprint(), fingerprint);
    }

    #[test]
    fn mapping_change_relayouts_under_same_environment() {
        use std::sync::Arc;
        use std::sync::atomic::{AtomicBool, Ordering};

        let details = Arc::new(AtomicBool::new(false));
        let toggle = Arc::clone(&details);
        let mut layout = AdaptiveLayout::builder()
            .body(
                SlotLayout::builder()
                    .at(Breakpoints::standard(), pane("body"))
                    .build()
                    .unwrap(),
            )
            .secondary_body(
                SlotLayout::builder()
                    .at(
                        Breakpoint::new("details", move |_: &Environment| {
                            toggle.load(Ordering::SeqCst)
                        }),
                        pane("details"),
                    )
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let viewport = env(1000.0);
        let frame = layout.layout(&viewport);
        assert_rect(frame.rect(SlotId::Body), Rect::new(0.0, 0.0, 1000.0, 800.0));
        assert!(!layout.layout(&viewport).relayout);

        details.store(true, Ordering::SeqCst);
        let frame = layout.layout(&viewport);
        assert!(frame.relayout);
        let body = frame.region(SlotId::Body).unwrap();
        assert!(body.animating);
        assert_rect(Some(body.target), Rect::new(0.0, 0.0, 500.0, 800.0));
        assert_rect(
            layout.state().target(SlotId::SecondaryBody),
            Rect::new(500.0, 0.0, 500.0, 800.0),
        );
    }

    #[test]
    fn resize_tweens_on_shared_timeline() {
        let mut layout = engine(LayoutSettings::default());
        layout.layout(&env(1000.0));
        let frame = layout.layout(&env(700.0));
        assert!(frame.relayout);

        let body = frame.region(SlotId::Body).unwrap();
        assert!(body.animating);
        assert_rect(Some(body.target), Rect::new(72.0, 0.0, 278.0, 800.0));
        assert_rect(Some(body.rect), Rect::new(192.0, 0.0, 308.0, 800.0));
        assert!(layout.state().is_animating(SlotId::PrimaryNavigation));

        layout.tick(Duration::from_millis(500));
        let frame = layout.layout(&env(700.0));
        assert!(!frame.relayout);
        let body = frame.rect(SlotId::Body).unwrap();
        assert!((body.x - 132.0).abs() < EPS);

        layout.tick(Duration::from_millis(500));
        let frame = layout.layout(&env(700.0));
        assert_rect(frame.rect(SlotId::Body), Rect::new(72.0, 0.0, 278.0, 800.0));
        assert_eq!(layout.state().animating().count(), 0);
        assert_eq!(
            layout.state().committed(SlotId::Body),
            layout.state().target(SlotId::Body)
        );
    }

    #[test]
    fn disabled_animations_snap_to_target() {
        let mut layout = engine(LayoutSettings::default().with_internal_animations(false));
        layout.layout(&env(1000.0));
        let frame = layout.layout(&env(700.0));
        let body = frame.region(SlotId::Body).unwrap();
        assert!(!body.animating);
        assert_eq!(body.rect, body.target);
        assert_eq!(layout.state().committed(SlotId::Body), Some(body.target));
    }

    #[test]
    fn key_change_keeps_outgoing_for_one_cycle() {
        let mut layout = engine(LayoutSettings::default());
        layout.layout(&env(1000.0));
        let frame = layout.layout(&env(400.0));

        let body = frame.region(SlotId::Body).unwrap();
        let keys: Vec<&str> = body.child_keys().map(|key| key.as_str()).collect();
        assert_eq!(keys, vec!["body", "small_body"]);
        assert_eq!(body.children[0].phase, ChildPhase::Exiting);
        assert_eq!(
            layout.state().resolved_key(SlotId::Body).map(|key| key.as_str()),
            Some("small_body")
        );

        let secondary = frame.region(SlotId::SecondaryBody).unwrap();
        assert!(!secondary.visible);
        assert_eq!(secondary.target.width, 0.0);

        layout.tick(Duration::from_millis(1000));
        let frame = layout.layout(&env(400.0));
        let body = frame.region(SlotId::Body).unwrap();
        let keys: Vec<&str> = body.child_keys().map(|key| key.as_str()).collect();
        assert_eq!(keys, vec!["small_body"]);
        assert!(!layout.is_animating());
    }

    #[test]
    fn retarget_mid_flight_restarts_timeline() {
        let mut layout = engine(LayoutSettings::default());
        layout.layout(&env(1000.0));
        layout.layout(&env(700.0));
        layout.tick(Duration::from_millis(400));
        assert!(layout.state().timeline().value() > 0.0);

        layout.layout(&env(760.0));
        assert_eq!(layout.state().timeline().value(), 0.0);
        assert!(layout.state().timeline().is_running());
        assert_rect(
            layout.state().committed(SlotId::Body),
            Rect::new(72.0, 0.0, 278.0, 800.0),
        );
    }

    #[test]
    fn logs_and_counts_passes() {
        let sink = MemorySink::new();
        let mut config = LayoutConfig::default().with_logger(Logger::new(sink.clone()));
        config.enable_metrics();
        let mut layout = AdaptiveLayout::builder()
            .config(config)
            .body(
                SlotLayout::builder()
                    .at(Breakpoints::standard(), pane("body"))
                    .at(Breakpoints::small(), pane("small_body"))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        layout.layout(&env(1000.0));
        layout.layout(&env(1000.0));
        layout.layout(&env(400.0));
        layout.tick(Duration::from_millis(1000));

        let messages = sink.messages();
        assert!(messages.contains(&"relayout".to_string()));
        assert!(messages.contains(&"slot_switched".to_string()));
        assert!(messages.contains(&"animation_settled".to_string()));

        let snapshot = layout.metrics_snapshot().unwrap();
        assert_eq!(snapshot.passes, 3);
        assert_eq!(snapshot.relayouts, 2);
        assert_eq!(snapshot.skipped_relayouts, 1);
        assert_eq!(snapshot.slot_switches, 1);
        assert_eq!(snapshot.animations_started, 1);
        assert_eq!(snapshot.animations_settled, 1);
    }

    #[test]
    fn invalid_settings_fail_at_build() {
        let err = AdaptiveLayout::<Block>::builder()
            .settings(LayoutSettings::default().with_body_ratio(1.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::InvalidRatio(_)));
    }

    #[test]
    fn reset_forgets_history() {
        let mut layout = engine(LayoutSettings::default());
        layout.layout(&env(1000.0));
        layout.reset();
        assert!(layout.state().geometry().is_none());
        let frame = layout.layout(&env(700.0));
        assert!(!frame.is_animating());
    }
}
