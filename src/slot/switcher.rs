use std::fmt;
use std::time::Duration;

use crate::animation::{Timeline, TimelineStatus};
use crate::environment::Environment;

use super::config::SlotConfig;
use super::id::SlotKey;

/// Default time an incoming or outgoing child spends transitioning.
pub const DEFAULT_SWITCH_DURATION: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChildPhase {
    /// Incoming content whose enter transition is still running.
    Entering,
    /// Settled content.
    Present,
    /// Outgoing content playing its exit transition.
    Exiting,
}

/// Content of one child of a slot after its transition was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedChild<C> {
    pub key: SlotKey,
    pub phase: ChildPhase,
    pub content: C,
}

fn key_of<C>(config: Option<&SlotConfig<C>>) -> &str {
    config.map_or(SlotKey::EMPTY, |config| config.key().as_str())
}

/// Stateless form of a switch: what a slot shows at `progress` through a
/// change from `previous` to `resolved`.
///
/// Children come back bottom to top, so outgoing content sits beneath the
/// incoming content. Outgoing content without an exit transition is dropped
/// at once.
pub fn render_switch<C>(
    env: &Environment,
    previous: Option<&SlotConfig<C>>,
    resolved: Option<&SlotConfig<C>>,
    progress: f64,
) -> Vec<RenderedChild<C>> {
    let progress = progress.clamp(0.0, 1.0);
    let mut children = Vec::with_capacity(2);

    if key_of(previous) == key_of(resolved) {
        if let Some(config) = resolved {
            if let Some(content) = config.build(env) {
                children.push(RenderedChild {
                    key: config.key().clone(),
                    phase: ChildPhase::Present,
                    content,
                });
            }
        }
        return children;
    }

    if let Some(outgoing) = previous {
        if outgoing.exit().is_animated() && progress < 1.0 {
            if let Some(content) = outgoing.build(env) {
                children.push(RenderedChild {
                    key: outgoing.key().clone(),
                    phase: ChildPhase::Exiting,
                    content: outgoing.exit().apply(content, progress),
                });
            }
        }
    }

    if let Some(incoming) = resolved {
        if let Some(content) = incoming.build(env) {
            let phase = if incoming.enter().is_animated() && progress < 1.0 {
                ChildPhase::Entering
            } else {
                ChildPhase::Present
            };
            children.push(RenderedChild {
                key: incoming.key().clone(),
                phase,
                content: incoming.enter().apply(content, progress),
            });
        }
    }

    children
}

struct LiveChild<C> {
    config: SlotConfig<C>,
    clock: Timeline,
}

/// Per-slot switch state: the current child plus any children still playing
/// their exit transition.
///
/// Each child owns a clock. The incoming clock runs forward and feeds the
/// enter transition directly. An outgoing clock runs in reverse from wherever
/// it was, and its exit transition sees `1 - clock`, so exit progress always
/// climbs towards 1.
pub struct SlotSwitcher<C> {
    duration: Duration,
    current: Option<LiveChild<C>>,
    exiting: Vec<LiveChild<C>>,
    installed: bool,
}

impl<C> SlotSwitcher<C> {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
            exiting: Vec::new(),
            installed: false,
        }
    }

    pub fn current(&self) -> Option<&SlotConfig<C>> {
        self.current.as_ref().map(|child| &child.config)
    }

    pub fn current_key(&self) -> &str {
        key_of(self.current())
    }

    pub fn exiting_keys(&self) -> impl Iterator<Item = &SlotKey> {
        self.exiting.iter().map(|child| child.config.key())
    }

    pub fn is_transitioning(&self) -> bool {
        !self.exiting.is_empty()
            || self
                .current
                .as_ref()
                .is_some_and(|child| child.clock.is_running())
    }

    /// Point the slot at `next`. Returns `true` when the key changed and a
    /// transition was started. The first call installs without animating.
    pub fn switch_to(&mut self, next: Option<&SlotConfig<C>>) -> bool {
        if !self.installed {
            self.installed = true;
            self.current = next.map(|config| LiveChild {
                config: config.clone(),
                clock: Timeline::completed(self.duration),
            });
            return false;
        }

        if self.current_key() == key_of(next) {
            return false;
        }

        if let Some(mut outgoing) = self.current.take() {
            if outgoing.config.has_content() && outgoing.config.exit().is_animated() {
                outgoing.clock.reverse();
                if outgoing.clock.is_running() {
                    self.exiting.push(outgoing);
                }
            }
        }

        let incoming_key = key_of(next).to_string();
        self.exiting
            .retain(|child| child.config.key().as_str() != incoming_key);

        self.current = next.map(|config| {
            let clock = if config.enter().is_animated() {
                let mut clock = Timeline::new(self.duration);
                clock.forward();
                clock
            } else {
                Timeline::completed(self.duration)
            };
            LiveChild {
                config: config.clone(),
                clock,
            }
        });
        true
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(current) = self.current.as_mut() {
            current.clock.tick(dt);
        }
        for child in &mut self.exiting {
            child.clock.tick(dt);
        }
        self.exiting
            .retain(|child| child.clock.status() != TimelineStatus::Dismissed);
    }

    /// Build every live child, bottom to top, with transitions applied.
    pub fn children(&self, env: &Environment) -> Vec<RenderedChild<C>> {
        let mut children = Vec::with_capacity(self.exiting.len() + 1);

        for child in &self.exiting {
            if let Some(content) = child.config.build(env) {
                children.push(RenderedChild {
                    key: child.config.key().clone(),
                    phase: ChildPhase::Exiting,
                    content: child
                        .config
                        .exit()
                        .apply(content, 1.0 - child.clock.value()),
                });
            }
        }

        if let Some(child) = &self.current {
            if let Some(content) = child.config.build(env) {
                let phase = if child.clock.is_running() {
                    ChildPhase::Entering
                } else {
                    ChildPhase::Present
                };
                children.push(RenderedChild {
                    key: child.config.key().clone(),
                    phase,
                    content: child.config.enter().apply(content, child.clock.value()),
                });
            }
        }

        children
    }
}

impl<C> Default for SlotSwitcher<C> {
    fn default() -> Self {
        Self::new(DEFAULT_SWITCH_DURATION)
    }
}

impl<C> fmt::Debug for SlotSwitcher<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotSwitcher")
            .field("duration", &self.duration)
            .field("current", &self.current_key())
            .field("exiting", &self.exiting_keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Block;
    use crate::geometry::Size;
    use crate::slot::transitions;

    fn env() -> Environment {
        Environment::new(Size::new(800.0, 600.0)).unwrap()
    }

    fn block(key: &'static str) -> SlotConfig<Block> {
        SlotConfig::new(key, move |_: &Environment| Block::new(key))
            .with_enter(transitions::fade_in())
            .with_exit(transitions::fade_out())
    }

    fn keys(children: &[RenderedChild<Block>]) -> Vec<&str> {
        children.iter().map(|child| child.key.as_str()).collect()
    }

    #[test]
    fn first_install_does_not_animate() {
        let mut switcher = SlotSwitcher::default();
        let config = block("a");
        assert!(!switcher.switch_to(Some(&config)));
        let children = switcher.children(&env());
        assert_eq!(keys(&children), vec!["a"]);
        assert_eq!(children[0].phase, ChildPhase::Present);
        assert!(!switcher.is_transitioning());
    }

    #[test]
    fn outgoing_survives_one_full_cycle() {
        let mut switcher = SlotSwitcher::default();
        let a = block("a");
        let b = block("b");
        switcher.switch_to(Some(&a));
        assert!(switcher.switch_to(Some(&b)));

        switcher.tick(Duration::from_millis(500));
        let children = switcher.children(&env());
        assert_eq!(keys(&children), vec!["a", "b"]);
        assert_eq!(children[0].phase, ChildPhase::Exiting);
        assert_eq!(children[1].phase, ChildPhase::Entering);
        assert!(children[0].content.opacity < 1.0);
        assert!(children[1].content.opacity < 1.0);

        switcher.tick(Duration::from_millis(500));
        let children = switcher.children(&env());
        assert_eq!(keys(&children), vec!["b"]);
        assert_eq!(children[0].phase, ChildPhase::Present);
        assert!((children[0].content.opacity - 1.0).abs() < 1e-9);
        assert!(!switcher.is_transitioning());
    }

    #[test]
    fn same_key_is_not_a_switch() {
        let mut switcher = SlotSwitcher::default();
        let a = block("a");
        switcher.switch_to(Some(&a));
        assert!(!switcher.switch_to(Some(&a.clone())));
    }

    #[test]
    fn missing_exit_transition_swaps_instantly() {
        let mut switcher = SlotSwitcher::default();
        let plain = SlotConfig::new("plain", |_: &Environment| Block::new("plain"));
        let b = block("b");
        switcher.switch_to(Some(&plain));
        switcher.switch_to(Some(&b));
        assert_eq!(keys(&switcher.children(&env())), vec!["b"]);
    }

    #[test]
    fn switching_to_nothing_leaves_only_the_exit() {
        let mut switcher = SlotSwitcher::default();
        let a = block("a");
        switcher.switch_to(Some(&a));
        assert!(switcher.switch_to(None));
        let children = switcher.children(&env());
        assert_eq!(keys(&children), vec!["a"]);
        assert_eq!(children[0].phase, ChildPhase::Exiting);
        switcher.tick(DEFAULT_SWITCH_DURATION);
        assert!(switcher.children(&env()).is_empty());
    }

    #[test]
    fn switching_back_drops_the_stale_exit() {
        let mut switcher = SlotSwitcher::default();
        let a = block("a");
        let b = block("b");
        switcher.switch_to(Some(&a));
        switcher.switch_to(Some(&b));
        switcher.tick(Duration::from_millis(200));
        switcher.switch_to(Some(&a));
        let children = switcher.children(&env());
        assert_eq!(keys(&children), vec!["b", "a"]);
    }

    #[test]
    fn render_switch_orders_outgoing_beneath_incoming() {
        let a = block("a");
        let b = block("b");
        let children = render_switch(&env(), Some(&a), Some(&b), 0.25);
        assert_eq!(keys(&children), vec!["a", "b"]);
        assert_eq!(children[0].phase, ChildPhase::Exiting);

        let settled = render_switch(&env(), Some(&a), Some(&b), 1.0);
        assert_eq!(keys(&settled), vec!["b"]);
        assert_eq!(settled[0].phase, ChildPhase::Present);
    }

    #[test]
    fn render_switch_without_change_has_no_transition() {
        let a = block("a");
        let children = render_switch(&env(), Some(&a), Some(&a), 0.3);
        assert_eq!(keys(&children), vec!["a"]);
        assert_eq!(children[0].content.opacity, 1.0);
    }
}
