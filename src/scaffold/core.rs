use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use crate::breakpoint::{Breakpoint, Breakpoints};
use crate::content::{Destination, Measure, NavigationKind, NavigationView, Presentable};
use crate::environment::Environment;
use crate::error::{LayoutError, Result};
use crate::layout::{AdaptiveLayout, LayoutConfig, LayoutFrame, LayoutSettings};
use crate::logging::{LogLevel, Logger, SCAFFOLD_TARGET, event_with_fields, json_kv, json_str};
use crate::slot::{ContentBuilder, SlotConfig, SlotLayout, transitions};

/// Called with the new index whenever a destination is selected.
pub type SelectionCallback = Arc<dyn Fn(usize) + Send + Sync>;

/// The four breakpoints the scaffold switches navigation on.
#[derive(Debug, Clone)]
pub struct ScaffoldBreakpoints {
    pub small: Breakpoint,
    pub medium: Breakpoint,
    pub large: Breakpoint,
    /// While active (and drawers are enabled) the bottom bar gives way to an
    /// app bar plus drawer.
    pub drawer: Breakpoint,
}

impl Default for ScaffoldBreakpoints {
    fn default() -> Self {
        Self {
            small: Breakpoints::small(),
            medium: Breakpoints::medium(),
            large: Breakpoints::large(),
            drawer: Breakpoints::small_desktop(),
        }
    }
}

enum SecondaryOverride<C> {
    Content(ContentBuilder<C>),
    Hidden,
}

/// Everything a scaffold frame contains.
#[derive(Debug, Clone)]
pub struct ScaffoldFrame<C> {
    pub layout: LayoutFrame<C>,
    /// Drawer content, present while the drawer breakpoint is active.
    pub drawer: Option<C>,
}

/// Opinionated six-slot layout with navigation that follows the window size:
/// a bottom bar on small screens, a rail on medium, an extended rail on large.
pub struct AdaptiveScaffold<C> {
    layout: AdaptiveLayout<C>,
    destinations: Arc<Vec<Destination>>,
    selection: Arc<RwLock<Option<usize>>>,
    breakpoints: ScaffoldBreakpoints,
    use_drawer: bool,
    on_selected: Option<SelectionCallback>,
    logger: Option<Logger>,
}

impl<C> AdaptiveScaffold<C> {
    pub fn builder() -> ScaffoldBuilder<C> {
        ScaffoldBuilder::new()
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    pub fn selected_index(&self) -> Option<usize> {
        *self
            .selection
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn breakpoints(&self) -> &ScaffoldBreakpoints {
        &self.breakpoints
    }

    pub fn layout_engine(&self) -> &AdaptiveLayout<C> {
        &self.layout
    }

    /// Select destination `index`; navigation content picks it up on the
    /// next layout pass.
    pub fn select(&self, index: usize) -> Result<()> {
        let len = self.destinations.len();
        if index >= len {
            return Err(LayoutError::DestinationOutOfRange { index, len });
        }

        *self
            .selection
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(index);

        if let Some(logger) = &self.logger {
            let _ = logger.log_event(event_with_fields(
                LogLevel::Info,
                SCAFFOLD_TARGET,
                "destination_selected",
                [
                    json_kv("index", index as u64),
                    json_str("label", self.destinations[index].label.as_str()),
                ],
            ));
        }
        if let Some(callback) = &self.on_selected {
            callback(index);
        }
        Ok(())
    }

    pub fn tick(&mut self, dt: Duration) {
        self.layout.tick(dt);
    }

    pub fn is_animating(&self) -> bool {
        self.layout.is_animating()
    }

    fn drawer_active(&self, env: &Environment) -> bool {
        self.use_drawer && !self.destinations.is_empty() && self.breakpoints.drawer.is_active(env)
    }
}

impl<C> AdaptiveScaffold<C>
where
    C: From<NavigationView> + Measure,
{
    pub fn layout(&mut self, env: &Environment) -> ScaffoldFrame<C> {
        let drawer = self.drawer_active(env).then(|| {
            C::from(NavigationView {
                kind: NavigationKind::Drawer,
                destinations: self.destinations.to_vec(),
                selected: self.selected_index(),
            })
        });
        ScaffoldFrame {
            layout: self.layout.layout(env),
            drawer,
        }
    }
}

impl<C> fmt::Debug for AdaptiveScaffold<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdaptiveScaffold")
            .field("destinations", &self.destinations)
            .field("selected", &self.selected_index())
            .field("breakpoints", &self.breakpoints)
            .field("use_drawer", &self.use_drawer)
            .field("layout", &self.layout)
            .finish_non_exhaustive()
    }
}

pub struct ScaffoldBuilder<C> {
    destinations: Vec<Destination>,
    selected: Option<usize>,
    breakpoints: ScaffoldBreakpoints,
    use_drawer: bool,
    body: Option<ContentBuilder<C>>,
    small_body: Option<ContentBuilder<C>>,
    large_body: Option<ContentBuilder<C>>,
    secondary_body: Option<ContentBuilder<C>>,
    small_secondary_body: Option<SecondaryOverride<C>>,
    large_secondary_body: Option<ContentBuilder<C>>,
    config: LayoutConfig,
    on_selected: Option<SelectionCallback>,
}

impl<C> ScaffoldBuilder<C> {
    pub fn new() -> Self {
        Self {
            destinations: Vec::new(),
            selected: None,
            breakpoints: ScaffoldBreakpoints::default(),
            use_drawer: true,
            body: None,
            small_body: None,
            large_body: None,
            secondary_body: None,
            small_secondary_body: None,
            large_secondary_body: None,
            config: LayoutConfig::default(),
            on_selected: None,
        }
    }

    pub fn destinations(mut self, destinations: impl IntoIterator<Item = Destination>) -> Self {
        self.destinations = destinations.into_iter().collect();
        self
    }

    pub fn selected_index(mut self, index: usize) -> Self {
        self.selected = Some(index);
        self
    }

    pub fn breakpoints(mut self, breakpoints: ScaffoldBreakpoints) -> Self {
        self.breakpoints = breakpoints;
        self
    }

    pub fn use_drawer(mut self, use_drawer: bool) -> Self {
        self.use_drawer = use_drawer;
        self
    }

    pub fn body<F>(mut self, f: F) -> Self
    where
        F: Fn(&Environment) -> C + Send + Sync + 'static,
    {
        self.body = Some(Arc::new(f));
        self
    }

    pub fn small_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&Environment) -> C + Send + Sync + 'static,
    {
        self.small_body = Some(Arc::new(f));
        self
    }

    pub fn large_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&Environment) -> C + Send + Sync + 'static,
    {
        self.large_body = Some(Arc::new(f));
        self
    }

    pub fn secondary_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&Environment) -> C + Send + Sync + 'static,
    {
        self.secondary_body = Some(Arc::new(f));
        self
    }

    pub fn small_secondary_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&Environment) -> C + Send + Sync + 'static,
    {
        self.small_secondary_body = Some(SecondaryOverride::Content(Arc::new(f)));
        self
    }

    /// Render no secondary body while the small breakpoint is active.
    pub fn hide_secondary_body_on_small(mut self) -> Self {
        self.small_secondary_body = Some(SecondaryOverride::Hidden);
        self
    }

    pub fn large_secondary_body<F>(mut self, f: F) -> Self
    where
        F: Fn(&Environment) -> C + Send + Sync + 'static,
    {
        self.large_secondary_body = Some(Arc::new(f));
        self
    }

    pub fn settings(mut self, settings: LayoutSettings) -> Self {
        self.config.settings = settings;
        self
    }

    /// Replace the engine config, including logger and metrics.
    pub fn config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.config.logger = Some(logger);
        self
    }

    pub fn on_selected_index_change<F>(mut self, f: F) -> Self
    where
        F: Fn(usize) + Send + Sync + 'static,
    {
        self.on_selected = Some(Arc::new(f));
        self
    }
}

impl<C> ScaffoldBuilder<C>
where
    C: From<NavigationView> + Presentable + 'static,
{
    pub fn build(self) -> Result<AdaptiveScaffold<C>> {
        let count = self.destinations.len();
        if count == 1 {
            return Err(LayoutError::TooFewDestinations(count));
        }
        if let Some(index) = self.selected {
            if index >= count {
                return Err(LayoutError::DestinationOutOfRange { index, len: count });
            }
        }

        let destinations = Arc::new(self.destinations);
        let selection = Arc::new(RwLock::new(self.selected));
        let nav = |kind| navigation::<C>(kind, &destinations, &selection);
        let bp = &self.breakpoints;

        let mut engine = AdaptiveLayout::builder().config(self.config.clone());

        if count > 0 {
            if self.use_drawer {
                engine = engine.top_navigation(
                    SlotLayout::builder()
                        .at(bp.drawer.clone(), nav(NavigationKind::AppBar).key("app_bar"))
                        .build()?,
                );
            }

            let mut bottom = SlotLayout::builder().at(
                bp.small.clone(),
                nav(NavigationKind::BottomBar)
                    .key("bottom_navigation")
                    .with_enter(transitions::bottom_to_top())
                    .with_exit(transitions::top_to_bottom()),
            );
            if self.use_drawer {
                bottom = bottom.hide_at(bp.drawer.clone());
            }
            engine = engine.bottom_navigation(bottom.build()?);

            engine = engine.primary_navigation(
                SlotLayout::builder()
                    .at(
                        bp.medium.clone(),
                        nav(NavigationKind::Rail)
                            .key("primary_navigation")
                            .with_enter(transitions::left_out_in()),
                    )
                    .at(
                        bp.large.clone(),
                        nav(NavigationKind::ExtendedRail)
                            .key("primary_navigation_extended")
                            .with_enter(transitions::left_out_in()),
                    )
                    .build()?,
            );
        }

        if self.body.is_some() || self.small_body.is_some() || self.large_body.is_some() {
            let mut body = SlotLayout::builder();
            for (breakpoint, key, builder) in [
                (Breakpoints::standard(), "body", self.body),
                (bp.small.clone(), "small_body", self.small_body),
                (bp.large.clone(), "large_body", self.large_body),
            ] {
                if let Some(builder) = builder {
                    body = body.at(breakpoint, faded(key, builder));
                }
            }
            engine = engine.body(body.build()?);
        }

        if self.secondary_body.is_some()
            || self.small_secondary_body.is_some()
            || self.large_secondary_body.is_some()
        {
            let mut secondary = SlotLayout::builder();
            if let Some(builder) = self.secondary_body {
                secondary = secondary.at(
                    Breakpoints::standard(),
                    SlotConfig::from_builder("secondary_body", builder)
                        .with_exit(transitions::stay_on_screen()),
                );
            }
            match self.small_secondary_body {
                Some(SecondaryOverride::Content(builder)) => {
                    secondary =
                        secondary.at(bp.small.clone(), faded("small_secondary_body", builder));
                }
                Some(SecondaryOverride::Hidden) => {
                    secondary = secondary.hide_at(bp.small.clone());
                }
                None => {}
            }
            if let Some(builder) = self.large_secondary_body {
                secondary = secondary.at(bp.large.clone(), faded("large_secondary_body", builder));
            }
            engine = engine.secondary_body(secondary.build()?);
        }

        Ok(AdaptiveScaffold {
            layout: engine.build()?,
            destinations,
            selection,
            breakpoints: self.breakpoints,
            use_drawer: self.use_drawer,
            on_selected: self.on_selected,
            logger: self.config.logger,
        })
    }
}

impl<C> Default for ScaffoldBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Navigation content builder that reads the live selection on every build.
struct NavigationSource<C> {
    builder: ContentBuilder<C>,
}

impl<C> NavigationSource<C> {
    fn key(self, key: &str) -> SlotConfig<C> {
        SlotConfig::from_builder(key, self.builder)
    }
}

fn navigation<C>(
    kind: NavigationKind,
    destinations: &Arc<Vec<Destination>>,
    selection: &Arc<RwLock<Option<usize>>>,
) -> NavigationSource<C>
where
    C: From<NavigationView> + 'static,
{
    let destinations = Arc::clone(destinations);
    let selection = Arc::clone(selection);
    NavigationSource {
        builder: Arc::new(move |_: &Environment| {
            let selected = *selection.read().unwrap_or_else(PoisonError::into_inner);
            C::from(NavigationView {
                kind,
                destinations: destinations.to_vec(),
                selected,
            })
        }),
    }
}

fn faded<C: Presentable + 'static>(key: &str, builder: ContentBuilder<C>) -> SlotConfig<C> {
    SlotConfig::from_builder(key, builder)
        .with_enter(transitions::fade_in())
        .with_exit(transitions::fade_out())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{BOTTOM_BAR_HEIGHT, Block, DRAWER_WIDTH, EXTENDED_RAIL_WIDTH, Labelled, RAIL_WIDTH};
    use crate::environment::Platform;
    use crate::geometry::{Rect, Size};
    use crate::logging::MemorySink;
    use crate::slot::SlotId;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn destinations() -> Vec<Destination> {
        vec![
            Destination::new("Inbox", "inbox"),
            Destination::new("Articles", "article"),
            Destination::new("Chat", "chat"),
        ]
    }

    fn mobile(width: f64) -> Environment {
        Environment::builder(Size::new(width, 800.0))
            .platform(Platform::Android)
            .build()
            .unwrap()
    }

    fn desktop(width: f64) -> Environment {
        Environment::builder(Size::new(width, 800.0))
            .platform(Platform::Linux)
            .build()
            .unwrap()
    }

    fn scaffold() -> AdaptiveScaffold<Block> {
        AdaptiveScaffold::builder()
            .destinations(destinations())
            .selected_index(0)
            .body(|_: &Environment| Block::new("body"))
            .secondary_body(|_: &Environment| Block::new("secondary"))
            .hide_secondary_body_on_small()
            .build()
            .unwrap()
    }

    fn label(frame: &ScaffoldFrame<Block>, slot: SlotId) -> Option<String> {
        frame
            .layout
            .content(slot)
            .map(|content| content.label().to_string())
    }

    #[test]
    fn small_mobile_uses_bottom_bar() {
        let mut scaffold = scaffold();
        let frame = scaffold.layout(&mobile(400.0));
        assert!(frame.drawer.is_none());
        assert_eq!(
            frame.layout.rect(SlotId::BottomNavigation),
            Some(Rect::new(0.0, 800.0 - BOTTOM_BAR_HEIGHT, 400.0, BOTTOM_BAR_HEIGHT))
        );
        assert_eq!(
            frame.layout.rect(SlotId::Body),
            Some(Rect::new(0.0, 0.0, 400.0, 800.0 - BOTTOM_BAR_HEIGHT))
        );
        assert_eq!(
            label(&frame, SlotId::BottomNavigation).as_deref(),
            Some("BottomBar [Inbox]")
        );
        let secondary = frame.layout.region(SlotId::SecondaryBody).unwrap();
        assert!(!secondary.visible);
    }

    #[test]
    fn medium_uses_rail_and_large_extended_rail() {
        let mut scaffold = scaffold();
        let frame = scaffold.layout(&mobile(700.0));
        let rail = frame.layout.rect(SlotId::PrimaryNavigation).unwrap();
        assert_eq!(rail.width, RAIL_WIDTH);
        assert_eq!(frame.layout.rect(SlotId::BottomNavigation).unwrap().height, 0.0);
        assert_eq!(
            frame.layout.rect(SlotId::Body),
            Some(Rect::new(RAIL_WIDTH, 0.0, 350.0 - RAIL_WIDTH, 800.0))
        );

        let mut scaffold = self::scaffold();
        let frame = scaffold.layout(&mobile(1200.0));
        assert_eq!(
            frame.layout.rect(SlotId::PrimaryNavigation).unwrap().width,
            EXTENDED_RAIL_WIDTH
        );
        assert_eq!(
            label(&frame, SlotId::PrimaryNavigation).as_deref(),
            Some("ExtendedRail [Inbox]")
        );
    }

    #[test]
    fn small_desktop_swaps_bottom_bar_for_drawer() {
        let mut scaffold = scaffold();
        let frame = scaffold.layout(&desktop(400.0));
        let drawer = frame.drawer.expect("drawer on small desktop");
        assert_eq!(drawer.width, Some(DRAWER_WIDTH));
        assert_eq!(frame.layout.rect(SlotId::TopNavigation).unwrap().height, 56.0);
        assert_eq!(frame.layout.rect(SlotId::BottomNavigation).unwrap().height, 0.0);
        assert!(frame.layout.content(SlotId::BottomNavigation).is_none());
    }

    #[test]
    fn drawer_can_be_disabled() {
        let mut scaffold = AdaptiveScaffold::<Block>::builder()
            .destinations(destinations())
            .use_drawer(false)
            .body(|_: &Environment| Block::new("body"))
            .build()
            .unwrap();
        let frame = scaffold.layout(&desktop(400.0));
        assert!(frame.drawer.is_none());
        assert!(frame.layout.region(SlotId::TopNavigation).is_none());
        assert_eq!(
            frame.layout.rect(SlotId::BottomNavigation).unwrap().height,
            BOTTOM_BAR_HEIGHT
        );
    }

    #[test]
    fn select_updates_navigation_and_fires_callback() {
        let calls = Arc::new(AtomicUsize::new(usize::MAX));
        let seen = Arc::clone(&calls);
        let sink = MemorySink::new();
        let mut scaffold = AdaptiveScaffold::<Block>::builder()
            .destinations(destinations())
            .logger(Logger::new(sink.clone()))
            .on_selected_index_change(move |index| seen.store(index, Ordering::SeqCst))
            .body(|_: &Environment| Block::new("body"))
            .build()
            .unwrap();

        scaffold.select(1).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(scaffold.selected_index(), Some(1));
        assert!(sink.messages().contains(&"destination_selected".to_string()));

        let frame = scaffold.layout(&mobile(400.0));
        assert_eq!(
            label(&frame, SlotId::BottomNavigation).as_deref(),
            Some("BottomBar [Articles]")
        );

        let err = scaffold.select(3).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::DestinationOutOfRange { index: 3, len: 3 }
        ));
        assert_eq!(scaffold.selected_index(), Some(1));
    }

    #[test]
    fn destination_count_is_validated() {
        let err = AdaptiveScaffold::<Block>::builder()
            .destinations([Destination::new("Only", "one")])
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::TooFewDestinations(1)));

        let err = AdaptiveScaffold::<Block>::builder()
            .destinations(destinations())
            .selected_index(7)
            .build()
            .unwrap_err();
        assert!(matches!(err, LayoutError::DestinationOutOfRange { index: 7, .. }));
    }

    #[test]
    fn body_variants_follow_breakpoints() {
        let mut scaffold = AdaptiveScaffold::<Block>::builder()
            .body(|_: &Environment| Block::new("body"))
            .small_body(|_: &Environment| Block::new("small"))
            .large_body(|_: &Environment| Block::new("large"))
            .build()
            .unwrap();
        let frame = scaffold.layout(&mobile(400.0));
        assert_eq!(label(&frame, SlotId::Body).as_deref(), Some("small"));

        let mut scaffold_medium = AdaptiveScaffold::<Block>::builder()
            .body(|_: &Environment| Block::new("body"))
            .small_body(|_: &Environment| Block::new("small"))
            .build()
            .unwrap();
        let frame = scaffold_medium.layout(&mobile(700.0));
        assert_eq!(label(&frame, SlotId::Body).as_deref(), Some("body"));

        let frame = scaffold.layout(&mobile(1200.0));
        let keys: Vec<&str> = frame
            .layout
            .region(SlotId::Body)
            .unwrap()
            .child_keys()
            .map(|key| key.as_str())
            .collect();
        assert_eq!(keys, vec!["small_body", "large_body"]);
        scaffold.tick(Duration::from_secs(1));
        assert!(!scaffold.is_animating());
        let frame = scaffold.layout(&mobile(1200.0));
        assert_eq!(label(&frame, SlotId::Body).as_deref(), Some("large"));
    }
}
