use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::environment::{Environment, Platform};
use crate::error::{LayoutError, Result};

/// Upper bound (exclusive) of the small window class.
pub const SMALL_WIDTH: f64 = 600.0;
/// Upper bound (exclusive) of the medium window class.
pub const MEDIUM_WIDTH: f64 = 840.0;

/// Arbitrary activation test over an environment snapshot.
pub type Predicate = Arc<dyn Fn(&Environment) -> bool + Send + Sync>;

/// Which host platforms a width rule applies to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PlatformFilter {
    #[default]
    Any,
    Desktop,
    Mobile,
}

impl PlatformFilter {
    pub fn matches(self, platform: Platform) -> bool {
        match self {
            PlatformFilter::Any => true,
            PlatformFilter::Desktop => platform.is_desktop(),
            PlatformFilter::Mobile => platform.is_mobile(),
        }
    }
}

/// Half-open viewport width range `[begin, end)` with an optional platform
/// restriction. Missing bounds are unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WidthRule {
    pub begin: Option<f64>,
    pub end: Option<f64>,
    pub platforms: PlatformFilter,
}

impl WidthRule {
    pub const fn new(begin: Option<f64>, end: Option<f64>) -> Self {
        Self {
            begin,
            end,
            platforms: PlatformFilter::Any,
        }
    }

    pub fn contains(&self, env: &Environment) -> bool {
        let width = env.width();
        let lower = self.begin.unwrap_or(f64::NEG_INFINITY);
        let upper = self.end.unwrap_or(f64::INFINITY);
        width >= lower && width < upper && self.platforms.matches(env.platform())
    }
}

#[derive(Clone)]
pub enum BreakpointRule {
    Width(WidthRule),
    Predicate(Predicate),
}

/// Named, stateless predicate answering "is this breakpoint active now?".
///
/// Several breakpoints may be active at once; disambiguation is the job of the
/// slot resolver, never of the breakpoint.
#[derive(Clone)]
pub struct Breakpoint {
    name: Cow<'static, str>,
    rule: BreakpointRule,
}

impl Breakpoint {
    /// Breakpoint driven by a custom predicate.
    pub fn new<F>(name: impl Into<Cow<'static, str>>, predicate: F) -> Self
    where
        F: Fn(&Environment) -> bool + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            rule: BreakpointRule::Predicate(Arc::new(predicate)),
        }
    }

    /// Width-range breakpoint; rejects empty or non-finite ranges.
    pub fn width(
        name: impl Into<Cow<'static, str>>,
        begin: Option<f64>,
        end: Option<f64>,
    ) -> Result<Self> {
        let name = name.into();
        let invalid = |reason: &str| LayoutError::InvalidBreakpoint {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        if begin.is_some_and(|b| !b.is_finite()) || end.is_some_and(|e| !e.is_finite()) {
            return Err(invalid("width bounds must be finite"));
        }
        if let (Some(b), Some(e)) = (begin, end) {
            if b >= e {
                return Err(invalid("begin must be below end"));
            }
        }

        Ok(Self::from_rule(name, WidthRule::new(begin, end)))
    }

    fn from_rule(name: Cow<'static, str>, rule: WidthRule) -> Self {
        Self {
            name,
            rule: BreakpointRule::Width(rule),
        }
    }

    /// Restrict to a platform family. Width rules carry the filter natively;
    /// predicate breakpoints are wrapped.
    pub fn on(self, platforms: PlatformFilter) -> Self {
        let rule = match self.rule {
            BreakpointRule::Width(mut rule) => {
                rule.platforms = platforms;
                BreakpointRule::Width(rule)
            }
            BreakpointRule::Predicate(inner) => BreakpointRule::Predicate(Arc::new(
                move |env: &Environment| platforms.matches(env.platform()) && inner(env),
            )),
        };
        Self {
            name: self.name,
            rule,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule(&self) -> &BreakpointRule {
        &self.rule
    }

    pub fn is_active(&self, env: &Environment) -> bool {
        match &self.rule {
            BreakpointRule::Width(rule) => rule.contains(env),
            BreakpointRule::Predicate(predicate) => predicate(env),
        }
    }
}

impl fmt::Debug for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Breakpoint");
        debug.field("name", &self.name);
        match &self.rule {
            BreakpointRule::Width(rule) => debug.field("rule", rule),
            BreakpointRule::Predicate(_) => debug.field("rule", &"<predicate>"),
        };
        debug.finish()
    }
}

/// Material window-class presets.
pub struct Breakpoints;

impl Breakpoints {
    /// Always active.
    pub fn standard() -> Breakpoint {
        Self::preset("standard", None, None, PlatformFilter::Any)
    }

    pub fn small() -> Breakpoint {
        Self::preset("small", Some(0.0), Some(SMALL_WIDTH), PlatformFilter::Any)
    }

    pub fn small_and_up() -> Breakpoint {
        Self::preset("small_and_up", Some(0.0), None, PlatformFilter::Any)
    }

    pub fn small_desktop() -> Breakpoint {
        Self::preset("small_desktop", Some(0.0), Some(SMALL_WIDTH), PlatformFilter::Desktop)
    }

    pub fn small_mobile() -> Breakpoint {
        Self::preset("small_mobile", Some(0.0), Some(SMALL_WIDTH), PlatformFilter::Mobile)
    }

    pub fn medium() -> Breakpoint {
        Self::preset("medium", Some(SMALL_WIDTH), Some(MEDIUM_WIDTH), PlatformFilter::Any)
    }

    pub fn medium_and_up() -> Breakpoint {
        Self::preset("medium_and_up", Some(SMALL_WIDTH), None, PlatformFilter::Any)
    }

    pub fn medium_desktop() -> Breakpoint {
        Self::preset(
            "medium_desktop",
            Some(SMALL_WIDTH),
            Some(MEDIUM_WIDTH),
            PlatformFilter::Desktop,
        )
    }

    pub fn medium_mobile() -> Breakpoint {
        Self::preset(
            "medium_mobile",
            Some(SMALL_WIDTH),
            Some(MEDIUM_WIDTH),
            PlatformFilter::Mobile,
        )
    }

    pub fn large() -> Breakpoint {
        Self::preset("large", Some(MEDIUM_WIDTH), None, PlatformFilter::Any)
    }

    pub fn large_desktop() -> Breakpoint {
        Self::preset("large_desktop", Some(MEDIUM_WIDTH), None, PlatformFilter::Desktop)
    }

    pub fn large_mobile() -> Breakpoint {
        Self::preset("large_mobile", Some(MEDIUM_WIDTH), None, PlatformFilter::Mobile)
    }

    fn preset(
        name: &'static str,
        begin: Option<f64>,
        end: Option<f64>,
        platforms: PlatformFilter,
    ) -> Breakpoint {
        Breakpoint::from_rule(
            Cow::Borrowed(name),
            WidthRule {
                begin,
                end,
                platforms,
            },
        )
    }
}
