use std::fmt;
use std::sync::Arc;

use crate::environment::Environment;

use super::id::SlotKey;

/// Host factory producing renderable content for the current environment.
pub type ContentBuilder<C> = Arc<dyn Fn(&Environment) -> C + Send + Sync>;

/// Maps content and a progress value in `[0, 1]` to transformed content.
pub type TransitionFn<C> = Arc<dyn Fn(C, f64) -> C + Send + Sync>;

/// How content enters or leaves a slot.
pub enum Transition<C> {
    /// Swap without animation.
    Instant,
    Animated(TransitionFn<C>),
}

impl<C> Transition<C> {
    pub fn animated<F>(f: F) -> Self
    where
        F: Fn(C, f64) -> C + Send + Sync + 'static,
    {
        Transition::Animated(Arc::new(f))
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, Transition::Animated(_))
    }

    pub fn apply(&self, content: C, progress: f64) -> C {
        match self {
            Transition::Instant => content,
            Transition::Animated(f) => f(content, progress.clamp(0.0, 1.0)),
        }
    }
}

impl<C> Clone for Transition<C> {
    fn clone(&self) -> Self {
        match self {
            Transition::Instant => Transition::Instant,
            Transition::Animated(f) => Transition::Animated(Arc::clone(f)),
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transition::Instant => f.write_str("Instant"),
            Transition::Animated(_) => f.write_str("Animated"),
        }
    }
}

/// Immutable binding of a slot's content, identity key, and transitions.
pub struct SlotConfig<C> {
    key: SlotKey,
    builder: Option<ContentBuilder<C>>,
    enter: Transition<C>,
    exit: Transition<C>,
}

impl<C> SlotConfig<C> {
    pub fn new<F>(key: impl Into<SlotKey>, builder: F) -> Self
    where
        F: Fn(&Environment) -> C + Send + Sync + 'static,
    {
        Self::from_builder(key, Arc::new(builder))
    }

    pub fn from_builder(key: impl Into<SlotKey>, builder: ContentBuilder<C>) -> Self {
        Self {
            key: key.into(),
            builder: Some(builder),
            enter: Transition::Instant,
            exit: Transition::Instant,
        }
    }

    /// Config that renders nothing.
    pub fn empty() -> Self {
        Self {
            key: SlotKey::new(SlotKey::EMPTY),
            builder: None,
            enter: Transition::Instant,
            exit: Transition::Instant,
        }
    }

    pub fn with_enter(mut self, enter: Transition<C>) -> Self {
        self.enter = enter;
        self
    }

    pub fn with_exit(mut self, exit: Transition<C>) -> Self {
        self.exit = exit;
        self
    }

    pub fn key(&self) -> &SlotKey {
        &self.key
    }

    pub fn has_content(&self) -> bool {
        self.builder.is_some()
    }

    pub fn enter(&self) -> &Transition<C> {
        &self.enter
    }

    pub fn exit(&self) -> &Transition<C> {
        &self.exit
    }

    pub fn build(&self, env: &Environment) -> Option<C> {
        self.builder.as_ref().map(|builder| builder(env))
    }
}

impl<C> Clone for SlotConfig<C> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            builder: self.builder.clone(),
            enter: self.enter.clone(),
            exit: self.exit.clone(),
        }
    }
}

impl<C> fmt::Debug for SlotConfig<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotConfig")
            .field("key", &self.key)
            .field("has_content", &self.has_content())
            .field("enter", &self.enter)
            .field("exit", &self.exit)
            .finish()
    }
}
