#![forbid(unsafe_code)]

//! Per-root dependencies handed to every component.

use veil_core::Size;
use veil_runtime::{Scheduler, VeilConfig};
use veil_style::ThemeHandle;

use crate::position::{Placement, Side};
use crate::transition::Transition;

/// Scheduler, tunables, viewport, and theme for one screen or app root.
///
/// Built once and passed to component constructors. Clones share the same
/// scheduler and theme.
#[derive(Debug, Clone)]
pub struct Env {
    /// Animation and delay driver. `None` makes every transition snap.
    pub scheduler: Option<Scheduler>,
    pub config: VeilConfig,
    pub viewport: Size,
    pub theme: ThemeHandle,
}

impl Env {
    /// Environment with a fresh scheduler and default tunables.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            scheduler: Some(Scheduler::new()),
            config: VeilConfig::default(),
            viewport,
            theme: ThemeHandle::default(),
        }
    }

    /// Environment whose host has no animation support.
    #[must_use]
    pub fn without_animation(viewport: Size) -> Self {
        Self {
            scheduler: None,
            ..Self::new(viewport)
        }
    }

    #[must_use]
    pub fn scheduler(mut self, scheduler: Scheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    #[must_use]
    pub fn config(mut self, config: VeilConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: ThemeHandle) -> Self {
        self.theme = theme;
        self
    }

    /// Closed transition wired to this environment's scheduler and config.
    #[must_use]
    pub fn transition(&self) -> Transition {
        Transition::new(self.scheduler.clone())
            .min_scale(self.config.min_scale)
            .reduced_motion(self.config.reduced_motion)
    }

    /// Placement on `side` at the configured anchor offset.
    #[must_use]
    pub fn placement(&self, side: Side) -> Placement {
        Placement::new(side).offset(self.config.anchor_offset)
    }
}
