#![forbid(unsafe_code)]

//! veil: headless disclosure and overlay components.
//!
//! Re-exports the member crates under short names and gathers the common
//! types in [`prelude`].
//!
//! ```ignore
//! use veil::prelude::*;
//!
//! let env = Env::new(Size::new(390.0, 844.0));
//! let mut dialog = Dialog::new(&env, Disclosure::new(false));
//! dialog.open();
//! ```

pub use veil_core as core;
pub use veil_runtime as runtime;
pub use veil_style as style;
pub use veil_widgets as widgets;

pub use veil_core::{Event, Point, PointerEvent, PointerPhase, Rect, Size};
pub use veil_runtime::{ConfigError, Scheduler, Store, VeilConfig};
pub use veil_widgets::Env;

/// Everything a host needs to build and drive components.
pub mod prelude {
    pub use veil_core::{
        Clock, Event, ManualClock, Point, PointerEvent, PointerPhase, Rect, Size, SystemClock,
    };
    pub use veil_runtime::{
        Binding, BindingScope, ConfigError, Observable, Scheduler, Store, Subscription, TimerHandle,
        VeilConfig,
    };
    pub use veil_style::{
        ButtonSize, ButtonVariant, InteractionState, Rgba, Style, Theme, ThemeHandle, ToastVariant,
    };
    pub use veil_widgets::{
        Accordion, AccordionKind, AlertDialog, Carousel, Collapsible, Command, CommandPalette,
        ContextMenu, Dialog, DialogResult, Disclosure, DragDismiss, DragRelease, Drawer,
        DropdownMenu, Env, EventOutcome, HoverCard, MenuActivation, MenuEntry, MenuModel, Menubar,
        MultiSelect, NavigationMenu, OverlayHost, OverlayOptions, Placement, Popover, SelectOutcome,
        Sheet, Side, Sidebar, SidebarState, SingleSelect, Surface, Toast, Toaster, Tooltip,
        Transition, TransitionPhase, TriggerAnchor,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_builds_a_dialog() {
        let scheduler = Scheduler::new();
        let env = Env::new(Size::new(390.0, 844.0)).scheduler(scheduler.clone());
        let mut dialog = Dialog::new(&env, Disclosure::new(false));
        assert!(dialog.open());
        scheduler.run_until_idle();
        assert_eq!(dialog.phase(), TransitionPhase::Open);
    }
}
