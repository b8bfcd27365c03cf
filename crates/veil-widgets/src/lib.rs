#![forbid(unsafe_code)]

//! Headless disclosure and overlay components for veil.
//!
//! The core pieces are small and composable:
//!
//! | Piece | Module |
//! |-------|--------|
//! | Open/closed state, controlled or not | [`disclosure`] |
//! | Layered content with barrier and dismissal | [`overlay`] |
//! | Anchored placement with flip and clamp | [`position`] |
//! | Enter/exit animation | [`transition`] |
//! | Single and multiple item selection | [`selection`] |
//! | Swipe-to-dismiss | [`drag`] |
//!
//! [`Surface`] bundles the first four. Every component below is a
//! [`Surface`] (or a selection model) with its own defaults: dialogs, sheets,
//! popovers, menus, accordions, toasts, and so on.
//!
//! Components never render. Hosts read rectangles, phases, and opacity from
//! them, feed them [`veil_core::Event`]s, and call `sync()` after advancing
//! the [`veil_runtime::Scheduler`].

pub mod accordion;
pub mod carousel;
pub mod command_palette;
pub mod disclosure;
pub mod drag;
pub mod env;
pub mod floating;
pub mod menu;
pub mod modal;
pub mod overlay;
pub mod position;
pub mod selection;
pub mod sidebar;
pub mod surface;
pub mod toast;
pub mod transition;

pub use accordion::{Accordion, AccordionKind, Collapsible};
pub use carousel::{Carousel, Orientation};
pub use command_palette::{Command, CommandPalette};
pub use disclosure::{Disclosure, DisclosureMode};
pub use drag::{DragDismiss, DragPhase, DragRelease};
pub use env::Env;
pub use floating::{HoverCard, Popover, Tooltip};
pub use menu::{
    ContextMenu, DropdownMenu, MenuActivation, MenuEntry, MenuModel, Menubar, NavigationMenu,
};
pub use modal::{AlertDialog, Dialog, DialogResult, Drawer, Sheet};
pub use overlay::{Barrier, EventOutcome, OverlayHost, OverlayId, OverlayOptions};
pub use position::{Align, Placement, ResolvedPosition, Side, resolve_placement, resolve_position};
pub use selection::{Item, ItemKey, MultiSelect, SelectOutcome, SingleSelect};
pub use sidebar::{RailState, Sidebar, SidebarState};
pub use surface::{Surface, SurfacePlacement, TriggerAnchor};
pub use toast::{Toast, ToastDuration, ToastId, ToastState, Toaster};
pub use transition::{Completion, Easing, Transition, TransitionOutcome, TransitionPhase, Tween};
