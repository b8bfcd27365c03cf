#![forbid(unsafe_code)]

//! Modal surfaces: dialogs, alert dialogs, edge sheets, and drag-dismissable
//! drawers.
//!
//! All of them are a [`Surface`](crate::surface::Surface) with a barrier.
//! They differ in placement and in how a close can be requested:
//!
//! | Widget        | Placement | Outside press | Back | Drag |
//! |---------------|-----------|---------------|------|------|
//! | `Dialog`      | centered  | closes        | closes | no |
//! | `AlertDialog` | centered  | ignored       | closes | no |
//! | `Sheet`       | edge      | closes        | closes | no |
//! | `Drawer`      | bottom    | closes        | closes | yes |

mod dialog;
mod sheet;

pub use dialog::{AlertDialog, Dialog, DialogResult};
pub use sheet::{Drawer, Sheet};
