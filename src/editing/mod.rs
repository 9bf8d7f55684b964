//! Editing model: selection, transactions, boundaries and navigation

pub mod boundary;
mod navigation;
mod remap;
mod selection;
mod transaction;

pub use boundary::{enclosing_region, RegionSpan, Scope};
pub use navigation::{
    backspace_action, delete_forward_action, move_horizontal, DeleteAction, Direction,
};
pub use remap::{remap_position, remap_selection};
pub use selection::Selection;
pub use transaction::{EditorState, Origin, Transaction};
