//! Browsing core: filtering, sorting, navigation and the view controller.
//!
//! Everything here is pure state manipulation over loaded records; nothing
//! touches the terminal or the network.

mod controller;
pub mod filter;
pub mod navigation;
pub mod route;
pub mod sort;

pub use controller::{DetailState, ViewController, ViewEvent};
pub use filter::{FilterSet, MatchMode};
pub use navigation::{next_index, previous_index, resolve_index};
pub use route::{Route, RouteHistory};
pub use sort::SortSpec;
