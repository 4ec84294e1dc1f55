//! Panels of the browser screen.

mod detail;
mod filters;
mod list;

pub use detail::render_detail;
pub use filters::{render_filters, sidebar_hit};
pub use list::{render_list, table_hit, TableHit};
