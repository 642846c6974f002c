//! Path display and reference accounting for the Spaces reference list.
//!
//! - [`pathfmt`] fits `/`-delimited paths into a character budget.
//! - [`layout`] picks what each column of a reference row shows.
//! - [`quota`] tracks attached bytes against a configurable limit.

pub mod config;
pub mod layout;
pub mod pathfmt;
pub mod quota;
pub mod resource;
pub mod search;

pub use layout::{DisplayConfig, DisplayMode, RowDisplay, select_display};
pub use pathfmt::{Truncation, truncate, truncate_file_name, truncate_middle, truncate_start};
pub use quota::{Quota, ReferenceError, ReferenceList, Usage};
pub use resource::{Resource, ResourceKind};
