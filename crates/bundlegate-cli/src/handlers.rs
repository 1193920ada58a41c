//! Command handlers for CLI subcommands
//!
//! Each subcommand lives in its own module; shared bundle loading is in
//! [`utils`].

mod completions;
mod range;
pub mod utils;
mod validate;

pub use completions::handle_completions;
pub use range::handle_range_contains;
pub use validate::handle_validate;
