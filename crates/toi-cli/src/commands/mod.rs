//! CLI subcommand implementations.

pub mod events;
pub mod shared;
pub mod timeline;
pub mod util;
