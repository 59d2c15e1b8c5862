//! CLI subcommand implementations.

mod checksum;
mod compare;

pub use checksum::run_checksum;
pub use compare::run_compare;
