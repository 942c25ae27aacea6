//! Command-line driver for `metagen`: runs a TOML generation plan against the
//! bundled templates and prints the generated source.
mod cli;
mod plan;
pub mod templates;

pub use cli::Cli;
pub use plan::{Plan, PlanError, Step};
