//! Command implementations for caconfig-cli

pub mod context_paths;
pub mod names;
pub mod resolve;

pub use context_paths::run_context_paths;
pub use names::run_names;
pub use resolve::run_resolve;
