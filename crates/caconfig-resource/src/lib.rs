//! Resource tree abstraction for context-aware configuration
//!
//! Configuration lives in a hierarchical tree of resources. This crate
//! provides the pieces every other layer builds on:
//!
//! - [`ResourcePath`]: normalized absolute paths
//! - [`Resource`]: immutable, cheaply cloneable resource handles
//! - [`ResourceResolver`]: the tree collaborator supplied by the host
//! - [`MemoryResourceResolver`]: an ordered in-memory tree
//! - [`DocumentLoader`]: format-agnostic loading of trees and settings files

pub mod error;
pub mod loader;
pub mod memory;
pub mod path;
pub mod resource;
pub mod value;

pub use error::{Error, Result};
pub use loader::DocumentLoader;
pub use memory::MemoryResourceResolver;
pub use path::ResourcePath;
pub use resource::{Resource, ResourceResolver};
pub use value::{ValueMap, ValueMapExt};
