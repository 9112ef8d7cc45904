//! Shared test utilities for the caconfig workspace.
//!
//! This crate provides fixture builders for resource trees. It is a
//! dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`content`]: [`ContentBuilder`] for content and configuration trees
//! - [`counting`]: [`CountingResolver`] recording tree access

pub mod content;
pub mod counting;

pub use content::ContentBuilder;
pub use counting::CountingResolver;
