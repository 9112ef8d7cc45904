//! Configuration resolver and builder
//!
//! [`ConfigurationResolver`] is the read API for applications. It looks up
//! the inheritance chain of a configuration, reduces it with the inheritance
//! strategy, applies overrides, removes ignored and internal properties and
//! finally fills metadata defaults:
//!
//! ```text
//! chain ──► inheritance ──► overrides ──► strip ignored ──► defaults ──► ValueMap / T
//! ```

mod config_builder;
mod mapping;
mod resolver;

pub use config_builder::ConfigurationBuilder;
pub use mapping::ConfigurationType;
pub use resolver::ConfigurationResolver;
