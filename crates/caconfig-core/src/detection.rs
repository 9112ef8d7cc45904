//! Content resource detection
//!
//! Script bindings and model injection need the content resource a
//! configuration is resolved for. Detection strategies find it from the
//! bindings or the current request; the multiplexers ask them in rank order.

use crate::bindings::Bindings;
use caconfig_meta::RankedServices;
use caconfig_resource::{Resource, ValueMap};
use std::sync::Arc;

/// The host's current request, as far as configuration lookup cares.
pub trait Request {
    /// Resource the request addresses.
    fn resource(&self) -> Option<Resource>;
}

/// A request that only carries its resource.
#[derive(Debug, Clone, Default)]
pub struct SimpleRequest {
    resource: Option<Resource>,
}

impl SimpleRequest {
    pub fn new(resource: Option<Resource>) -> Self {
        Self { resource }
    }
}

impl Request for SimpleRequest {
    fn resource(&self) -> Option<Resource> {
        self.resource.clone()
    }
}

/// Detects the content resource from script bindings.
pub trait ConfigurationBindingsResourceDetectionStrategy: Send + Sync {
    fn detect_resource(&self, bindings: &Bindings<'_>) -> Option<Resource>;
}

/// Detects the content resource from a request.
pub trait ConfigurationInjectResourceDetectionStrategy: Send + Sync {
    fn detect_resource(&self, request: &dyn Request) -> Option<Resource>;
}

/// Uses the resource of the bound request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfigurationBindingsResourceDetectionStrategy;

impl DefaultConfigurationBindingsResourceDetectionStrategy {
    pub const RANKING: i64 = 100;
}

impl ConfigurationBindingsResourceDetectionStrategy
    for DefaultConfigurationBindingsResourceDetectionStrategy
{
    fn detect_resource(&self, bindings: &Bindings<'_>) -> Option<Resource> {
        bindings.request.and_then(|request| request.resource())
    }
}

/// Uses the resource of the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfigurationInjectResourceDetectionStrategy;

impl ConfigurationInjectResourceDetectionStrategy
    for DefaultConfigurationInjectResourceDetectionStrategy
{
    fn detect_resource(&self, request: &dyn Request) -> Option<Resource> {
        request.resource()
    }
}

#[derive(Debug, Default)]
pub struct ConfigurationBindingsResourceDetectionStrategyMultiplexer {
    strategies: RankedServices<dyn ConfigurationBindingsResourceDetectionStrategy>,
}

impl ConfigurationBindingsResourceDetectionStrategyMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &self,
        strategy: Arc<dyn ConfigurationBindingsResourceDetectionStrategy>,
        properties: &ValueMap,
    ) {
        self.strategies.bind(strategy, properties);
    }

    pub fn unbind(&self, strategy: &Arc<dyn ConfigurationBindingsResourceDetectionStrategy>) -> bool {
        self.strategies.unbind(strategy)
    }
}

impl ConfigurationBindingsResourceDetectionStrategy
    for ConfigurationBindingsResourceDetectionStrategyMultiplexer
{
    fn detect_resource(&self, bindings: &Bindings<'_>) -> Option<Resource> {
        self.strategies
            .snapshot()
            .iter()
            .find_map(|strategy| strategy.detect_resource(bindings))
    }
}

#[derive(Debug, Default)]
pub struct ConfigurationInjectResourceDetectionStrategyMultiplexer {
    strategies: RankedServices<dyn ConfigurationInjectResourceDetectionStrategy>,
}

impl ConfigurationInjectResourceDetectionStrategyMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(
        &self,
        strategy: Arc<dyn ConfigurationInjectResourceDetectionStrategy>,
        properties: &ValueMap,
    ) {
        self.strategies.bind(strategy, properties);
    }

    pub fn unbind(&self, strategy: &Arc<dyn ConfigurationInjectResourceDetectionStrategy>) -> bool {
        self.strategies.unbind(strategy)
    }
}

impl ConfigurationInjectResourceDetectionStrategy
    for ConfigurationInjectResourceDetectionStrategyMultiplexer
{
    fn detect_resource(&self, request: &dyn Request) -> Option<Resource> {
        self.strategies
            .snapshot()
            .iter()
            .find_map(|strategy| strategy.detect_resource(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn resource(path: &str) -> Resource {
        Resource::new(path, ValueMap::new())
    }

    fn ranking(value: i64) -> ValueMap {
        serde_json::json!({ "service.ranking": value })
            .as_object()
            .cloned()
            .unwrap()
    }

    struct Fixed(Option<Resource>, AtomicUsize);

    impl Fixed {
        fn new(path: Option<&str>) -> Arc<Self> {
            Arc::new(Self(path.map(resource), AtomicUsize::new(0)))
        }
    }

    impl ConfigurationInjectResourceDetectionStrategy for Fixed {
        fn detect_resource(&self, _request: &dyn Request) -> Option<Resource> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.clone()
        }
    }

    impl ConfigurationBindingsResourceDetectionStrategy for Fixed {
        fn detect_resource(&self, _bindings: &Bindings<'_>) -> Option<Resource> {
            self.1.fetch_add(1, Ordering::SeqCst);
            self.0.clone()
        }
    }

    #[test]
    fn test_inject_multiplexer_first_responder() {
        let multiplexer = ConfigurationInjectResourceDetectionStrategyMultiplexer::new();
        let declining = Fixed::new(None);
        let answering = Fixed::new(Some("/content/a"));
        let unused = Fixed::new(Some("/content/b"));
        multiplexer.bind(declining, &ranking(30));
        multiplexer.bind(answering, &ranking(20));
        multiplexer.bind(unused.clone(), &ranking(10));

        let request = SimpleRequest::new(None);
        let found = multiplexer.detect_resource(&request).unwrap();

        assert_eq!(found.path().as_str(), "/content/a");
        assert_eq!(unused.1.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_inject_multiplexer_empty() {
        let multiplexer = ConfigurationInjectResourceDetectionStrategyMultiplexer::new();
        let request = SimpleRequest::new(Some(resource("/content/a")));
        assert!(multiplexer.detect_resource(&request).is_none());
    }

    #[test]
    fn test_default_strategies_use_request_resource() {
        let request = SimpleRequest::new(Some(resource("/content/page")));
        let found = DefaultConfigurationInjectResourceDetectionStrategy.detect_resource(&request);
        assert_eq!(found.unwrap().path().as_str(), "/content/page");

        let bindings = Bindings::new("sightly").with_request(&request);
        let found = DefaultConfigurationBindingsResourceDetectionStrategy.detect_resource(&bindings);
        assert_eq!(found.unwrap().path().as_str(), "/content/page");

        let without_request = Bindings::new("sightly").with_resource(resource("/content/other"));
        assert!(
            DefaultConfigurationBindingsResourceDetectionStrategy
                .detect_resource(&without_request)
                .is_none()
        );
    }

    #[test]
    fn test_bindings_multiplexer_ranks_default() {
        let multiplexer = ConfigurationBindingsResourceDetectionStrategyMultiplexer::new();
        multiplexer.bind(
            Arc::new(DefaultConfigurationBindingsResourceDetectionStrategy),
            &ranking(DefaultConfigurationBindingsResourceDetectionStrategy::RANKING),
        );
        let fallback = Fixed::new(Some("/content/fallback"));
        multiplexer.bind(fallback.clone(), &ValueMap::new());

        let request = SimpleRequest::new(Some(resource("/content/page")));
        let bindings = Bindings::new("sightly").with_request(&request);
        assert_eq!(
            multiplexer.detect_resource(&bindings).unwrap().path().as_str(),
            "/content/page"
        );
        assert_eq!(fallback.1.load(Ordering::SeqCst), 0);

        let bindings = Bindings::new("sightly");
        assert_eq!(
            multiplexer.detect_resource(&bindings).unwrap().path().as_str(),
            "/content/fallback"
        );
    }
}
