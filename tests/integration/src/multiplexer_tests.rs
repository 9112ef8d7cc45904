//! Ranked registry and multiplexer behavior across crates

use caconfig_core::{
    ConfigurationCollectionPersistData, ConfigurationInjectResourceDetectionStrategy,
    ConfigurationInjectResourceDetectionStrategyMultiplexer, ConfigurationPersistData,
    ConfigurationPersistenceStrategy, ConfigurationPersistenceStrategyMultiplexer,
    ContextPathStrategy, ContextPathStrategyMultiplexer, ContextResource, Error,
    LegacyConfigurationPersistenceStrategy, Request, SimpleRequest,
};
use caconfig_meta::{RankedServices, SERVICE_RANKING};
use caconfig_resource::{Resource, ResourcePath, ResourceResolver, ValueMap};
use caconfig_test_utils::ContentBuilder;
use serde_json::json;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

fn ranking(value: i64) -> ValueMap {
    let mut properties = ValueMap::new();
    properties.insert(SERVICE_RANKING.to_string(), json!(value));
    properties
}

mod registry_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names(services: &RankedServices<String>) -> Vec<String> {
        services
            .snapshot()
            .iter()
            .map(|service| service.to_string())
            .collect()
    }

    #[test]
    fn test_rank_descending_with_stable_ties() {
        let services = RankedServices::new();
        services.bind_ranked(Arc::new("low".to_string()), -5);
        services.bind_ranked(Arc::new("first tie".to_string()), 10);
        services.bind_ranked(Arc::new("high".to_string()), 100);
        services.bind_ranked(Arc::new("second tie".to_string()), 10);

        assert_eq!(names(&services), vec!["high", "first tie", "second tie", "low"]);
    }

    #[test]
    fn test_unbind_keeps_order_of_others() {
        let services = RankedServices::new();
        let a = Arc::new("a".to_string());
        let b = Arc::new("b".to_string());
        let c = Arc::new("c".to_string());
        services.bind_ranked(Arc::clone(&a), 1);
        services.bind_ranked(Arc::clone(&b), 1);
        services.bind_ranked(Arc::clone(&c), 1);

        assert!(services.unbind(&b));
        assert!(!services.unbind(&b));
        assert_eq!(names(&services), vec!["a", "c"]);
    }

    #[test]
    fn test_snapshot_unaffected_by_concurrent_binds() {
        let services: RankedServices<String> = RankedServices::new();
        services.bind_ranked(Arc::new("base".to_string()), 0);
        let snapshot = services.snapshot();

        std::thread::scope(|scope| {
            for thread in 0..4 {
                let services = &services;
                scope.spawn(move || {
                    for i in 0..50 {
                        services.bind_ranked(Arc::new(format!("{thread}-{i}")), i);
                    }
                });
            }
            for _ in 0..50 {
                assert!(services.snapshot().iter().count() >= 1);
            }
        });

        assert_eq!(snapshot.len(), 1);
        assert_eq!(services.len(), 201);
    }
}

mod first_responder_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Context path strategy answering with a fixed list and counting calls.
    struct Fixed {
        answer: Vec<(&'static str, &'static str)>,
        calls: AtomicUsize,
    }

    impl Fixed {
        fn new(answer: Vec<(&'static str, &'static str)>) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    impl ContextPathStrategy for Fixed {
        fn find_context_resources<'a>(
            &self,
            _resolver: &'a dyn ResourceResolver,
            _resource: &Resource,
        ) -> Box<dyn Iterator<Item = ContextResource> + 'a> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let found: Vec<ContextResource> = self
                .answer
                .iter()
                .map(|(path, config_ref)| ContextResource::new(Resource::new(*path, ValueMap::new()), *config_ref))
                .collect();
            Box::new(found.into_iter())
        }
    }

    #[test]
    fn test_second_strategy_answers_third_never_invoked() {
        let builder = ContentBuilder::new();
        builder.resource("/content/page", json!({}));
        let page = builder.get("/content/page");
        let tree = builder.tree();

        let empty = Fixed::new(Vec::new());
        let answering = Fixed::new(vec![("/content", "/conf/site")]);
        let unused = Fixed::new(vec![("/", "/conf/root")]);
        let multiplexer = ContextPathStrategyMultiplexer::new();
        multiplexer.bind(empty.clone(), &ranking(300));
        multiplexer.bind(answering.clone(), &ranking(200));
        multiplexer.bind(unused.clone(), &ranking(100));

        let found: Vec<String> = multiplexer
            .find_context_resources(tree.as_ref(), &page)
            .map(|context| context.config_ref().to_string())
            .collect();

        assert_eq!(found, vec!["/conf/site"]);
        assert_eq!(empty.calls.load(Ordering::SeqCst), 1);
        assert_eq!(answering.calls.load(Ordering::SeqCst), 1);
        assert_eq!(unused.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_strategy_answers() {
        let builder = ContentBuilder::new();
        builder.resource("/content/page", json!({}));
        let page = builder.get("/content/page");
        let tree = builder.tree();

        let multiplexer = ContextPathStrategyMultiplexer::new();
        multiplexer.bind(Fixed::new(Vec::new()), &ValueMap::new());

        assert_eq!(multiplexer.find_context_resources(tree.as_ref(), &page).count(), 0);
    }

    struct Detect(Option<&'static str>);

    impl ConfigurationInjectResourceDetectionStrategy for Detect {
        fn detect_resource(&self, _request: &dyn Request) -> Option<Resource> {
            self.0.map(|path| Resource::new(path, ValueMap::new()))
        }
    }

    #[test]
    fn test_detection_uses_highest_ranked_answer() {
        let multiplexer = ConfigurationInjectResourceDetectionStrategyMultiplexer::new();
        multiplexer.bind(Arc::new(Detect(Some("/low"))), &ranking(1));
        multiplexer.bind(Arc::new(Detect(None)), &ranking(50));
        multiplexer.bind(Arc::new(Detect(Some("/high"))), &ranking(10));

        let request = SimpleRequest::new(None);
        let detected = multiplexer.detect_resource(&request);

        assert_eq!(detected.map(|r| r.path().to_string()), Some("/high".to_string()));
    }
}

mod persistence_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Legacy persistence strategy with a fixed write outcome.
    struct Outcome {
        accept: Option<bool>,
        writes: AtomicUsize,
    }

    impl Outcome {
        fn new(accept: Option<bool>) -> Arc<Self> {
            Arc::new(Self {
                accept,
                writes: AtomicUsize::new(0),
            })
        }

        fn write(&self) -> caconfig_core::Result<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.accept.ok_or(Error::UnsupportedOperation { operation: "write" })
        }
    }

    impl LegacyConfigurationPersistenceStrategy for Outcome {
        fn resource(&self, _resolver: &dyn ResourceResolver, _resource: &Resource) -> Option<Resource> {
            None
        }

        fn resource_path(&self, _path: &ResourcePath) -> Option<ResourcePath> {
            None
        }

        fn persist_configuration(
            &self,
            _resolver: &dyn ResourceResolver,
            _config_resource_path: &ResourcePath,
            _data: &ConfigurationPersistData,
        ) -> caconfig_core::Result<bool> {
            self.write()
        }

        fn persist_configuration_collection(
            &self,
            _resolver: &dyn ResourceResolver,
            _config_resource_collection_parent_path: &ResourcePath,
            _data: &ConfigurationCollectionPersistData,
        ) -> caconfig_core::Result<bool> {
            self.write()
        }

        fn delete_configuration(
            &self,
            _resolver: &dyn ResourceResolver,
            _config_resource_path: &ResourcePath,
        ) -> caconfig_core::Result<bool> {
            self.write()
        }
    }

    fn path() -> ResourcePath {
        ResourcePath::new("/conf/site1/sling:configs/my.Config")
    }

    #[test]
    fn test_write_falls_through_declining_strategies() {
        let builder = ContentBuilder::new();
        let tree = builder.tree();
        let declining = Outcome::new(Some(false));
        let accepting = Outcome::new(Some(true));
        let unused = Outcome::new(Some(true));
        let multiplexer = ConfigurationPersistenceStrategyMultiplexer::new();
        multiplexer.bind_legacy(declining.clone(), &ranking(30));
        multiplexer.bind_legacy(accepting.clone(), &ranking(20));
        multiplexer.bind_legacy(unused.clone(), &ranking(10));

        let accepted = multiplexer
            .persist_configuration(tree.as_ref(), &path(), &ConfigurationPersistData::default())
            .expect("Should persist");

        assert!(accepted);
        assert_eq!(declining.writes.load(Ordering::SeqCst), 1);
        assert_eq!(accepting.writes.load(Ordering::SeqCst), 1);
        assert_eq!(unused.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_write_error_propagates() {
        let builder = ContentBuilder::new();
        let tree = builder.tree();
        let failing = Outcome::new(None);
        let accepting = Outcome::new(Some(true));
        let multiplexer = ConfigurationPersistenceStrategyMultiplexer::new();
        multiplexer.bind_legacy(failing.clone(), &ranking(2));
        multiplexer.bind_legacy(accepting.clone(), &ranking(1));

        let result = multiplexer.delete_configuration(tree.as_ref(), &path());

        assert!(matches!(result, Err(Error::UnsupportedOperation { .. })));
        assert_eq!(accepting.writes.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_all_declined() {
        let builder = ContentBuilder::new();
        let tree = builder.tree();
        let multiplexer = ConfigurationPersistenceStrategyMultiplexer::new();
        multiplexer.bind_legacy(Outcome::new(Some(false)), &ValueMap::new());

        let accepted = multiplexer
            .persist_configuration_collection(
                tree.as_ref(),
                &path(),
                &ConfigurationCollectionPersistData::default(),
            )
            .expect("Should not fail");
        assert!(!accepted);
    }

    #[test]
    fn test_unbind_legacy() {
        let legacy = Outcome::new(Some(true));
        let as_legacy: Arc<dyn LegacyConfigurationPersistenceStrategy> = legacy.clone();
        let multiplexer = ConfigurationPersistenceStrategyMultiplexer::new();
        multiplexer.bind_legacy(as_legacy.clone(), &ValueMap::new());

        assert!(multiplexer.unbind_legacy(&as_legacy));
        assert!(!multiplexer.unbind_legacy(&as_legacy));
    }
}
