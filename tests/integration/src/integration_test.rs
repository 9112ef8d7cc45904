//! End-to-end integration test for the resolution stack
//!
//! Exercises the complete flow: tree and settings loading -> service wiring
//! -> configuration writes -> resolution with inheritance and overrides.

use caconfig_core::{
    CaConfig, ConfigurationCollectionPersistData, ConfigurationPersistData,
    ConfigurationPersistenceStrategy, ConfigurationResourceResolvingStrategy, ConfigurationType,
    DEFAULT_BUCKET, ResolutionContext,
};
use caconfig_meta::{ConfigurationMetadata, PropertyMetadata, PropertyType, load_settings};
use caconfig_resource::{DocumentLoader, ResourcePath, ResourceResolver, ValueMap};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::{Value, json};
use std::fs;
use tempfile::TempDir;

const TREE: &str = r#"
content:
  site1:
    sling:configRef: /conf/site1
    en:
      sling:configRef: /conf/site1/en
      page:
        jcr:title: Page
conf:
  site1:
    sling:configs:
      my.app.SiteConfig:
        title: Site 1
        max_items: 20
        footer: site
  global:
    sling:configs:
      my.app.SiteConfig:
        title: Global
        max_items: 5
        analytics: true
"#;

const SETTINGS: &str = r#"
[resolver]
enable_caching = true

[management]
ignore_property_name_regex = ["^jcr:.+$", "^internal_.+$"]

[[overrides]]
ranking = 10
lines = ['[/content/site1/en]my.app.SiteConfig/footer="override high"']

[[overrides]]
ranking = 0
lines = [
    '[/content/site1]my.app.SiteConfig/footer="override low"',
    'my.app.SiteConfig/title=',
]

[[metadata]]
name = "my.app.SiteConfig"
label = "Site configuration"

[[metadata.properties]]
name = "max_items"
property_type = { type = "integer" }
default_value = 10
"#;

#[derive(Debug, Deserialize, PartialEq)]
struct SiteConfig {
    title: Option<String>,
    max_items: i64,
    analytics: bool,
    footer: Option<String>,
}

impl ConfigurationType for SiteConfig {
    fn metadata() -> ConfigurationMetadata {
        ConfigurationMetadata::new("my.app.SiteConfig")
            .with_property(PropertyMetadata::new("title", PropertyType::String))
            .with_property(PropertyMetadata::new("max_items", PropertyType::Integer).with_default(10))
            .with_property(PropertyMetadata::new("analytics", PropertyType::Boolean))
            .with_property(PropertyMetadata::new("footer", PropertyType::String))
    }
}

struct Fixture {
    _temp: TempDir,
    tree: caconfig_resource::MemoryResourceResolver,
    caconfig: CaConfig,
}

fn setup() -> Fixture {
    let temp = TempDir::new().unwrap();
    let tree_path = temp.path().join("content.yaml");
    let settings_path = temp.path().join("caconfig.toml");
    fs::write(&tree_path, TREE).unwrap();
    fs::write(&settings_path, SETTINGS).unwrap();

    let tree = DocumentLoader::new().load_tree(&tree_path).unwrap();
    let settings = load_settings(&settings_path).unwrap();
    Fixture {
        _temp: temp,
        tree,
        caconfig: CaConfig::from_settings(&settings),
    }
}

#[test]
fn test_loaded_settings_drive_resolution() {
    let fixture = setup();
    let page = fixture
        .tree
        .get_resource(&ResourcePath::new("/content/site1/en/page"))
        .unwrap();
    let ctx = ResolutionContext::new(&fixture.tree);

    // Nearest configuration is /conf/site1; no inheritance flag, so the
    // global fallback does not contribute. The higher ranked override wins.
    let properties = fixture
        .caconfig
        .resolver
        .get(&ctx, Some(&page))
        .name("my.app.SiteConfig")
        .as_value_map()
        .unwrap();
    assert_eq!(
        Value::Object(properties),
        json!({"title": "Site 1", "max_items": 20, "footer": "override high"})
    );

    let typed: SiteConfig = fixture
        .caconfig
        .resolver
        .get(&ctx, Some(&page))
        .as_type()
        .unwrap();
    assert_eq!(
        typed,
        SiteConfig {
            title: Some("Site 1".to_string()),
            max_items: 20,
            analytics: false,
            footer: Some("override high".to_string()),
        }
    );
}

#[test]
fn test_fallback_outside_context() {
    let fixture = setup();
    fixture
        .tree
        .create_or_update(&ResourcePath::new("/content/other/page"), ValueMap::new())
        .unwrap();
    let page = fixture
        .tree
        .get_resource(&ResourcePath::new("/content/other/page"))
        .unwrap();
    let ctx = ResolutionContext::new(&fixture.tree);

    let typed: SiteConfig = fixture
        .caconfig
        .resolver
        .get(&ctx, Some(&page))
        .as_type()
        .unwrap();
    assert_eq!(
        typed,
        SiteConfig {
            title: Some("Global".to_string()),
            max_items: 5,
            analytics: true,
            footer: None,
        }
    );
}

#[test]
fn test_written_configuration_is_resolved() {
    let fixture = setup();
    let page = fixture
        .tree
        .get_resource(&ResourcePath::new("/content/site1/en/page"))
        .unwrap();
    let resolving = &fixture.caconfig.resolving;

    let path = resolving
        .get_resource_path(&fixture.tree, &page, DEFAULT_BUCKET, "my.app.Feature")
        .unwrap();
    assert_eq!(path.as_str(), "/conf/site1/en/sling:configs/my.app.Feature");

    let mut properties = ValueMap::new();
    properties.insert("enabled".into(), json!(true));
    properties.insert("jcr:primaryType".into(), json!("nt:unstructured"));
    properties.insert("internal_note".into(), json!("dropped"));
    let accepted = fixture
        .caconfig
        .persistence
        .persist_configuration(&fixture.tree, &path, &ConfigurationPersistData::new(properties))
        .unwrap();
    assert!(accepted);

    let stored = fixture.tree.get_resource(&path).unwrap();
    assert_eq!(Value::Object(stored.value_map().clone()), json!({"enabled": true}));

    let ctx = ResolutionContext::new(&fixture.tree);
    let config = fixture.caconfig.resolver.get(&ctx, Some(&page));
    assert!(config.has("my.app.Feature"));
    let resolved = config.name("my.app.Feature").as_value_map().unwrap();
    assert_eq!(resolved.get("enabled"), Some(&json!(true)));
}

#[test]
fn test_written_collection_is_resolved_in_order() {
    let fixture = setup();
    let page = fixture
        .tree
        .get_resource(&ResourcePath::new("/content/site1/en/page"))
        .unwrap();
    let parent = fixture
        .caconfig
        .resolving
        .get_resource_collection_parent_path(&fixture.tree, &page, DEFAULT_BUCKET, "my.app.Links")
        .unwrap();

    let item = |name: &str, url: &str| {
        let mut properties = ValueMap::new();
        properties.insert("url".into(), json!(url));
        ConfigurationPersistData::new(properties).with_item_name(name)
    };
    let data = ConfigurationCollectionPersistData {
        items: vec![item("b", "https://b.example"), item("a", "https://a.example")],
        properties: None,
    };
    assert!(
        fixture
            .caconfig
            .persistence
            .persist_configuration_collection(&fixture.tree, &parent, &data)
            .unwrap()
    );

    let ctx = ResolutionContext::new(&fixture.tree);
    let urls: Vec<Value> = fixture
        .caconfig
        .resolver
        .get(&ctx, Some(&page))
        .name("my.app.Links")
        .as_value_map_collection()
        .unwrap()
        .into_iter()
        .filter_map(|properties| properties.get("url").cloned())
        .collect();
    assert_eq!(urls, vec![json!("https://b.example"), json!("https://a.example")]);

    assert!(
        fixture
            .caconfig
            .persistence
            .delete_configuration(&fixture.tree, &parent)
            .unwrap()
    );
    let config = fixture.caconfig.resolver.get(&ctx, Some(&page));
    assert!(
        config
            .name("my.app.Links")
            .as_value_map_collection()
            .unwrap()
            .is_empty()
    );
}
