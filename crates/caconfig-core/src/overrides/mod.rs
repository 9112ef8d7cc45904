//! Administrative configuration overrides
//!
//! Override providers supply lines in one of two forms:
//!
//! ```text
//! [/content/site1]my.app.Config/param1="value"     one property
//! my.app.Config={"param1":"value","param2":5}      whole configuration
//! ```
//!
//! The bracketed context path is optional; without it the override applies
//! to every context. Values are JSON.

mod multiplexer;

pub use multiplexer::ConfigurationOverrideMultiplexer;

use crate::{Error, Result};
use caconfig_meta::{OverrideConfig, is_valid_config_name};
use caconfig_resource::{ResourcePath, ValueMap};
use serde_json::Value;

/// Supplies override lines.
pub trait ConfigurationOverrideProvider: Send + Sync {
    fn override_strings(&self) -> Vec<String>;
}

/// Provider with a fixed list of lines, usually taken from the settings file.
#[derive(Debug, Clone, Default)]
pub struct StaticOverrideProvider {
    lines: Vec<String>,
}

impl StaticOverrideProvider {
    pub fn new(lines: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&OverrideConfig> for StaticOverrideProvider {
    fn from(config: &OverrideConfig) -> Self {
        Self::new(config.lines.iter().cloned())
    }
}

impl ConfigurationOverrideProvider for StaticOverrideProvider {
    fn override_strings(&self) -> Vec<String> {
        self.lines.clone()
    }
}

/// One parsed override line.
#[derive(Debug, Clone, PartialEq)]
pub struct OverrideItem {
    /// Context path the override is restricted to
    pub path: Option<ResourcePath>,
    pub config_name: String,
    pub properties: ValueMap,
    /// Replace all properties instead of single ones
    pub all_properties: bool,
}

impl OverrideItem {
    /// Parse a single override line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOverride`] if the line does not follow the
    /// override syntax or its value is not valid JSON.
    pub fn parse(line: &str) -> Result<Self> {
        let invalid = |reason| Error::InvalidOverride {
            line: line.to_string(),
            reason,
        };

        let mut rest = line.trim();
        let mut path = None;
        if let Some(bracketed) = rest.strip_prefix('[') {
            let (context, remainder) = bracketed
                .split_once(']')
                .ok_or_else(|| invalid("unterminated context path"))?;
            let context = context.trim();
            if !context.starts_with('/') {
                return Err(invalid("context path must be absolute"));
            }
            path = Some(ResourcePath::new(context));
            rest = remainder.trim_start();
        }

        let (key, value) = rest
            .split_once('=')
            .ok_or_else(|| invalid("missing '='"))?;
        let key = key.trim();
        let value: Value =
            serde_json::from_str(value.trim()).map_err(|_| invalid("value is not valid JSON"))?;

        let (config_name, properties, all_properties) = match value {
            Value::Object(properties) => (key, properties, true),
            value => {
                let (config_name, property) = key
                    .rsplit_once('/')
                    .ok_or_else(|| invalid("missing property name"))?;
                if property.is_empty() {
                    return Err(invalid("missing property name"));
                }
                let mut properties = ValueMap::new();
                properties.insert(property.to_string(), value);
                (config_name, properties, false)
            }
        };
        if !is_valid_config_name(config_name) {
            return Err(invalid("invalid configuration name"));
        }

        Ok(Self {
            path,
            config_name: config_name.to_string(),
            properties,
            all_properties,
        })
    }

    /// Whether the override applies to a configuration resolved for
    /// `context_path`.
    pub fn matches(&self, context_path: &ResourcePath, config_name: &str) -> bool {
        self.config_name == config_name
            && self
                .path
                .as_ref()
                .is_none_or(|path| context_path.is_descendant_of(path))
    }
}

/// Parse override lines, skipping blank and invalid ones.
pub fn parse_override_lines(lines: &[String]) -> Vec<OverrideItem> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| match OverrideItem::parse(line) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping override");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_parse_property_override() {
        let item = OverrideItem::parse(r#"[/content/site1]my.Config/param1="value""#).unwrap();

        assert_eq!(item.path, Some(ResourcePath::new("/content/site1")));
        assert_eq!(item.config_name, "my.Config");
        assert_eq!(item.properties.get("param1"), Some(&json!("value")));
        assert!(!item.all_properties);
    }

    #[test]
    fn test_parse_nested_config_name() {
        let item = OverrideItem::parse("my.Config/nested/count=5").unwrap();

        assert_eq!(item.path, None);
        assert_eq!(item.config_name, "my.Config/nested");
        assert_eq!(item.properties.get("count"), Some(&json!(5)));
    }

    #[test]
    fn test_parse_all_properties_override() {
        let item = OverrideItem::parse(r#"my.Config = {"a": 1, "b": [true]}"#).unwrap();

        assert!(item.all_properties);
        assert_eq!(item.config_name, "my.Config");
        assert_eq!(
            &item.properties,
            json!({"a": 1, "b": [true]}).as_object().unwrap()
        );
    }

    #[rstest]
    #[case::no_equals("my.Config/param1")]
    #[case::bad_json("my.Config/param1=value")]
    #[case::no_property("my.Config=5")]
    #[case::unterminated_path("[/content my.Config/a=1")]
    #[case::relative_path("[content]my.Config/a=1")]
    #[case::traversal("../my.Config/a=1")]
    #[case::empty_property("my.Config/=1")]
    fn test_parse_rejects(#[case] line: &str) {
        assert!(matches!(
            OverrideItem::parse(line),
            Err(Error::InvalidOverride { .. })
        ));
    }

    #[test]
    fn test_invalid_lines_are_skipped() {
        let lines = vec![
            "my.Config/a=1".to_string(),
            "garbage".to_string(),
            "  ".to_string(),
            "my.Config/b=2".to_string(),
        ];
        let items = parse_override_lines(&lines);
        assert_eq!(items.len(), 2);
    }

    #[rstest]
    #[case("/content/site1", true)]
    #[case("/content/site1/page", true)]
    #[case("/content/site10", false)]
    #[case("/content", false)]
    fn test_matches_context_subtree(#[case] context: &str, #[case] expected: bool) {
        let item = OverrideItem::parse("[/content/site1]my.Config/a=1").unwrap();
        assert_eq!(item.matches(&ResourcePath::new(context), "my.Config"), expected);
        assert!(!item.matches(&ResourcePath::new(context), "other.Config"));
    }
}
