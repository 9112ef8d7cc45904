//! Resolve command

use caconfig_core::ResolutionContext;
use caconfig_resource::Resource;
use colored::Colorize;
use serde_json::{Value, json};

use crate::context::CliContext;
use crate::error::Result;

/// Run the resolve command
pub fn run_resolve(
    context: &CliContext,
    resource: &str,
    name: &str,
    collection: bool,
    bucket: Option<&str>,
) -> Result<()> {
    let value = resolve_value(context, resource, name, collection, bucket)?;
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

/// Resolve to a JSON value: the effective properties, or the raw
/// configuration resources of `bucket`.
pub fn resolve_value(
    context: &CliContext,
    resource: &str,
    name: &str,
    collection: bool,
    bucket: Option<&str>,
) -> Result<Value> {
    let content = context.resource(resource)?;
    let ctx = ResolutionContext::new(&context.tree);
    let caconfig = &context.caconfig;

    if let Some(bucket) = bucket {
        let value = if collection {
            let items = caconfig
                .resources
                .get_resource_collection(&ctx, &content, bucket, name)?;
            Value::Array(items.iter().map(raw).collect())
        } else {
            caconfig
                .resources
                .get_resource(&ctx, &content, bucket, name)?
                .as_ref()
                .map_or(Value::Null, raw)
        };
        return Ok(value);
    }

    let builder = caconfig.resolver.get(&ctx, Some(&content)).name(name);
    if !builder.has(name) {
        eprintln!(
            "{} No configuration '{}' found for {}",
            "warning:".yellow().bold(),
            name,
            resource
        );
    }
    let value = if collection {
        Value::Array(
            builder
                .as_value_map_collection()?
                .into_iter()
                .map(Value::Object)
                .collect(),
        )
    } else {
        Value::Object(builder.as_value_map()?)
    };
    Ok(value)
}

fn raw(resource: &Resource) -> Value {
    json!({
        "path": resource.path().as_str(),
        "properties": resource.value_map(),
    })
}
