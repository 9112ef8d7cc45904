//! Names command

use caconfig_core::ResolutionContext;
use caconfig_meta::ConfigurationMetadataProvider;
use colored::Colorize;
use serde_json::{Map, Value};

use crate::context::CliContext;
use crate::error::Result;

/// Run the names command
pub fn run_names(context: &CliContext, resource: Option<&str>, json: bool) -> Result<()> {
    let names = context.caconfig.metadata.configuration_names();
    let content = resource.map(|path| context.resource(path)).transpose()?;
    let ctx = ResolutionContext::new(&context.tree);

    let exists = |name: &str| {
        content
            .as_ref()
            .map(|content| context.caconfig.resolver.get(&ctx, Some(content)).has(name))
    };

    if json {
        let value = match &content {
            Some(_) => Value::Object(
                names
                    .iter()
                    .map(|name| (name.clone(), Value::Bool(exists(name).unwrap_or(false))))
                    .collect::<Map<String, Value>>(),
            ),
            None => Value::Array(names.iter().cloned().map(Value::String).collect()),
        };
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("{}", "Configuration Names".bold());
    println!();
    for name in &names {
        let label = context
            .caconfig
            .metadata
            .configuration_metadata(name)
            .and_then(|metadata| metadata.label)
            .unwrap_or_default();
        match exists(name) {
            Some(true) => println!("  {} {:<40} {}", "✓".green(), name, label.dimmed()),
            Some(false) => println!("  {} {:<40} {}", "✗".red(), name, label.dimmed()),
            None => println!("  {:<40} {}", name.green(), label.dimmed()),
        }
    }
    println!();
    println!("{} {} configurations.", "Total:".dimmed(), names.len());
    Ok(())
}
