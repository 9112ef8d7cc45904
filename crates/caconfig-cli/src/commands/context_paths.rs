//! Context paths command

use caconfig_core::ResolutionContext;
use colored::Colorize;

use crate::context::CliContext;
use crate::error::Result;

/// Run the context-paths command
pub fn run_context_paths(context: &CliContext, resource: &str, json: bool) -> Result<()> {
    let content = context.resource(resource)?;
    let ctx = ResolutionContext::new(&context.tree);
    let paths: Vec<String> = context
        .caconfig
        .resources
        .get_all_context_paths(&ctx, &content)
        .iter()
        .map(|path| path.to_string())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&paths)?);
        return Ok(());
    }

    if paths.is_empty() {
        println!("{} No context resources for {}", "=>".blue().bold(), resource);
        return Ok(());
    }
    println!("{}", "Context Resources".bold());
    for (index, path) in paths.iter().enumerate() {
        let marker = if index == 0 { "nearest".green() } else { "".normal() };
        println!("  {:<40} {}", path.cyan(), marker);
    }
    Ok(())
}
