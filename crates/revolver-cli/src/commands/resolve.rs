//! `revolver resolve` command implementation.
//!
//! Runs the request through the revolver plugin and the parsed-resolve
//! fallback, the same path a host bundler takes.

use super::RequestInput;
use miette::{IntoDiagnostic, Result};
use revolver_core::pipeline::{ResolveError, Resolved, ResolverPipeline};
use revolver_core::plugin::RevolverPlugin;
use revolver_core::version::RESOLVE_SCHEMA_VERSION;
use serde::Serialize;

/// JSON output for `revolver resolve --json`.
#[derive(Debug, Serialize)]
struct ResolveOutput<'a> {
    schema_version: u32,
    request: &'a str,
    from: String,
    status: &'static str,
    resolved: Option<String>,
    source: Option<String>,
    message: Option<String>,
}

pub fn run(input: &RequestInput, json: bool) -> Result<()> {
    let pipeline = ResolverPipeline::new()
        .with_config_extensions(&input.config)
        .plugin(RevolverPlugin::new(input.config.clone()));
    let result = pipeline.resolve(&input.request, &input.from);

    match &result {
        Ok(resolved) => tracing::debug!(
            request = %input.request,
            source = %resolved.source,
            path = %resolved.path.display(),
            "Resolved"
        ),
        Err(err) => tracing::debug!(request = %input.request, error = %err, "Unresolved"),
    }

    if json {
        let output = to_output(input, &result);
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
        return Ok(());
    }

    let resolved = result.into_diagnostic()?;
    println!("{}", resolved.path.display());
    Ok(())
}

fn to_output<'a>(
    input: &'a RequestInput,
    result: &std::result::Result<Resolved, ResolveError>,
) -> ResolveOutput<'a> {
    let base = ResolveOutput {
        schema_version: RESOLVE_SCHEMA_VERSION,
        request: &input.request,
        from: input.from.display().to_string(),
        status: "unresolved",
        resolved: None,
        source: None,
        message: None,
    };

    match result {
        Ok(resolved) => ResolveOutput {
            status: "resolved",
            resolved: Some(resolved.path.display().to_string()),
            source: Some(resolved.source.clone()),
            message: resolved.message.clone(),
            ..base
        },
        Err(err) => ResolveOutput {
            message: Some(err.to_string()),
            ..base
        },
    }
}
