//! `revolver explain` command implementation.

use super::RequestInput;
use miette::{IntoDiagnostic, Result};
use revolver_core::resolver::{
    OsProbe, Outcome, RequestContext, ResolveTraceStep, Revolver, EXPLAIN_SCHEMA_VERSION,
};
use serde::Serialize;

/// JSON output for `revolver explain --json`.
#[derive(Debug, Serialize)]
struct ExplainOutput<'a> {
    schema_version: u32,
    request: &'a str,
    from: String,
    config: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    file: Option<String>,
    /// Request the host continues with, relative to `path`.
    #[serde(skip_serializing_if = "Option::is_none")]
    handoff_request: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    handoff_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rewritten_request: Option<String>,
    trace: &'a [ResolveTraceStep],
}

pub fn run(input: &RequestInput, json: bool) -> Result<()> {
    let revolver = Revolver::new(input.config.clone());
    let ctx = RequestContext::new(input.request.clone(), input.from.clone());
    let traced = revolver.resolve_with_trace(&ctx, &OsProbe);

    let mut output = ExplainOutput {
        schema_version: EXPLAIN_SCHEMA_VERSION,
        request: &input.request,
        from: input.from.display().to_string(),
        config: input.config_path.display().to_string(),
        status: "deferred",
        reason: None,
        file: None,
        handoff_request: None,
        handoff_path: None,
        rewritten_request: traced.outcome.rewritten_request().map(ToString::to_string),
        trace: &traced.trace.steps,
    };
    match &traced.outcome {
        Outcome::Matched(found) => {
            output.status = "matched";
            output.file = Some(found.file.display().to_string());
            output.handoff_request = Some(found.request.clone());
            output.handoff_path = Some(found.path.display().to_string());
        }
        Outcome::Deferred(deferral) => output.reason = Some(deferral.reason.as_str()),
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&output).into_diagnostic()?);
    } else {
        print_explain_human(&output);
    }
    Ok(())
}

fn print_explain_human(output: &ExplainOutput<'_>) {
    println!("Request: {}", output.request);
    println!("From: {}", output.from);
    println!("Config: {}", output.config);
    println!();

    if let Some(file) = &output.file {
        println!("Matched: {file}");
        if let (Some(request), Some(path)) = (&output.handoff_request, &output.handoff_path) {
            println!("Handoff: {request} from {path}");
        }
    } else {
        println!("Status: DEFERRED");
        if let Some(reason) = output.reason {
            println!("Reason: {reason}");
        }
    }
    if let Some(rewritten) = &output.rewritten_request {
        println!("Rewritten request: {rewritten}");
    }
    println!();

    println!("Resolution trace:");
    for (i, step) in output.trace.iter().enumerate() {
        let status = if step.ok { "OK" } else { "FAIL" };
        println!("  {}. [{}] {}: {}", i + 1, status, step.step, step.detail);
        if let Some(index) = step.index {
            println!("      index: {index}");
        }
        if let Some(path) = &step.path {
            println!("      path: {}", path.display());
        }
    }
}
