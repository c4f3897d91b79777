//! Configuration health audit command.

use std::fs;
use std::io::Write;
use std::sync::Arc;

use anyhow::Context as _;
use tracing::info;
use warden_health::{BundledCatalog, CharacterClassScorer, HealthEngine, MemorySnapshot};

use crate::cli::{AuditArgs, CliError, CliResult, Context, Outcome};
use crate::output::render_findings;

pub(crate) fn handle_audit(
    ctx: &Context,
    args: &AuditArgs,
    out: &mut dyn Write,
) -> CliResult<Outcome> {
    let text = fs::read_to_string(&args.snapshot)
        .with_context(|| format!("failed to read '{}'", args.snapshot.display()))
        .map_err(CliError::failure)?;
    let snapshot = MemorySnapshot::from_json(&text)
        .with_context(|| format!("'{}' is not a configuration snapshot", args.snapshot.display()))
        .map_err(CliError::failure)?;

    let engine = HealthEngine::with_default_rules(Arc::new(CharacterClassScorer));
    let findings = engine.audit_running(Some(&snapshot), args.mode.into(), ctx.locale);
    info!(
        snapshot = %args.snapshot.display(),
        findings = findings.len(),
        "configuration audit complete"
    );
    render_findings(out, &findings, &BundledCatalog, ctx.format)?;
    Ok(Outcome::Success)
}
