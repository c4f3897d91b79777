//! Action document commands.

use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context as _, anyhow};
use serde_json::Value;
use tracing::debug;
use warden_config::{ActionValue, SettingDocument, X509Inspector};

use crate::cli::{CliError, CliResult, Context, DescribeArgs, Outcome, ValidateArgs};
use crate::output::{render_json, render_validation};

/// Load an action value from either a setting document (`{"syntax", "values"}`) or a bare JSON
/// array of entries.
pub(crate) fn load_action_value(path: &Path) -> CliResult<ActionValue> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))
        .map_err(CliError::failure)?;
    let raw: Value = serde_json::from_str(&text)
        .with_context(|| format!("'{}' is not valid JSON", path.display()))
        .map_err(CliError::failure)?;

    let value = if raw.is_object() {
        let document: SettingDocument = serde_json::from_value(raw)
            .with_context(|| format!("'{}' is not a setting document", path.display()))
            .map_err(CliError::failure)?;
        debug!(
            path = %path.display(),
            legacy = document.is_legacy(),
            nodes = document.values.len(),
            "loaded setting document"
        );
        ActionValue::from_document(&document)
    } else {
        ActionValue::from_json(&text)
    };
    value.map_err(|err| CliError::failure(anyhow!("{}: {err}", path.display())))
}

pub(crate) fn handle_validate(
    ctx: &Context,
    args: &ValidateArgs,
    out: &mut dyn Write,
) -> CliResult<Outcome> {
    let value = load_action_value(&args.file)?;
    let problems = value.validate(args.required);
    let message = problems.first().map(String::as_str);
    render_validation(out, message, ctx.format)?;
    Ok(if message.is_some() {
        Outcome::Invalid
    } else {
        Outcome::Success
    })
}

pub(crate) fn handle_describe(
    ctx: &Context,
    args: &DescribeArgs,
    out: &mut dyn Write,
) -> CliResult<Outcome> {
    let value = load_action_value(&args.file)?;
    if args.api {
        let described = value
            .describe_for_api(&X509Inspector)
            .map_err(CliError::failure)?;
        render_json(out, &described)?;
    } else {
        let text = value.describe_for_display(ctx.locale);
        writeln!(out, "{text}").map_err(CliError::failure)?;
    }
    Ok(Outcome::Success)
}
