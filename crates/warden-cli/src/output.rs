//! Output renderers for CLI commands.

use std::io::Write;

use anyhow::anyhow;
use serde::Serialize;
use serde_json::json;
use warden_health::{HealthRecord, MessageCatalog};

use crate::cli::{CliError, CliResult, OutputFormat};

pub(crate) fn render_json<T: Serialize + ?Sized>(out: &mut dyn Write, value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    writeln!(out, "{text}").map_err(CliError::failure)
}

pub(crate) fn render_validation(
    out: &mut dyn Write,
    message: Option<&str>,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => render_json(
            out,
            &json!({ "valid": message.is_none(), "message": message }),
        ),
        OutputFormat::Table => {
            writeln!(out, "{}", message.unwrap_or("ok")).map_err(CliError::failure)
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RenderedFinding<'a> {
    #[serde(flatten)]
    record: &'a HealthRecord,
    message: String,
}

pub(crate) fn render_findings(
    out: &mut dyn Write,
    findings: &[HealthRecord],
    catalog: &dyn MessageCatalog,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => {
            let rendered = findings
                .iter()
                .map(|record| RenderedFinding {
                    record,
                    message: record.render(catalog),
                })
                .collect::<Vec<_>>();
            render_json(out, &rendered)
        }
        OutputFormat::Table => {
            if findings.is_empty() {
                return writeln!(out, "no findings").map_err(CliError::failure);
            }
            writeln!(out, "{:<8} {:<15} MESSAGE", "SEVERITY", "TOPIC").map_err(CliError::failure)?;
            for record in findings {
                writeln!(
                    out,
                    "{:<8} {:<15} {}",
                    record.severity.as_str(),
                    record.topic.as_str(),
                    record.render(catalog)
                )
                .map_err(CliError::failure)?;
            }
            Ok(())
        }
    }
}
