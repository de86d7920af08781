//! Diagnostic report assembly and output.
//!
//! A `DiagnosticReport` gathers the results of one run. It is printed either as
//! colored tables (HTTP, certificate, DNS) or as a single JSON document.

mod text;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::OutputFormat;
use crate::dns::DnsRecordSet;
use crate::domain::NormalizedTarget;
use crate::http::HttpProbeResult;
use crate::proxy::ProxyHealth;
use crate::tls::CertificateFacts;

pub use text::render_text;

/// Everything one run found out about a target.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticReport {
    /// The normalized target all probes ran against
    pub target: NormalizedTarget,
    /// Outcome of the proxy pre-flight, if one ran
    pub proxy_health: Option<ProxyHealth>,
    /// DNS records per type
    pub dns: DnsRecordSet,
    /// HTTP probe outcome
    pub http: HttpProbeResult,
    /// Certificate facts
    pub tls: CertificateFacts,
}

/// Renders the report as pretty-printed JSON.
pub fn render_json(report: &DiagnosticReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize diagnostic report")
}

/// Writes the report to stdout in the requested format.
pub fn print_report(report: &DiagnosticReport, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Text => render_text(report),
        OutputFormat::Json => render_json(report)?,
    };
    println!("{rendered}");
    Ok(())
}
