//! Colored text tables.

use std::fmt::Write as _;

use colored::{Color, ColoredString, Colorize};

use super::DiagnosticReport;
use crate::dns::DnsRecordSet;
use crate::http::HttpProbeResult;
use crate::proxy::ProxyHealth;
use crate::tls::{parse_not_after, CertificateFacts};

const RULE_WIDTH: usize = 60;

/// A two-column table with a title.
struct Table {
    title: String,
    label_color: Color,
    rows: Vec<(String, ColoredString)>,
}

impl Table {
    fn new(title: impl Into<String>, label_color: Color) -> Self {
        Self {
            title: title.into(),
            label_color,
            rows: Vec::new(),
        }
    }

    fn row(&mut self, label: impl Into<String>, value: ColoredString) {
        self.rows.push((label.into(), value));
    }

    fn render(&self, out: &mut String) {
        let width = self
            .rows
            .iter()
            .map(|(label, _)| label.chars().count())
            .max()
            .unwrap_or(0);

        let _ = writeln!(out, "{}", self.title.bold());
        let _ = writeln!(out, "{}", "─".repeat(RULE_WIDTH).dimmed());
        for (label, value) in &self.rows {
            // Pad before coloring so escape codes do not skew the alignment
            let padded = format!("{label:<width$}");
            let _ = writeln!(out, "  {}  {}", padded.color(self.label_color), value);
        }
        let _ = writeln!(out);
    }
}

/// Renders the full report.
pub fn render_text(report: &DiagnosticReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}\n", "Web & DNS Verifier".cyan().bold());

    if let Some(health) = &report.proxy_health {
        let _ = writeln!(out, "{}\n", proxy_line(health));
    }
    let _ = writeln!(
        out,
        "{} {} (Domain: {})\n",
        "Analyzing:".yellow().bold(),
        report.target.origin_url().blue(),
        report.target.host()
    );

    http_table(&report.http).render(&mut out);
    tls_table(&report.tls).render(&mut out);
    dns_table(report.target.host(), &report.dns).render(&mut out);

    let _ = write!(out, "{}", "Verification Complete!".green().bold());
    out
}

fn proxy_line(health: &ProxyHealth) -> String {
    if health.connected {
        format!(
            "{} Location: {}",
            "✓ Proxy connected successfully!".green().bold(),
            health.country.yellow()
        )
    } else {
        format!("✗ Proxy connection failed after {} attempts", health.attempts)
            .red()
            .bold()
            .to_string()
    }
}

fn http_table(result: &HttpProbeResult) -> Table {
    let mut table = Table::new("HTTP Status", Color::Cyan);
    match result {
        HttpProbeResult::Success {
            status_code,
            reason,
            latency_ms,
            redirect_count,
            final_url,
            server_header,
        } => {
            table.row(
                "Status Code",
                format!("{status_code} {reason}").color(status_color(*status_code)),
            );
            table.row("Latency", format!("{latency_ms:.2} ms").normal());
            table.row("Redirects", redirect_count.to_string().normal());
            table.row("Final URL", final_url.as_str().normal());
            table.row("Server", server_header.as_str().normal());
        }
        HttpProbeResult::Failure { error } => {
            table.row("Status", "FAILED".red().bold());
            table.row("Error", error.as_str().red());
        }
    }
    table
}

fn tls_table(facts: &CertificateFacts) -> Table {
    let mut table = Table::new("SSL Certificate", Color::Magenta);
    match facts {
        CertificateFacts::Valid {
            not_after,
            days_remaining,
            issuer_org,
        } => {
            table.row("Valid", "YES".green().bold());
            table.row("Expiry Date", expiry_date(not_after).normal());
            table.row(
                "Days Remaining",
                format!("{days_remaining} days").color(days_color(*days_remaining)),
            );
            table.row("Issuer", issuer_org.as_str().normal());
        }
        CertificateFacts::Invalid { error } => {
            table.row("Valid", "NO".red().bold());
            table.row("Error", error.as_str().red());
        }
    }
    table
}

fn dns_table(host: &str, records: &DnsRecordSet) -> Table {
    let mut table = Table::new(format!("DNS Records for {host}"), Color::Yellow);
    for (record_type, values) in records.iter() {
        if values.is_empty() {
            table.row(record_type.to_string(), "No records found".dimmed());
            continue;
        }
        for (i, value) in values.iter().enumerate() {
            let label = if i == 0 {
                record_type.to_string()
            } else {
                String::new()
            };
            table.row(label, value.as_str().normal());
        }
    }
    table
}

/// 2xx is green, anything else red.
fn status_color(status_code: u16) -> Color {
    if (200..300).contains(&status_code) {
        Color::Green
    } else {
        Color::Red
    }
}

fn days_color(days_remaining: i64) -> Color {
    if days_remaining > 30 {
        Color::Green
    } else if days_remaining > 7 {
        Color::Yellow
    } else {
        Color::Red
    }
}

/// `YYYY-MM-DD` of a `notAfter` string, or the string itself if it does not parse.
fn expiry_date(not_after: &str) -> String {
    parse_not_after(not_after)
        .map(|at| at.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| not_after.to_string())
}
