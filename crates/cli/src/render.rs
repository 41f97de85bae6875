//! Text, JSON and HTML renderings of the summary table.

use std::path::Path;

use base64::Engine;
use serde::Serialize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use liftboard_config::Settings;
use liftboard_io::export::{SummaryRow, SUMMARY_HEADERS};
use liftboard_io::logo::Logo;
use liftboard_records::{Selection, SelectionOptions};

use crate::CliError;

/// Widest a table column may grow before its cells are cut.
const MAX_COLUMN_WIDTH: usize = 32;

#[derive(Debug, Serialize)]
pub struct ReportMeta {
    pub title: String,
    pub source: String,
    pub generated_at: String,
    pub version: &'static str,
    pub total_records: usize,
    pub matched_records: usize,
    pub rows: usize,
}

/// Everything a rendering needs about one `best` run.
#[derive(Debug, Serialize)]
pub struct SummaryReport<'a> {
    pub meta: ReportMeta,
    pub selection: &'a Selection,
    pub rows: &'a [SummaryRow],
}

impl<'a> SummaryReport<'a> {
    pub fn new(
        settings: &Settings,
        source: &Path,
        selection: &'a Selection,
        total_records: usize,
        matched_records: usize,
        rows: &'a [SummaryRow],
    ) -> Self {
        Self {
            meta: ReportMeta {
                title: settings.display.title.clone(),
                source: source.display().to_string(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                version: env!("CARGO_PKG_VERSION"),
                total_records,
                matched_records,
                rows: rows.len(),
            },
            selection,
            rows,
        }
    }
}

// ---------------------------------------------------------------------------
// Plain-text table
// ---------------------------------------------------------------------------

fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `width` columns, marking the cut with `..`.
fn clip(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    let budget = width.saturating_sub(2);
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let w = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push_str("..");
    out
}

fn pad(s: &str, width: usize) -> String {
    let clipped = clip(s, width);
    let fill = width.saturating_sub(display_width(&clipped));
    format!("{}{}", clipped, " ".repeat(fill))
}

/// Aligned table: header, rule, one line per row.
pub fn table(rows: &[SummaryRow]) -> String {
    let cells: Vec<[String; 9]> = rows.iter().map(SummaryRow::cells).collect();

    let mut widths = SUMMARY_HEADERS.map(display_width);
    for row in &cells {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(display_width(cell));
        }
    }
    for w in widths.iter_mut() {
        *w = (*w).min(MAX_COLUMN_WIDTH);
    }

    let mut out = String::new();
    push_line(&mut out, SUMMARY_HEADERS.iter().copied(), &widths);
    push_line(&mut out, widths.iter().map(|w| "-".repeat(*w)), &widths);
    for row in &cells {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<S: AsRef<str>>(out: &mut String, cells: impl Iterator<Item = S>, widths: &[usize]) {
    let line = cells
        .zip(widths)
        .map(|(cell, w)| pad(cell.as_ref(), *w))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// One line per control listing the values it accepts.
pub fn options(options: &SelectionOptions) -> String {
    let lines = [
        ("Discipline", &options.discipline),
        ("Sex", &options.sex),
        ("Division", &options.division),
        ("Testing", &options.testing),
        ("Equipment", &options.equipment),
        ("Class", &options.weight_class),
    ];
    let mut out = String::new();
    for (label, values) in lines {
        let shown = if values.is_empty() {
            "(none)".to_string()
        } else {
            values.join(", ")
        };
        out.push_str(&format!("{:<12}{}\n", format!("{}:", label), shown));
    }
    out
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

pub fn json(report: &SummaryReport<'_>) -> Result<String, CliError> {
    let mut out = serde_json::to_string_pretty(report)
        .map_err(|e| CliError::other(format!("JSON encoding failed: {}", e)))?;
    out.push('\n');
    Ok(out)
}

// ---------------------------------------------------------------------------
// HTML
// ---------------------------------------------------------------------------

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Standalone page with the title, the optional logo inlined as a data URI,
/// and the summary table. An empty result renders the no-match message.
pub fn html(report: &SummaryReport<'_>, logo: Option<&Logo>) -> String {
    let title = escape_html(&report.meta.title);
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str(&format!("<title>{}</title>\n", title));
    out.push_str(
        "<style>\nbody{font-family:sans-serif;margin:2em}\n\
         table{border-collapse:collapse}\n\
         th,td{border:1px solid #ccc;padding:4px 8px;text-align:left}\n\
         th{background:#f0f0f0}\n\
         td.num{text-align:right}\n</style>\n",
    );
    out.push_str("</head>\n<body>\n");

    if let Some(logo) = logo {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&logo.bytes);
        out.push_str(&format!(
            "<img class=\"logo\" alt=\"\" src=\"data:{};base64,{}\">\n",
            logo.mime, encoded
        ));
    }
    out.push_str(&format!("<h1>{}</h1>\n", title));

    if report.rows.is_empty() {
        out.push_str(&format!("<p>{}</p>\n", escape_html(crate::query::NO_MATCH)));
    } else {
        out.push_str("<table>\n<thead><tr>");
        for header in SUMMARY_HEADERS {
            out.push_str(&format!("<th>{}</th>", header));
        }
        out.push_str("</tr></thead>\n<tbody>\n");
        for row in report.rows {
            out.push_str("<tr>");
            for (i, cell) in row.cells().iter().enumerate() {
                // Column 2 is Weight
                let class = if i == 2 { " class=\"num\"" } else { "" };
                out.push_str(&format!("<td{}>{}</td>", class, escape_html(cell)));
            }
            out.push_str("</tr>\n");
        }
        out.push_str("</tbody>\n</table>\n");
    }

    out.push_str(&format!(
        "<footer><small>{} of {} records match. Generated {}.</small></footer>\n",
        report.meta.matched_records,
        report.meta.total_records,
        escape_html(&report.meta.generated_at)
    ));
    out.push_str("</body>\n</html>\n");
    out
}
