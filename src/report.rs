//! Rendering of scans, comparisons and monitor sessions.
//!
//! Everything here returns a `String`; the caller decides where it goes.
//! Colour is opt-in and only ever wraps already-padded cells, so aligned
//! columns stay aligned with or without it.

use crate::model::{MonitorEvent, MonitorSummary, Pid, RiskTier, ScanResult, Severity};
use crossterm::style::{Color, Stylize};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ScanFormat {
    #[default]
    Table,
    Json,
    Markdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum MonitorFormat {
    #[default]
    Table,
    Json,
}

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Low => Color::Green,
        Severity::Medium => Color::Yellow,
        Severity::High => Color::Red,
        Severity::Critical => Color::Magenta,
    }
}

fn tier_color(tier: RiskTier) -> Color {
    match tier {
        RiskTier::Low => Color::Green,
        RiskTier::Medium => Color::Yellow,
        RiskTier::High => Color::Red,
        RiskTier::Critical => Color::Magenta,
    }
}

fn paint(text: String, color: Color, enabled: bool) -> String {
    if enabled {
        text.with(color).bold().to_string()
    } else {
        text
    }
}

/// Pad each cell to its column's width, two spaces between columns.
fn aligned(rows: &[Vec<String>]) -> Vec<Vec<String>> {
    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|i| {
            rows.iter()
                .filter_map(|r| r.get(i))
                .map(|c| c.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    rows.iter()
        .map(|row| {
            let last = row.len().saturating_sub(1);
            row.iter()
                .enumerate()
                .map(|(i, cell)| {
                    if i == last {
                        cell.clone()
                    } else {
                        format!("{:<width$}", cell, width = widths[i])
                    }
                })
                .collect()
        })
        .collect()
}

pub fn render_scan(result: &ScanResult, format: ScanFormat, color: bool) -> serde_json::Result<String> {
    match format {
        ScanFormat::Table => Ok(scan_table(result, color)),
        ScanFormat::Json => serde_json::to_string_pretty(result),
        ScanFormat::Markdown => Ok(scan_markdown(result)),
    }
}

pub fn scan_table(result: &ScanResult, color: bool) -> String {
    let mut out = vec![
        format!("agent-audit scan :: {} ({})", result.agent_name, result.adapter_name),
        format!(
            "Risk Score: {:.1}/10 [{}]",
            result.risk_score,
            paint(result.risk_tier.to_string(), tier_color(result.risk_tier), color)
        ),
        String::new(),
    ];

    let mut rows = vec![vec![
        "Check".to_string(),
        "Severity".to_string(),
        "Score".to_string(),
        "Summary".to_string(),
    ]];
    rows.extend(result.checks.iter().map(|c| {
        vec![
            c.title.clone(),
            c.severity.label().to_string(),
            format!("{:.1}", c.score),
            c.summary.clone(),
        ]
    }));

    for (i, mut row) in aligned(&rows).into_iter().enumerate() {
        if i > 0 {
            let severity = result.checks[i - 1].severity;
            row[1] = paint(row[1].clone(), severity_color(severity), color);
        }
        out.push(row.join("  ").trim_end().to_string());
    }

    let detailed: Vec<_> = result.checks.iter().filter(|c| !c.details.is_empty()).collect();
    if !detailed.is_empty() {
        out.push(String::new());
        for check in detailed {
            out.push(format!("{}:", check.title));
            out.extend(check.details.iter().map(|d| format!("  * {d}")));
        }
    }
    out.join("\n")
}

pub fn scan_markdown(result: &ScanResult) -> String {
    let mut out = vec![
        format!("# agent-audit report: {}", result.agent_name),
        String::new(),
        format!("- adapter: `{}`", result.adapter_name),
        format!("- path: `{}`", result.scanned_path),
        format!("- risk: **{:.1}/10 ({})**", result.risk_score, result.risk_tier),
        String::new(),
        "| Check | Severity | Score | Summary |".to_string(),
        "|---|---:|---:|---|".to_string(),
    ];
    out.extend(result.checks.iter().map(|c| {
        format!(
            "| {} | {} | {:.1} | {} |",
            c.title,
            c.severity.label(),
            c.score,
            c.summary
        )
    }));
    out.join("\n")
}

/// One side of a comparison, as serialised under `left` / `right`.
#[derive(Debug, Serialize)]
pub struct CompareSide<'a> {
    pub path: String,
    pub name: &'a str,
    pub adapter: &'a str,
    pub risk_score: f64,
    pub risk_tier: RiskTier,
    #[serde(serialize_with = "severities_by_key")]
    pub checks: &'a ScanResult,
}

impl<'a> CompareSide<'a> {
    pub fn new(path: impl Into<String>, result: &'a ScanResult) -> Self {
        Self {
            path: path.into(),
            name: &result.agent_name,
            adapter: &result.adapter_name,
            risk_score: result.risk_score,
            risk_tier: result.risk_tier,
            checks: result,
        }
    }

    fn severity_of(&self, key: &str) -> &'static str {
        self.checks.check(key).map_or("-", |c| c.severity.label())
    }
}

fn severities_by_key<S: Serializer>(result: &&ScanResult, ser: S) -> Result<S::Ok, S::Error> {
    let mut map = ser.serialize_map(Some(result.checks.len()))?;
    for check in &result.checks {
        map.serialize_entry(&check.key, &check.severity)?;
    }
    map.end()
}

#[derive(Debug, Serialize)]
pub struct Comparison<'a> {
    pub left: CompareSide<'a>,
    pub right: CompareSide<'a>,
}

const COMPARED_CHECKS: &[(&str, &str)] = &[
    ("File system", crate::checks::FILESYSTEM),
    ("Network", crate::checks::NETWORK),
    ("Shell", crate::checks::SHELL),
    ("Secrets", crate::checks::SECRETS),
    ("Skills", crate::checks::SKILLS),
];

impl Comparison<'_> {
    fn rows(&self) -> Vec<Vec<String>> {
        let (l, r) = (&self.left, &self.right);
        let mut rows = vec![
            vec!["Metric".into(), "Agent 1".into(), "Agent 2".into()],
            vec!["Name".into(), l.name.to_string(), r.name.to_string()],
            vec![
                "Risk score".into(),
                format!("{:.1} ({})", l.risk_score, l.risk_tier),
                format!("{:.1} ({})", r.risk_score, r.risk_tier),
            ],
        ];
        rows.extend(COMPARED_CHECKS.iter().map(|(label, key)| {
            vec![
                label.to_string(),
                l.severity_of(key).to_string(),
                r.severity_of(key).to_string(),
            ]
        }));
        rows
    }

    pub fn render(&self, format: ScanFormat) -> serde_json::Result<String> {
        match format {
            ScanFormat::Json => serde_json::to_string_pretty(self),
            ScanFormat::Markdown => Ok(self.markdown()),
            ScanFormat::Table => Ok(self.table()),
        }
    }

    pub fn markdown(&self) -> String {
        let rows = self.rows();
        let mut out = vec![format!("| {} |", rows[0].join(" | ")), "|---|---:|---:|".to_string()];
        out.extend(rows[1..].iter().map(|r| format!("| {} |", r.join(" | "))));
        out.join("\n")
    }

    pub fn table(&self) -> String {
        aligned(&self.rows())
            .iter()
            .map(|r| r.join("  ").trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// `<timestamp> [<SEVERITY>] <KIND padded to 7> <target>`
pub fn event_line(event: &MonitorEvent, color: bool) -> String {
    let severity = paint(
        format!("[{}]", event.severity().label()),
        severity_color(event.severity()),
        color,
    );
    format!(
        "{} {} {:<7} {}",
        event.timestamp_string(),
        severity,
        event.kind(),
        event.target()
    )
}

pub fn summary_line(summary: &MonitorSummary) -> String {
    format!(
        "Session summary: events={} high={} medium={}",
        summary.events, summary.alerts_high, summary.alerts_medium
    )
}

/// JSON document for a finished monitor session.
#[derive(Debug, Serialize)]
pub struct MonitorReport<'a> {
    pub pid: Pid,
    pub command: Option<&'a str>,
    pub duration_seconds: f64,
    pub session_id: Uuid,
    pub events: &'a [MonitorEvent],
    pub summary: MonitorSummary,
}

impl MonitorReport<'_> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
