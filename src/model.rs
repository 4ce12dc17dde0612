use chrono::{DateTime, SubsecRound, Utc};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::path::PathBuf;

/// Process identifier as exposed by the process-information filesystem.
pub type Pid = u32;

/// What a monitor observation is about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    #[serde(rename = "EXEC")]
    Exec,
    #[serde(rename = "READ")]
    Read,
    #[serde(rename = "WRITE")]
    Write,
    #[serde(rename = "NETWORK")]
    Network,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Exec => "EXEC",
            EventKind::Read => "READ",
            EventKind::Write => "WRITE",
            EventKind::Network => "NETWORK",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() so width specifiers like {:<7} apply
        f.pad(self.as_str())
    }
}

/// Severity shared by monitor events and static checks.
///
/// Ordered, so `max()` over a set of findings yields the worst one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Upper-case label used in human-facing output.
    pub fn label(self) -> &'static str {
        match self {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        }
    }

    /// High and critical both count as high alerts.
    pub fn is_high_alert(self) -> bool {
        matches!(self, Severity::High | Severity::Critical)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One observation made by the process monitor.
///
/// Built once when a new (process, resource, direction) tuple is first
/// seen and never changed afterwards, hence no setters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorEvent {
    #[serde(with = "iso_seconds")]
    timestamp: DateTime<Utc>,
    kind: EventKind,
    target: String,
    severity: Severity,
}

impl MonitorEvent {
    /// Stamp a new event with the current UTC second.
    pub fn new(kind: EventKind, target: impl Into<String>, severity: Severity) -> Self {
        Self::at(kind, target, severity, Utc::now())
    }

    /// Event with an explicit capture time, truncated to whole seconds.
    pub fn at(
        kind: EventKind,
        target: impl Into<String>,
        severity: Severity,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp: timestamp.trunc_subsecs(0),
            kind,
            target: target.into(),
            severity,
        }
    }

    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// ISO-8601 UTC, second precision: `2026-01-02T03:04:05+00:00`.
    pub fn timestamp_string(&self) -> String {
        iso_seconds::format(&self.timestamp)
    }
}

/// Counts derived from a session's event log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorSummary {
    pub events: usize,
    pub alerts_high: usize,
    pub alerts_medium: usize,
}

/// A skill / plugin declared by an agent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub permissions: Vec<String>,
    pub source: String,
}

/// Agent configuration normalised across agent flavours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub agent_name: String,
    pub agent_version: String,
    pub root_path: PathBuf,
    pub allowed_paths: Vec<String>,
    pub blocked_paths: Vec<String>,
    pub shell_mode: String,
    pub endpoints: Vec<String>,
    pub env_var_refs: Vec<String>,
    pub hardcoded_secrets: Vec<String>,
    /// File the config was read from, if any; the secrets check rescans it.
    pub config_path: Option<PathBuf>,
}

/// Outcome of a single static rule check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    pub key: String,
    pub title: String,
    pub score: f64,
    pub severity: Severity,
    pub summary: String,
    pub details: Vec<String>,
}

impl CheckResult {
    pub fn new(
        key: &str,
        title: &str,
        score: f64,
        severity: Severity,
        summary: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self {
            key: key.to_string(),
            title: title.to_string(),
            score,
            severity,
            summary: summary.into(),
            details,
        }
    }
}

/// Risk band derived from the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskTier {
    Low,
    Medium,
    High,
    Critical,
}

impl RiskTier {
    pub fn as_str(self) -> &'static str {
        match self {
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Full result of a static scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub agent_name: String,
    pub agent_version: String,
    pub adapter_name: String,
    pub scanned_path: String,
    /// Kept in evaluation order; serialised as an object keyed by check key.
    #[serde(serialize_with = "checks_as_map")]
    pub checks: Vec<CheckResult>,
    pub risk_score: f64,
    pub risk_tier: RiskTier,
    #[serde(with = "iso_seconds")]
    pub generated_at: DateTime<Utc>,
}

impl ScanResult {
    pub fn check(&self, key: &str) -> Option<&CheckResult> {
        self.checks.iter().find(|c| c.key == key)
    }
}

fn checks_as_map<S: Serializer>(checks: &[CheckResult], ser: S) -> Result<S::Ok, S::Error> {
    let mut map = ser.serialize_map(Some(checks.len()))?;
    for check in checks {
        map.serialize_entry(&check.key, check)?;
    }
    map.end()
}

/// RFC 3339 with whole seconds and an explicit `+00:00` offset.
pub mod iso_seconds {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(ts: &DateTime<Utc>) -> String {
        ts.to_rfc3339_opts(SecondsFormat::Secs, false)
    }

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&format(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(de)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
