//! Static scan: detect the agent, normalise its config, run the checks.

use crate::adapters::detect_adapter;
use crate::checks;
use crate::error::Result;
use crate::model::ScanResult;
use crate::paths::{expand_home, resolve};
use crate::risk::{calculate_risk_score, risk_tier};
use chrono::Utc;
use std::path::Path;
use tracing::info;

pub fn scan(path: &Path) -> Result<ScanResult> {
    let target = resolve(&expand_home(&path.to_string_lossy()));
    let adapter = detect_adapter(&target)?;

    let mut config = adapter.config(&target);
    let skills = adapter.skills(&target);
    let endpoints = adapter.endpoints(&target);
    if !endpoints.is_empty() {
        config.endpoints = endpoints;
    }

    let checks = checks::evaluate_all(&config, &skills);
    let risk_score = calculate_risk_score(&checks);
    let risk_tier = risk_tier(risk_score);
    info!(
        adapter = adapter.name(),
        path = %target.display(),
        risk_score,
        tier = %risk_tier,
        "scan complete"
    );

    Ok(ScanResult {
        agent_name: config.agent_name,
        agent_version: config.agent_version,
        adapter_name: adapter.name().to_string(),
        scanned_path: target.display().to_string(),
        checks,
        risk_score,
        risk_tier,
        generated_at: Utc::now(),
    })
}
