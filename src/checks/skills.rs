use super::SKILLS;
use crate::model::{CheckResult, Severity, Skill};
use std::collections::BTreeSet;

const TITLE: &str = "Skills / Plugins";

const HIGH_RISK_PERMISSIONS: &[&str] = &["shell", "exec", "filesystem.write", "filesystem.*", "network.*"];
const MEDIUM_RISK_PERMISSIONS: &[&str] = &["network", "filesystem.read", "process.spawn"];

pub fn evaluate_skills(skills: &[Skill]) -> CheckResult {
    if skills.is_empty() {
        return CheckResult::new(
            SKILLS,
            TITLE,
            0.0,
            Severity::Low,
            "No installed skills/plugins detected.",
            Vec::new(),
        );
    }

    let mut high = 0usize;
    let mut medium = 0usize;
    let mut details = Vec::new();

    for skill in skills {
        let perms: BTreeSet<String> = skill.permissions.iter().map(|p| p.to_lowercase()).collect();
        let listed = perms.iter().cloned().collect::<Vec<_>>().join(", ");
        let has_any = |set: &[&str]| perms.iter().any(|p| set.contains(&p.as_str()));

        if has_any(HIGH_RISK_PERMISSIONS) {
            high += 1;
            details.push(format!("High-risk skill: {} ({listed})", skill.name));
        } else if has_any(MEDIUM_RISK_PERMISSIONS) {
            medium += 1;
            details.push(format!("Medium-risk skill: {} ({listed})", skill.name));
        }
    }

    let (score, severity, summary) = if high > 0 {
        (9.0, Severity::High, format!("{high} high-risk skill(s) detected."))
    } else if medium > 0 {
        (5.0, Severity::Medium, format!("{medium} medium-risk skill(s) detected."))
    } else {
        (
            2.0,
            Severity::Low,
            "Installed skills appear low risk from declared permissions.".to_string(),
        )
    };

    details.push(format!("Total installed skills: {}", skills.len()));
    CheckResult::new(SKILLS, TITLE, score, severity, summary, details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, perms: &[&str]) -> Skill {
        Skill {
            name: name.to_string(),
            permissions: perms.iter().map(|p| p.to_string()).collect(),
            source: String::new(),
        }
    }

    #[test]
    fn high_risk_wins() {
        let result = evaluate_skills(&[
            skill("reader", &["filesystem.read"]),
            skill("runner", &["Shell", "network"]),
        ]);
        assert_eq!((result.score, result.severity), (9.0, Severity::High));
        assert_eq!(result.summary, "1 high-risk skill(s) detected.");
        assert_eq!(
            result.details,
            vec![
                "Medium-risk skill: reader (filesystem.read)",
                "High-risk skill: runner (network, shell)",
                "Total installed skills: 2",
            ]
        );
    }

    #[test]
    fn harmless_skills_are_low() {
        let result = evaluate_skills(&[skill("clock", &["time.read"]), skill("noop", &[])]);
        assert_eq!((result.score, result.severity), (2.0, Severity::Low));
        assert_eq!(result.details, vec!["Total installed skills: 2"]);
    }

    #[test]
    fn none_installed_is_zero() {
        assert_eq!(evaluate_skills(&[]).score, 0.0);
    }
}
