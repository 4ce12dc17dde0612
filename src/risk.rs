use crate::checks::{FILESYSTEM, NETWORK, SECRETS, SHELL, SKILLS};
use crate::model::{CheckResult, RiskTier};

/// Contribution of each check to the overall score. Sums to 1.0, so the
/// result stays on the same 0-10 scale as the checks.
pub const WEIGHTS: &[(&str, f64)] = &[
    (FILESYSTEM, 0.25),
    (NETWORK, 0.20),
    (SHELL, 0.25),
    (SECRETS, 0.15),
    (SKILLS, 0.15),
];

/// Weighted sum of the check scores, rounded to one decimal.
/// A check missing from `checks` contributes nothing.
pub fn calculate_risk_score(checks: &[CheckResult]) -> f64 {
    let total: f64 = WEIGHTS
        .iter()
        .filter_map(|(key, weight)| {
            checks
                .iter()
                .find(|c| c.key == *key)
                .map(|c| c.score * weight)
        })
        .sum();
    // ties go to even: 2.25 reports as 2.2
    (total * 10.0).round_ties_even() / 10.0
}

pub fn risk_tier(score: f64) -> RiskTier {
    if score >= 9.0 {
        RiskTier::Critical
    } else if score >= 6.0 {
        RiskTier::High
    } else if score >= 3.0 {
        RiskTier::Medium
    } else {
        RiskTier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;

    fn check(key: &str, score: f64) -> CheckResult {
        CheckResult::new(key, key, score, Severity::Low, "", Vec::new())
    }

    #[test]
    fn weighted_risk_score() {
        let checks = vec![
            check(FILESYSTEM, 10.0),
            check(NETWORK, 0.0),
            check(SHELL, 10.0),
            check(SECRETS, 0.0),
            check(SKILLS, 0.0),
        ];
        assert_eq!(calculate_risk_score(&checks), 5.0);
    }

    #[test]
    fn rounds_to_one_decimal() {
        let checks = vec![
            check(FILESYSTEM, 6.5),
            check(NETWORK, 7.0),
            check(SHELL, 7.5),
            check(SECRETS, 5.0),
            check(SKILLS, 9.0),
        ];
        assert_eq!(calculate_risk_score(&checks), 7.0);
        // 0.375
        assert_eq!(calculate_risk_score(&[check(FILESYSTEM, 1.5)]), 0.4);
        assert_eq!(calculate_risk_score(&[check(SHELL, 10.0), check("unweighted", 10.0)]), 2.5);
        // 0.375 + 1.875 is exactly 2.25
        assert_eq!(calculate_risk_score(&[check(FILESYSTEM, 1.5), check(SHELL, 7.5)]), 2.2);
    }

    #[test]
    fn tiers() {
        assert_eq!(risk_tier(2.9), RiskTier::Low);
        assert_eq!(risk_tier(3.0), RiskTier::Medium);
        assert_eq!(risk_tier(6.0), RiskTier::High);
        assert_eq!(risk_tier(9.0), RiskTier::Critical);
        assert_eq!(risk_tier(10.0), RiskTier::Critical);
    }
}
