use serde::{Deserialize, Serialize};

use super::{excerpt, Feature, FeatureError, FeatureFacade};

/// Structured pros/cons breakdown for a decision the user is weighing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DecisionAnalysis {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
    pub risks: Vec<String>,
    pub benefits: Vec<String>,
    pub recommendation: String,
    pub confidence: u32, // 0 – 100
}

#[derive(Debug, Serialize)]
struct DecisionPayload<'a> {
    problem: &'a str,
}

impl FeatureFacade {
    pub async fn analyze_decision(&self, problem: &str) -> Result<DecisionAnalysis, FeatureError> {
        self.call(Feature::DecisionAnalysis, &DecisionPayload { problem }, || {
            simulated_decision(problem)
        })
        .await
    }
}

pub fn simulated_decision(problem: &str) -> DecisionAnalysis {
    DecisionAnalysis {
        pros: strings(&[
            "Increased efficiency",
            "Cost savings",
            "Better UX",
            "Competitive advantage",
        ]),
        cons: strings(&["Initial investment", "Learning curve", "Integration challenges"]),
        risks: strings(&["Tech may become outdated", "Third-party dependency"]),
        benefits: strings(&[
            "Scalable solution",
            "Faster development",
            "Better maintainability",
        ]),
        recommendation: format!(
            "Proceeding is recommended for \"{}...\"",
            excerpt(problem, 30)
        ),
        confidence: 85,
    }
}

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
