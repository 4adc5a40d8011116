use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decision::strings;
use super::{Feature, FeatureError, FeatureFacade};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CvOptimization {
    pub optimized_summary: String,
    pub skill_suggestions: Vec<String>,
    pub improvement_tips: Vec<String>,
    pub ats_score: u32, // 0 – 100
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CvPayload<'a> {
    cv_data: &'a Value,
}

impl FeatureFacade {
    /// `cv_data` is forwarded untouched; its structure belongs to the workflow.
    pub async fn optimize_cv(&self, cv_data: &Value) -> Result<CvOptimization, FeatureError> {
        self.call(Feature::CvOptimization, &CvPayload { cv_data }, simulated_cv)
            .await
    }
}

pub fn simulated_cv() -> CvOptimization {
    CvOptimization {
        optimized_summary: "Simulated CV optimization.".to_string(),
        skill_suggestions: strings(&["TypeScript", "Cloud Architecture", "System Design"]),
        improvement_tips: strings(&[
            "Quantifiable achievements",
            "Action verbs",
            "Relevant keywords",
        ]),
        ats_score: 75,
    }
}
