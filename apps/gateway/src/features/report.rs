use serde::{Deserialize, Serialize};

use super::decision::strings;
use super::upload::UploadedFile;
use super::{Feature, FeatureError, FeatureFacade};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// A headline metric pulled out of a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Highlight {
    pub title: String,
    pub value: String,
    pub trend: Trend,
    pub change: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ReportAnalysis {
    pub overview: String,
    pub highlights: Vec<Highlight>,
    pub insights: Vec<String>,
    pub recommendations: Vec<String>,
    pub risks: Vec<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportPayload<'a> {
    file_data: String,
    file_name: &'a str,
}

impl FeatureFacade {
    pub async fn analyze_report(&self, file: &UploadedFile) -> Result<ReportAnalysis, FeatureError> {
        let payload = ReportPayload {
            file_data: file.data_url(),
            file_name: &file.file_name,
        };
        self.call(Feature::ReportAnalysis, &payload, simulated_report)
            .await
    }
}

pub fn simulated_report() -> ReportAnalysis {
    ReportAnalysis {
        overview: "Report analysis simulated.".to_string(),
        highlights: vec![
            Highlight {
                title: "Revenue".to_string(),
                value: "$2.4M".to_string(),
                trend: Trend::Up,
                change: "+23%".to_string(),
            },
            Highlight {
                title: "Users".to_string(),
                value: "145K".to_string(),
                trend: Trend::Up,
                change: "+18%".to_string(),
            },
        ],
        insights: strings(&["Mobile traffic up", "Enterprise growth", "CLV improved"]),
        recommendations: strings(&["Invest mobile", "Expand sales", "Advanced analytics"]),
        risks: strings(&["Competition", "Single provider dependency"]),
    }
}
