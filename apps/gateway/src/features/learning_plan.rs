use serde::{Deserialize, Serialize};

use super::decision::strings;
use super::{Feature, FeatureError, FeatureFacade};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// One stage of a learning roadmap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoadmapStep {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub resources: Vec<String>,
    pub completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LearningPlan {
    pub skill: String,
    pub level: SkillLevel,
    pub estimated_time: String,
    pub roadmap: Vec<RoadmapStep>,
    pub tips: Vec<String>,
}

#[derive(Debug, Serialize)]
struct LearningPlanPayload<'a> {
    skill: &'a str,
}

impl FeatureFacade {
    pub async fn generate_learning_plan(&self, skill: &str) -> Result<LearningPlan, FeatureError> {
        self.call(Feature::LearningPlan, &LearningPlanPayload { skill }, || {
            simulated_learning_plan(skill)
        })
        .await
    }
}

pub fn simulated_learning_plan(skill: &str) -> LearningPlan {
    let step = |id: &str, title: &str, description: &str, duration: &str, resources: &[&str]| {
        RoadmapStep {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            duration: duration.to_string(),
            resources: strings(resources),
            completed: false,
        }
    };

    LearningPlan {
        skill: skill.to_string(),
        level: SkillLevel::Beginner,
        estimated_time: "3-4 months".to_string(),
        roadmap: vec![
            step("1", "Basics", "Learn fundamentals", "2-3 weeks", &["Docs", "Tutorials"]),
            step("2", "Practice", "Small projects", "3-4 weeks", &["Code Challenges"]),
            step("3", "Intermediate", "Advanced patterns", "4-5 weeks", &["Books", "Courses"]),
            step("4", "Projects", "Real apps", "4-6 weeks", &["Open Source", "Portfolio"]),
        ],
        tips: strings(&[
            "1-2 hrs daily",
            "Build while learning",
            "Join communities",
            "Document journey",
            "Review regularly",
        ]),
    }
}
