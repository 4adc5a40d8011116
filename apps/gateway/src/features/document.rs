use serde::{Deserialize, Serialize};

use super::decision::strings;
use super::upload::UploadedFile;
use super::{Feature, FeatureError, FeatureFacade};
use crate::errors::AppError;

const WORDS_PER_MINUTE: usize = 200;
/// Word count reported for a document with no words at all.
const PLACEHOLDER_WORD_COUNT: usize = 1247;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub summary: String,
    pub key_points: Vec<String>,
    pub action_items: Vec<String>,
    pub sentiment: Sentiment,
    pub word_count: usize,
    /// Rendered as "N min".
    pub reading_time: String,
}

#[derive(Debug, Serialize)]
struct DocumentPayload<'a> {
    content: &'a str,
}

impl FeatureFacade {
    pub async fn analyze_document(&self, content: &str) -> Result<DocumentAnalysis, FeatureError> {
        self.call(Feature::DocumentAnalysis, &DocumentPayload { content }, || {
            simulated_document(content)
        })
        .await
    }
}

pub fn reading_time_minutes(word_count: usize) -> usize {
    word_count.div_ceil(WORDS_PER_MINUTE)
}

pub fn simulated_document(content: &str) -> DocumentAnalysis {
    let word_count = match content.split_whitespace().count() {
        0 => PLACEHOLDER_WORD_COUNT,
        n => n,
    };
    DocumentAnalysis {
        summary: "Document analysis simulated.".to_string(),
        key_points: strings(&[
            "Code reviews",
            "Automated tests",
            "CI/CD pipelines",
            "Documentation",
        ]),
        action_items: strings(&[
            "Automated testing",
            "Code review",
            "CI/CD setup",
            "Team retrospectives",
        ]),
        sentiment: Sentiment::Positive,
        word_count,
        reading_time: format!("{} min", reading_time_minutes(word_count)),
    }
}

/// Turns an uploaded file into analyzable text. PDFs are run through
/// `pdf-extract`; everything else must be UTF-8.
pub fn extract_document_text(file: &UploadedFile) -> Result<String, AppError> {
    let text = if file.is_pdf() {
        pdf_extract::extract_text_from_mem(&file.bytes).map_err(|e| {
            AppError::Validation(format!("could not extract text from '{}': {e}", file.file_name))
        })?
    } else {
        String::from_utf8(file.bytes.to_vec()).map_err(|_| {
            AppError::Validation(format!("'{}' is neither a PDF nor UTF-8 text", file.file_name))
        })?
    };

    if text.trim().is_empty() {
        return Err(AppError::Validation(format!(
            "'{}' contains no text",
            file.file_name
        )));
    }
    Ok(text)
}
