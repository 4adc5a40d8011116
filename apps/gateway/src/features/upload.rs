use axum::extract::Multipart;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;

use crate::errors::AppError;

const FILE_FIELD: &str = "file";
const FALLBACK_MIME: &str = "application/octet-stream";

/// A file posted by the dashboard as multipart form data.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Reads the `file` field from a multipart body.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, AppError> {
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
        {
            if field.name() != Some(FILE_FIELD) {
                continue;
            }

            let file_name = field
                .file_name()
                .map(str::to_string)
                .filter(|name| !name.trim().is_empty())
                .ok_or_else(|| AppError::Validation("uploaded file has no name".to_string()))?;
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("could not read '{file_name}': {e}")))?;

            if bytes.is_empty() {
                return Err(AppError::Validation(format!("'{file_name}' is empty")));
            }

            return Ok(Self {
                file_name,
                content_type,
                bytes,
            });
        }

        Err(AppError::Validation(format!(
            "multipart body has no '{FILE_FIELD}' field"
        )))
    }

    /// Declared content type, or a guess from the file extension.
    pub fn mime_type(&self) -> &str {
        match self.content_type.as_deref() {
            Some(mime) if !mime.is_empty() && mime != FALLBACK_MIME => mime,
            _ => mime_from_extension(&self.file_name),
        }
    }

    pub fn is_pdf(&self) -> bool {
        self.mime_type() == "application/pdf"
    }

    /// `data:<mime>;base64,<payload>` form expected by the report webhook.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type(), STANDARD.encode(&self.bytes))
    }
}

fn mime_from_extension(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "pdf" => "application/pdf",
        "txt" | "md" => "text/plain",
        "csv" => "text/csv",
        "json" => "application/json",
        "xls" => "application/vnd.ms-excel",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        _ => FALLBACK_MIME,
    }
}
