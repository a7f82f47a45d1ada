//! Bulk upload payloads and their aggregated results.

use serde::{Deserialize, Deserializer, Serialize};

/// Supported upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

/// A file received from a multipart upload.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Format implied by the content type, ignoring parameters such as
    /// `charset`. Browsers on Windows label CSV as `application/vnd.ms-excel`.
    pub fn format(&self) -> Option<FileFormat> {
        let essence = self
            .content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "text/csv" | "application/csv" | "application/vnd.ms-excel" => Some(FileFormat::Csv),
            "application/json" | "text/json" => Some(FileFormat::Json),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.iter().all(u8::is_ascii_whitespace)
    }
}

/// One unvalidated application record from a bulk import.
///
/// Every field is optional here; presence and format are checked per row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationImportRow {
    pub parent_first_name: Option<String>,
    #[serde(alias = "parentSurname")]
    pub parent_last_name: Option<String>,
    pub parent_date_of_birth: Option<String>,
    #[serde(alias = "parentNino")]
    pub parent_national_insurance_number: Option<String>,
    #[serde(alias = "parentEmailAddress")]
    pub parent_email: Option<String>,
    pub child_first_name: Option<String>,
    #[serde(alias = "childSurname")]
    pub child_last_name: Option<String>,
    pub child_date_of_birth: Option<String>,
    #[serde(default, alias = "childSchoolUrn", deserialize_with = "string_or_number")]
    pub establishment_urn: Option<String>,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Number(i64),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Text(s) => s,
        Raw::Number(n) => n.to_string(),
    }))
}

/// Outcome of a bulk application import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkImportResult {
    pub total_records: usize,
    pub successful_imports: usize,
    pub failed_imports: usize,
    pub errors: Vec<String>,
    pub message: String,
}

impl BulkImportResult {
    /// Structural rejection: nothing was processed.
    pub fn rejected(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            errors: vec![reason.clone()],
            message: reason,
            ..Self::default()
        }
    }

    pub fn summarize(total_records: usize, successful_imports: usize, errors: Vec<String>) -> Self {
        let failed_imports = total_records - successful_imports;
        let message = if failed_imports == 0 {
            format!("Import completed successfully. {successful_imports} records imported.")
        } else if successful_imports == 0 {
            format!("Import failed. All {total_records} records failed to import.")
        } else {
            format!(
                "Import completed with {successful_imports} successful and {failed_imports} failed records."
            )
        };

        Self {
            total_records,
            successful_imports,
            failed_imports,
            errors,
            message,
        }
    }

    pub fn is_rejection(&self) -> bool {
        self.total_records == 0 && !self.errors.is_empty()
    }
}

/// Outcome of a bulk application delete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkDeleteResult {
    pub total_records: usize,
    pub successful_deletions: usize,
    pub failed_deletions: usize,
    pub errors: Vec<String>,
    pub message: String,
}

impl BulkDeleteResult {
    pub fn rejected(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self {
            errors: vec![reason.clone()],
            message: reason,
            ..Self::default()
        }
    }

    pub fn summarize(total_records: usize, successful_deletions: usize, errors: Vec<String>) -> Self {
        let failed_deletions = total_records - successful_deletions;
        let message = if failed_deletions == 0 {
            format!("Delete completed successfully. {successful_deletions} applications deleted.")
        } else if successful_deletions == 0 {
            format!("Delete failed. All {total_records} records failed to delete.")
        } else {
            format!(
                "Delete completed with {successful_deletions} successful and {failed_deletions} failed records."
            )
        };

        Self {
            total_records,
            successful_deletions,
            failed_deletions,
            errors,
            message,
        }
    }

    pub fn is_rejection(&self) -> bool {
        self.total_records == 0 && !self.errors.is_empty()
    }
}
