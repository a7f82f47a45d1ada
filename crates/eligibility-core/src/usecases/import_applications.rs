//! Bulk application import from CSV or JSON.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::access::AccessScope;
use crate::domain::{
    Application, ApplicationImportRow, AuditType, BulkImportResult, Establishment, FileFormat,
    NewApplication, UploadedFile,
};
use crate::ports::{ApplicationGateway, AuditGateway, EstablishmentGateway, record_audit};

use super::applications::CREATE_FORBIDDEN;
use super::upload;
use super::validation::validate_application_row;

pub const FILE_REQUIRED: &str = "A CSV or JSON file is required.";
pub const FILE_EMPTY: &str = "The uploaded file is empty.";
pub const UNSUPPORTED_FILE_TYPE: &str = "Invalid file type. Only CSV and JSON files are supported.";
pub const NO_RECORDS: &str = "No records found to import.";
pub const IMPORT_DATABASE_ERROR: &str =
    "Database operation failed. No records from this batch were imported.";

/// Imports applications in one batch, validating and authorizing each row.
///
/// Row-level problems never abort the import; they are reported as
/// `Row N: <reason>` in input order and the row counts as failed.
pub struct ImportApplicationsUseCase {
    applications: Arc<dyn ApplicationGateway>,
    establishments: Arc<dyn EstablishmentGateway>,
    audit: Arc<dyn AuditGateway>,
}

impl ImportApplicationsUseCase {
    pub fn new(
        applications: Arc<dyn ApplicationGateway>,
        establishments: Arc<dyn EstablishmentGateway>,
        audit: Arc<dyn AuditGateway>,
    ) -> Self {
        Self {
            applications,
            establishments,
            audit,
        }
    }

    /// Import from an uploaded file.
    pub async fn execute(
        &self,
        file: Option<UploadedFile>,
        access: &AccessScope,
    ) -> BulkImportResult {
        let Some(file) = file else {
            return BulkImportResult::rejected(FILE_REQUIRED);
        };
        if file.is_empty() {
            return BulkImportResult::rejected(FILE_EMPTY);
        }

        let parsed = match file.format() {
            Some(FileFormat::Csv) => upload::read_application_csv(&file.bytes),
            Some(FileFormat::Json) => upload::read_application_json(&file.bytes),
            None => {
                tracing::info!(content_type = %file.content_type, "Rejected import upload");
                return BulkImportResult::rejected(UNSUPPORTED_FILE_TYPE);
            }
        };

        match parsed {
            Ok(rows) => self.execute_from_json(rows, access).await,
            Err(reason) => {
                tracing::info!(file_name = %file.file_name, %reason, "Unparsable import file");
                BulkImportResult::rejected(reason)
            }
        }
    }

    /// Import already-deserialized records.
    pub async fn execute_from_json(
        &self,
        rows: Vec<ApplicationImportRow>,
        access: &AccessScope,
    ) -> BulkImportResult {
        if rows.is_empty() {
            return BulkImportResult::rejected(NO_RECORDS);
        }

        let total = rows.len();
        let validated: Vec<Result<NewApplication, Vec<String>>> =
            rows.iter().map(validate_application_row).collect();

        let mut urns: Vec<i32> = validated
            .iter()
            .filter_map(|v| v.as_ref().ok().map(|app| app.establishment_urn))
            .collect();
        urns.sort_unstable();
        urns.dedup();

        let establishments: HashMap<i32, Establishment> = if urns.is_empty() {
            HashMap::new()
        } else {
            match self.establishments.get_establishments_by_urns(&urns).await {
                Ok(found) => found.into_iter().map(|e| (e.urn, e)).collect(),
                Err(e) => {
                    tracing::error!(error = %e, "Establishment lookup failed during import");
                    let mut errors = row_validation_errors(&validated);
                    errors.push(IMPORT_DATABASE_ERROR.to_string());
                    return BulkImportResult::summarize(total, 0, errors);
                }
            }
        };

        let mut errors = Vec::new();
        let mut batch = Vec::new();
        for (idx, outcome) in validated.into_iter().enumerate() {
            let row = idx + 1;
            let details = match outcome {
                Ok(details) => details,
                Err(reasons) => {
                    errors.push(format!("Row {row}: {}", reasons.join(", ")));
                    continue;
                }
            };

            let Some(establishment) = establishments.get(&details.establishment_urn) else {
                errors.push(format!(
                    "Row {row}: Establishment with URN {} not found",
                    details.establishment_urn
                ));
                continue;
            };

            if !access.permits(establishment.local_authority_id) {
                errors.push(format!("Row {row}: {CREATE_FORBIDDEN}"));
                continue;
            }

            batch.push(Application::new(details, establishment.local_authority_id));
        }

        if batch.is_empty() {
            tracing::info!(total, "No importable rows; batch not submitted");
            return BulkImportResult::summarize(total, 0, errors);
        }

        let attempted = batch.len();
        let successful = match self.applications.bulk_import_applications(batch).await {
            Ok(()) => attempted,
            Err(e) => {
                tracing::error!(error = %e, attempted, "Bulk application import failed");
                errors.push(IMPORT_DATABASE_ERROR.to_string());
                0
            }
        };

        let result = BulkImportResult::summarize(total, successful, errors);
        record_audit(
            self.audit.as_ref(),
            AuditType::BulkApplicationImport,
            &Uuid::new_v4().to_string(),
            Some(json!({
                "totalRecords": result.total_records,
                "successfulImports": result.successful_imports,
                "failedImports": result.failed_imports,
            })),
        )
        .await;

        tracing::info!(
            total = result.total_records,
            successful = result.successful_imports,
            failed = result.failed_imports,
            "Bulk application import finished"
        );
        result
    }
}

fn row_validation_errors(validated: &[Result<NewApplication, Vec<String>>]) -> Vec<String> {
    validated
        .iter()
        .enumerate()
        .filter_map(|(idx, v)| {
            v.as_ref()
                .err()
                .map(|reasons| format!("Row {}: {}", idx + 1, reasons.join(", ")))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::usecases::test_support::{FakeApplications, FakeAudit, FakeEstablishments, establishment};
    use crate::usecases::validation::tests::valid_row;

    struct Harness {
        applications: Arc<FakeApplications>,
        establishments: Arc<FakeEstablishments>,
        audit: Arc<FakeAudit>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                applications: Arc::new(FakeApplications::default()),
                establishments: Arc::new(FakeEstablishments::with(vec![
                    establishment(100_001, 894, None),
                    establishment(100_002, 201, Some(7)),
                ])),
                audit: Arc::new(FakeAudit::default()),
            }
        }

        fn use_case(&self) -> ImportApplicationsUseCase {
            ImportApplicationsUseCase::new(
                self.applications.clone(),
                self.establishments.clone(),
                self.audit.clone(),
            )
        }
    }

    const HEADER: &str = "Parent First Name,Parent Surname,Parent Date of Birth,Parent National Insurance Number,Parent Email Address,Child First Name,Child Surname,Child Date of Birth,Child School URN";

    fn csv_file(body: &str) -> Option<UploadedFile> {
        Some(UploadedFile::new(
            "import.csv",
            "text/csv",
            format!("{HEADER}\n{body}").into_bytes(),
        ))
    }

    #[tokio::test]
    async fn test_csv_import_with_missing_parent_first_name() {
        let h = Harness::new();
        let file = csv_file(
            "Sam,Jones,1985-03-01,AB123456C,sam@example.com,Alex,Jones,2015-09-01,100001\n\
             ,Smith,1990-01-01,,jo@example.com,Kim,Smith,2016-01-01,100001\n",
        );

        let result = h.use_case().execute(file, &AccessScope::from_ids(&[0])).await;

        assert_eq!(result.total_records, 2);
        assert_eq!(result.successful_imports, 1);
        assert_eq!(result.failed_imports, 1);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].contains("Row 2:"));
        assert!(result.errors[0].contains("Parent first name"));
        assert_eq!(
            result.message,
            "Import completed with 1 successful and 1 failed records."
        );
        assert_eq!(h.applications.count(), 1);
        assert_eq!(h.audit.types(), vec![AuditType::BulkApplicationImport]);
    }

    #[tokio::test]
    async fn test_missing_file_is_rejected_without_audit() {
        let h = Harness::new();
        let result = h.use_case().execute(None, &AccessScope::Unrestricted).await;

        assert_eq!(result.total_records, 0);
        assert_eq!(result.successful_imports, 0);
        assert_eq!(result.errors, vec![FILE_REQUIRED.to_string()]);
        assert_eq!(h.audit.count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_content_type() {
        let h = Harness::new();
        let file = UploadedFile::new("import.pdf", "application/pdf", b"%PDF".to_vec());
        let result = h.use_case().execute(Some(file), &AccessScope::Unrestricted).await;

        assert_eq!(result.errors, vec![UNSUPPORTED_FILE_TYPE.to_string()]);
        assert_eq!(result.total_records, 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_terminal() {
        let h = Harness::new();
        let file = UploadedFile::new("import.json", "application/json", b"[{\"parent".to_vec());
        let result = h.use_case().execute(Some(file), &AccessScope::Unrestricted).await;

        assert_eq!(result.total_records, 0);
        assert_eq!(result.failed_imports, 0);
        assert!(result.errors[0].starts_with("Invalid JSON format"));
        assert_eq!(h.applications.bulk_import_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_record_set_is_rejected() {
        let h = Harness::new();
        let result = h
            .use_case()
            .execute_from_json(vec![], &AccessScope::Unrestricted)
            .await;
        assert_eq!(result.errors, vec![NO_RECORDS.to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_urn_and_permission_errors_keep_row_order() {
        let h = Harness::new();
        let mut invalid = valid_row(100_001);
        invalid.child_date_of_birth = Some("yesterday".to_string());

        let rows = vec![
            valid_row(999_999),
            valid_row(100_002),
            invalid,
            valid_row(100_001),
        ];
        let result = h
            .use_case()
            .execute_from_json(rows, &AccessScope::from_ids(&[894]))
            .await;

        assert_eq!(result.total_records, 4);
        assert_eq!(result.successful_imports, 1);
        assert_eq!(result.failed_imports, 3);
        assert_eq!(
            result.errors[0],
            "Row 1: Establishment with URN 999999 not found"
        );
        assert_eq!(result.errors[1], format!("Row 2: {CREATE_FORBIDDEN}"));
        assert!(result.errors[2].starts_with("Row 3: Child date of birth"));
    }

    #[tokio::test]
    async fn test_all_rows_invalid_skips_batch_and_audit() {
        let h = Harness::new();
        let mut row = valid_row(100_001);
        row.parent_last_name = None;

        let result = h
            .use_case()
            .execute_from_json(vec![row.clone(), row], &AccessScope::Unrestricted)
            .await;

        assert_eq!(result.failed_imports, 2);
        assert_eq!(result.message, "Import failed. All 2 records failed to import.");
        assert_eq!(h.applications.bulk_import_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.audit.count(), 0);
    }

    #[tokio::test]
    async fn test_gateway_failure_fails_whole_batch() {
        let h = Harness::new();
        h.applications.fail_writes.store(true, Ordering::SeqCst);

        let rows = vec![valid_row(100_001), valid_row(100_002)];
        let result = h
            .use_case()
            .execute_from_json(rows, &AccessScope::Unrestricted)
            .await;

        assert_eq!(result.total_records, 2);
        assert_eq!(result.successful_imports, 0);
        assert_eq!(result.failed_imports, 2);
        assert_eq!(result.errors, vec![IMPORT_DATABASE_ERROR.to_string()]);
        assert_eq!(h.applications.bulk_import_calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.audit.count(), 1);
    }

    #[tokio::test]
    async fn test_establishment_lookup_failure_fails_whole_batch() {
        let h = Harness::new();
        h.establishments.fail.store(true, Ordering::SeqCst);
        let mut invalid = valid_row(100_001);
        invalid.parent_first_name = None;

        let rows = vec![valid_row(100_001), invalid, valid_row(100_002)];
        let result = h
            .use_case()
            .execute_from_json(rows, &AccessScope::Unrestricted)
            .await;

        assert_eq!(result.total_records, 3);
        assert_eq!(result.successful_imports, 0);
        assert_eq!(result.failed_imports, 3);
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].starts_with("Row 2: Parent first name"));
        assert_eq!(result.errors[1], IMPORT_DATABASE_ERROR);
        assert_eq!(result.message, "Import failed. All 3 records failed to import.");
        assert_eq!(h.applications.bulk_import_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.audit.count(), 0);
    }

    #[tokio::test]
    async fn test_all_success_message() {
        let h = Harness::new();
        let rows = vec![valid_row(100_001), valid_row(100_002)];
        let result = h
            .use_case()
            .execute_from_json(rows, &AccessScope::Unrestricted)
            .await;

        assert_eq!(result.successful_imports + result.failed_imports, result.total_records);
        assert_eq!(result.message, "Import completed successfully. 2 records imported.");
        assert!(result.errors.is_empty());
    }
}
