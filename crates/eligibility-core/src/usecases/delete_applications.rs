//! Bulk application delete from a GUID list.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::access::AccessScope;
use crate::domain::{AuditType, BulkDeleteResult, FileFormat, UploadedFile};
use crate::ports::{ApplicationGateway, AuditGateway, record_audit};

use super::applications::DELETE_FORBIDDEN;
use super::import_applications::{FILE_EMPTY, FILE_REQUIRED, UNSUPPORTED_FILE_TYPE};
use super::upload;

pub const NO_GUIDS: &str = "No application GUIDs found to delete.";
pub const DELETE_DATABASE_ERROR: &str =
    "Database operation failed. No applications from this batch were deleted.";

enum RowState {
    Rejected(String),
    Candidate(Uuid),
}

/// Deletes applications in one batch, validating and authorizing each GUID.
pub struct DeleteApplicationsUseCase {
    applications: Arc<dyn ApplicationGateway>,
    audit: Arc<dyn AuditGateway>,
}

impl DeleteApplicationsUseCase {
    pub fn new(applications: Arc<dyn ApplicationGateway>, audit: Arc<dyn AuditGateway>) -> Self {
        Self {
            applications,
            audit,
        }
    }

    pub async fn execute(
        &self,
        file: Option<UploadedFile>,
        access: &AccessScope,
    ) -> BulkDeleteResult {
        let Some(file) = file else {
            return BulkDeleteResult::rejected(FILE_REQUIRED);
        };
        if file.is_empty() {
            return BulkDeleteResult::rejected(FILE_EMPTY);
        }

        let parsed = match file.format() {
            Some(FileFormat::Csv) => upload::read_guid_csv(&file.bytes),
            Some(FileFormat::Json) => upload::read_guid_json(&file.bytes),
            None => return BulkDeleteResult::rejected(UNSUPPORTED_FILE_TYPE),
        };

        match parsed {
            Ok(guids) => self.execute_from_json(guids, access).await,
            Err(reason) => BulkDeleteResult::rejected(reason),
        }
    }

    pub async fn execute_from_json(
        &self,
        guids: Vec<String>,
        access: &AccessScope,
    ) -> BulkDeleteResult {
        if guids.is_empty() {
            return BulkDeleteResult::rejected(NO_GUIDS);
        }

        let total = guids.len();
        let mut seen = HashSet::new();
        let rows: Vec<RowState> = guids
            .iter()
            .map(|raw| {
                let raw = raw.trim();
                match Uuid::parse_str(raw) {
                    Err(_) => RowState::Rejected(format!("Invalid GUID format '{raw}'")),
                    Ok(id) if !seen.insert(id) => {
                        RowState::Rejected(format!("Duplicate GUID '{id}'"))
                    }
                    Ok(id) => RowState::Candidate(id),
                }
            })
            .collect();

        let candidates: Vec<Uuid> = rows
            .iter()
            .filter_map(|r| match r {
                RowState::Candidate(id) => Some(*id),
                RowState::Rejected(_) => None,
            })
            .collect();

        let owners = if candidates.is_empty() {
            Default::default()
        } else {
            match self
                .applications
                .get_local_authority_ids_for_applications(&candidates)
                .await
            {
                Ok(owners) => owners,
                Err(e) => {
                    tracing::error!(error = %e, "Application lookup failed during bulk delete");
                    return abort(total, &rows);
                }
            }
        };

        let mut errors = Vec::new();
        let mut batch = Vec::new();
        for (idx, state) in rows.iter().enumerate() {
            let row = idx + 1;
            match state {
                RowState::Rejected(reason) => errors.push(format!("Row {row}: {reason}")),
                RowState::Candidate(id) => match owners.get(id) {
                    None => errors.push(format!("Row {row}: Application {id} not found")),
                    Some(&local_authority_id) if !access.permits(local_authority_id) => {
                        errors.push(format!("Row {row}: {DELETE_FORBIDDEN}"))
                    }
                    Some(_) => batch.push(*id),
                },
            }
        }

        if batch.is_empty() {
            return BulkDeleteResult::summarize(total, 0, errors);
        }

        let successful = match self.applications.bulk_delete_applications(&batch).await {
            Ok(deleted) => {
                if deleted != batch.len() {
                    tracing::warn!(
                        expected = batch.len(),
                        deleted,
                        "Bulk delete removed a different number of applications than requested"
                    );
                }
                deleted.min(batch.len())
            }
            Err(e) => {
                tracing::error!(error = %e, attempted = batch.len(), "Bulk application delete failed");
                errors.push(DELETE_DATABASE_ERROR.to_string());
                0
            }
        };

        let result = BulkDeleteResult::summarize(total, successful, errors);
        record_audit(
            self.audit.as_ref(),
            AuditType::BulkApplicationDelete,
            &Uuid::new_v4().to_string(),
            Some(json!({
                "totalRecords": result.total_records,
                "successfulDeletions": result.successful_deletions,
                "failedDeletions": result.failed_deletions,
                "applications": batch,
            })),
        )
        .await;

        tracing::info!(
            total = result.total_records,
            successful = result.successful_deletions,
            failed = result.failed_deletions,
            "Bulk application delete finished"
        );
        result
    }
}

// Lookup failure: every row fails. Format errors found before the failure
// are kept ahead of the aggregate error.
fn abort(total: usize, rows: &[RowState]) -> BulkDeleteResult {
    let mut errors: Vec<String> = rows
        .iter()
        .enumerate()
        .filter_map(|(idx, state)| match state {
            RowState::Rejected(reason) => Some(format!("Row {}: {reason}", idx + 1)),
            RowState::Candidate(_) => None,
        })
        .collect();
    errors.push(DELETE_DATABASE_ERROR.to_string());
    BulkDeleteResult::summarize(total, 0, errors)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::usecases::test_support::{FakeApplications, FakeAudit, application};

    fn use_case(applications: Arc<FakeApplications>, audit: Arc<FakeAudit>) -> DeleteApplicationsUseCase {
        DeleteApplicationsUseCase::new(applications, audit)
    }

    #[tokio::test]
    async fn test_duplicate_guid_is_flagged_not_deduplicated() {
        let app = application(894, 100_001);
        let id = app.id.to_string();
        let applications = Arc::new(FakeApplications::with(vec![app]));
        let audit = Arc::new(FakeAudit::default());

        let result = use_case(applications.clone(), audit.clone())
            .execute_from_json(vec![id.clone(), id.clone()], &AccessScope::Unrestricted)
            .await;

        assert_eq!(result.total_records, 2);
        assert_eq!(result.successful_deletions, 1);
        assert_eq!(result.failed_deletions, 1);
        assert_eq!(result.errors, vec![format!("Row 2: Duplicate GUID '{id}'")]);
        assert_eq!(applications.count(), 0);
        assert_eq!(audit.types(), vec![AuditType::BulkApplicationDelete]);
    }

    #[tokio::test]
    async fn test_row_errors_in_input_order() {
        let mine = application(894, 100_001);
        let theirs = application(201, 100_002);
        let missing = Uuid::new_v4();
        let applications = Arc::new(FakeApplications::with(vec![mine.clone(), theirs.clone()]));

        let result = use_case(applications.clone(), Arc::new(FakeAudit::default()))
            .execute_from_json(
                vec![
                    theirs.id.to_string(),
                    "not-a-guid".to_string(),
                    missing.to_string(),
                    mine.id.to_string(),
                ],
                &AccessScope::from_ids(&[894]),
            )
            .await;

        assert_eq!(result.successful_deletions, 1);
        assert_eq!(result.failed_deletions, 3);
        assert_eq!(
            result.errors,
            vec![
                format!("Row 1: {DELETE_FORBIDDEN}"),
                "Row 2: Invalid GUID format 'not-a-guid'".to_string(),
                format!("Row 3: Application {missing} not found"),
            ]
        );
        assert_eq!(applications.count(), 1);
        assert_eq!(
            result.message,
            "Delete completed with 1 successful and 3 failed records."
        );
    }

    #[tokio::test]
    async fn test_unrestricted_caller_deletes_any_local_authority() {
        let apps = vec![application(1, 10), application(2, 20), application(3, 30)];
        let ids: Vec<String> = apps.iter().map(|a| a.id.to_string()).collect();
        let applications = Arc::new(FakeApplications::with(apps));

        let result = use_case(applications.clone(), Arc::new(FakeAudit::default()))
            .execute_from_json(ids, &AccessScope::from_ids(&[0]))
            .await;

        assert_eq!(result.successful_deletions, 3);
        assert_eq!(result.message, "Delete completed successfully. 3 applications deleted.");
    }

    #[tokio::test]
    async fn test_lookup_failure_fails_everything() {
        let app = application(1, 10);
        let applications = Arc::new(FakeApplications::with(vec![app.clone()]));
        applications.fail_lookup.store(true, Ordering::SeqCst);
        let audit = Arc::new(FakeAudit::default());

        let result = use_case(applications.clone(), audit.clone())
            .execute_from_json(vec![app.id.to_string(), "bad".to_string()], &AccessScope::Unrestricted)
            .await;

        assert_eq!(result.total_records, 2);
        assert_eq!(result.successful_deletions, 0);
        assert_eq!(result.failed_deletions, 2);
        assert_eq!(
            result.errors,
            vec![
                "Row 2: Invalid GUID format 'bad'".to_string(),
                DELETE_DATABASE_ERROR.to_string(),
            ]
        );
        assert_eq!(applications.bulk_delete_calls.load(Ordering::SeqCst), 0);
        assert_eq!(audit.count(), 0);
    }

    #[tokio::test]
    async fn test_delete_failure_fails_everything() {
        let app = application(1, 10);
        let applications = Arc::new(FakeApplications::with(vec![app.clone()]));
        applications.fail_writes.store(true, Ordering::SeqCst);

        let result = use_case(applications.clone(), Arc::new(FakeAudit::default()))
            .execute_from_json(vec![app.id.to_string()], &AccessScope::Unrestricted)
            .await;

        assert_eq!(result.failed_deletions, 1);
        assert_eq!(result.errors, vec![DELETE_DATABASE_ERROR.to_string()]);
        assert_eq!(result.message, "Delete failed. All 1 records failed to delete.");
    }

    #[tokio::test]
    async fn test_delete_failure_keeps_row_errors() {
        let app = application(1, 10);
        let missing = Uuid::new_v4();
        let applications = Arc::new(FakeApplications::with(vec![app.clone()]));
        applications.fail_writes.store(true, Ordering::SeqCst);
        let audit = Arc::new(FakeAudit::default());

        let result = use_case(applications.clone(), audit.clone())
            .execute_from_json(
                vec![missing.to_string(), app.id.to_string()],
                &AccessScope::Unrestricted,
            )
            .await;

        assert_eq!(result.total_records, 2);
        assert_eq!(result.successful_deletions, 0);
        assert_eq!(result.failed_deletions, 2);
        assert_eq!(
            result.errors,
            vec![
                format!("Row 1: Application {missing} not found"),
                DELETE_DATABASE_ERROR.to_string(),
            ]
        );
        assert_eq!(applications.count(), 1);
        assert_eq!(audit.types(), vec![AuditType::BulkApplicationDelete]);
    }

    #[tokio::test]
    async fn test_csv_upload() {
        let app = application(1, 10);
        let applications = Arc::new(FakeApplications::with(vec![app.clone()]));
        let file = UploadedFile::new(
            "delete.csv",
            "text/csv",
            format!("ApplicationGuid\n{}\n", app.id).into_bytes(),
        );

        let result = use_case(applications, Arc::new(FakeAudit::default()))
            .execute(Some(file), &AccessScope::Unrestricted)
            .await;
        assert_eq!(result.successful_deletions, 1);
    }

    #[tokio::test]
    async fn test_structural_rejections() {
        let uc = use_case(Arc::new(FakeApplications::default()), Arc::new(FakeAudit::default()));

        let result = uc.execute(None, &AccessScope::Unrestricted).await;
        assert_eq!(result.errors, vec![FILE_REQUIRED.to_string()]);

        let result = uc.execute_from_json(vec![], &AccessScope::Unrestricted).await;
        assert_eq!(result.errors, vec![NO_GUIDS.to_string()]);

        let file = UploadedFile::new("x.txt", "text/plain", b"abc".to_vec());
        let result = uc.execute(Some(file), &AccessScope::Unrestricted).await;
        assert_eq!(result.errors, vec![UNSUPPORTED_FILE_TYPE.to_string()]);
        assert_eq!(result.total_records, 0);
    }
}
