//! Application search limited to what the caller may see.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::access::CallerAccess;
use crate::domain::{ApplicationPage, ApplicationQuery, ApplicationStatus};
use crate::error::UseCaseError;
use crate::ports::{ApplicationGateway, EstablishmentGateway};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

pub const SEARCH_LOCAL_AUTHORITY_FORBIDDEN: &str =
    "You do not have permission to search applications for this local authority";
pub const SEARCH_TRUST_FORBIDDEN: &str =
    "You do not have permission to search applications for this multi-academy trust";
pub const SEARCH_ESTABLISHMENT_FORBIDDEN: &str =
    "You do not have permission to search applications for this establishment";
pub const TRUST_FILTER_REQUIRED: &str =
    "A multi-academy trust or establishment filter is required";

/// Search criteria as supplied by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationSearch {
    pub local_authority_id: Option<i32>,
    pub multi_academy_trust_id: Option<i32>,
    pub establishment_urn: Option<i32>,
    #[serde(default)]
    pub statuses: Vec<ApplicationStatus>,
    pub keyword: Option<String>,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

pub struct SearchApplicationsUseCase {
    applications: Arc<dyn ApplicationGateway>,
    establishments: Arc<dyn EstablishmentGateway>,
}

impl SearchApplicationsUseCase {
    pub fn new(
        applications: Arc<dyn ApplicationGateway>,
        establishments: Arc<dyn EstablishmentGateway>,
    ) -> Self {
        Self {
            applications,
            establishments,
        }
    }

    pub async fn execute(
        &self,
        search: ApplicationSearch,
        access: &CallerAccess,
    ) -> Result<ApplicationPage, UseCaseError> {
        let page = search.page.unwrap_or(1);
        let page_size = search.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if page == 0 {
            return Err(UseCaseError::Validation("Page must be 1 or greater".to_string()));
        }
        if page_size == 0 || page_size > MAX_PAGE_SIZE {
            return Err(UseCaseError::Validation(format!(
                "Page size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }
        if let (Some(from), Some(to)) = (search.date_from, search.date_to) {
            if from > to {
                return Err(UseCaseError::Validation(
                    "Date from must not be after date to".to_string(),
                ));
            }
        }

        let local_authority_ids = self.local_authority_restriction(&search, access).await?;

        let query = ApplicationQuery {
            local_authority_ids,
            multi_academy_trust_id: search.multi_academy_trust_id,
            establishment_urn: search.establishment_urn,
            statuses: search.statuses,
            keyword: search
                .keyword
                .map(|k| k.trim().to_string())
                .filter(|k| !k.is_empty()),
            date_from: search.date_from,
            date_to: search.date_to,
            page,
            page_size,
        };

        Ok(self.applications.search_applications(&query).await?)
    }

    /// Decide which local authorities the query is confined to, rejecting
    /// filters outside the caller's grant.
    async fn local_authority_restriction(
        &self,
        search: &ApplicationSearch,
        access: &CallerAccess,
    ) -> Result<Option<Vec<i32>>, UseCaseError> {
        if let Some(trust) = search.multi_academy_trust_id {
            if !access.permits_trust(trust) {
                return Err(UseCaseError::Unauthorized(SEARCH_TRUST_FORBIDDEN.to_string()));
            }
        }

        if let Some(urn) = search.establishment_urn {
            let establishment = self
                .establishments
                .get_establishment(urn)
                .await?
                .ok_or_else(|| {
                    UseCaseError::NotFound(format!("Establishment with URN {urn} not found"))
                })?;

            if !access.permits_establishment(
                establishment.local_authority_id,
                establishment.multi_academy_trust_id,
            ) {
                return Err(UseCaseError::Unauthorized(
                    SEARCH_ESTABLISHMENT_FORBIDDEN.to_string(),
                ));
            }
        }

        if let Some(local_authority_id) = search.local_authority_id {
            if !access.local_authorities.permits(local_authority_id) {
                return Err(UseCaseError::Unauthorized(
                    SEARCH_LOCAL_AUTHORITY_FORBIDDEN.to_string(),
                ));
            }
            return Ok(Some(vec![local_authority_id]));
        }

        // A trust or establishment filter already scopes the results.
        if search.multi_academy_trust_id.is_some() || search.establishment_urn.is_some() {
            return Ok(None);
        }

        match access.local_authorities.ids() {
            None => Ok(None),
            Some(ids) if !ids.is_empty() => Ok(Some(ids.iter().copied().collect())),
            Some(_) => match access.multi_academy_trusts.ids() {
                Some(trusts) if trusts.is_empty() => Err(UseCaseError::Unauthorized(
                    SEARCH_LOCAL_AUTHORITY_FORBIDDEN.to_string(),
                )),
                _ => Err(UseCaseError::Validation(TRUST_FILTER_REQUIRED.to_string())),
            },
        }
    }
}
