//! Use cases - one struct per operation, built per request from shared
//! gateway handles.

mod applications;
mod authenticate_user;
mod bulk_checks;
mod delete_applications;
mod import_applications;
mod search_applications;
mod upload;
mod validation;

#[cfg(test)]
mod test_support;

pub use applications::{
    ACCESS_FORBIDDEN, CREATE_FORBIDDEN, CreateApplicationUseCase, DELETE_FORBIDDEN,
    DeleteApplicationUseCase, GetApplicationUseCase, UPDATE_FORBIDDEN,
    UpdateApplicationStatusUseCase,
};
pub use authenticate_user::{AccessToken, AuthenticateUserUseCase, SystemUser};
pub use bulk_checks::{DeleteBulkCheckUseCase, GetBulkChecksUseCase};
pub use delete_applications::DeleteApplicationsUseCase;
pub use import_applications::ImportApplicationsUseCase;
pub use search_applications::{ApplicationSearch, SearchApplicationsUseCase};
pub use validation::{parse_date, validate_application_row};
