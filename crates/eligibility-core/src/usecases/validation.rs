//! Field validation for application records.

use chrono::NaiveDate;

use crate::domain::{ApplicationImportRow, NewApplication};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y"];

/// Validate one record and convert it into typed application details.
///
/// Every problem in the record is reported, in field order.
pub fn validate_application_row(row: &ApplicationImportRow) -> Result<NewApplication, Vec<String>> {
    let mut errors = Vec::new();

    let parent_first_name = required(&row.parent_first_name, "Parent first name", &mut errors);
    let parent_last_name = required(&row.parent_last_name, "Parent last name", &mut errors);
    let parent_date_of_birth = date(&row.parent_date_of_birth, "Parent date of birth", &mut errors);
    let parent_email = required(&row.parent_email, "Parent email address", &mut errors);
    if let Some(email) = &parent_email {
        if !is_plausible_email(email) {
            errors.push("Parent email address is not valid".to_string());
        }
    }
    let child_first_name = required(&row.child_first_name, "Child first name", &mut errors);
    let child_last_name = required(&row.child_last_name, "Child last name", &mut errors);
    let child_date_of_birth = date(&row.child_date_of_birth, "Child date of birth", &mut errors);
    let establishment_urn = urn(&row.establishment_urn, &mut errors);

    // A missing field has already pushed its reason onto `errors`.
    let (
        Some(parent_first_name),
        Some(parent_last_name),
        Some(parent_date_of_birth),
        Some(parent_email),
        Some(child_first_name),
        Some(child_last_name),
        Some(child_date_of_birth),
        Some(establishment_urn),
    ) = (
        parent_first_name,
        parent_last_name,
        parent_date_of_birth,
        parent_email,
        child_first_name,
        child_last_name,
        child_date_of_birth,
        establishment_urn,
    )
    else {
        return Err(errors);
    };
    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(NewApplication {
        establishment_urn,
        parent_first_name,
        parent_last_name,
        parent_date_of_birth,
        parent_national_insurance_number: present(&row.parent_national_insurance_number)
            .map(|nino| nino.to_ascii_uppercase()),
        parent_email,
        child_first_name,
        child_last_name,
        child_date_of_birth,
    })
}

/// Parse a date in either `YYYY-MM-DD` or `DD/MM/YYYY` form.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw.trim(), format).ok())
}

fn present(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn required(value: &Option<String>, field: &str, errors: &mut Vec<String>) -> Option<String> {
    let value = present(value);
    if value.is_none() {
        errors.push(format!("{field} is required"));
    }
    value
}

fn date(value: &Option<String>, field: &str, errors: &mut Vec<String>) -> Option<NaiveDate> {
    let raw = required(value, field, errors)?;
    let parsed = parse_date(&raw);
    if parsed.is_none() {
        errors.push(format!(
            "{field} '{raw}' is not a valid date (expected YYYY-MM-DD or DD/MM/YYYY)"
        ));
    }
    parsed
}

fn urn(value: &Option<String>, errors: &mut Vec<String>) -> Option<i32> {
    let raw = required(value, "Establishment URN", errors)?;
    match raw.parse::<i32>() {
        Ok(urn) if urn > 0 => Some(urn),
        _ => {
            errors.push(format!("Establishment URN '{raw}' is not a valid number"));
            None
        }
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    }
}
