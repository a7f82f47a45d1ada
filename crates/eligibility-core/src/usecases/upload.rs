//! Reading bulk upload files into records.
//!
//! Parsing is all-or-nothing: a structurally broken file yields an error and
//! no records, so row numbers in later validation always match the file.

use std::collections::HashMap;

use serde::Deserialize;

use crate::domain::ApplicationImportRow;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// Columns that identify an application in a bulk delete CSV.
const GUID_COLUMNS: &[&str] = &["applicationguid", "applicationid", "guid", "id"];

fn strip_utf8_bom(data: &[u8]) -> &[u8] {
    data.strip_prefix(UTF8_BOM).unwrap_or(data)
}

// "Parent First Name", "parent_first_name" and "ParentFirstName" all map to
// the same key.
fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum ImportColumn {
    ParentFirstName,
    ParentLastName,
    ParentDateOfBirth,
    ParentNino,
    ParentEmail,
    ChildFirstName,
    ChildLastName,
    ChildDateOfBirth,
    EstablishmentUrn,
}

impl ImportColumn {
    fn from_header(header: &str) -> Option<Self> {
        let column = match normalize_header(header).as_str() {
            "parentfirstname" => Self::ParentFirstName,
            "parentlastname" | "parentsurname" => Self::ParentLastName,
            "parentdateofbirth" | "parentdob" => Self::ParentDateOfBirth,
            "parentnationalinsurancenumber" | "parentnino" | "nationalinsurancenumber" => {
                Self::ParentNino
            }
            "parentemail" | "parentemailaddress" => Self::ParentEmail,
            "childfirstname" => Self::ChildFirstName,
            "childlastname" | "childsurname" => Self::ChildLastName,
            "childdateofbirth" | "childdob" => Self::ChildDateOfBirth,
            "establishmenturn" | "childschoolurn" | "schoolurn" | "urn" => Self::EstablishmentUrn,
            _ => return None,
        };
        Some(column)
    }
}

/// Parse an application import CSV. The first line must be a header row.
pub fn read_application_csv(data: &[u8]) -> Result<Vec<ApplicationImportRow>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(strip_utf8_bom(data));

    let headers = reader
        .headers()
        .map_err(|e| format!("Invalid CSV format: {e}"))?
        .clone();

    let columns: HashMap<ImportColumn, usize> = headers
        .iter()
        .enumerate()
        .filter_map(|(idx, header)| ImportColumn::from_header(header).map(|c| (c, idx)))
        .collect();

    if columns.is_empty() {
        return Err("Invalid CSV format: no recognised column headers".to_string());
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("Invalid CSV format: {e}"))?;
        let cell = |column: ImportColumn| {
            columns
                .get(&column)
                .and_then(|&idx| record.get(idx))
                .map(str::to_string)
        };

        rows.push(ApplicationImportRow {
            parent_first_name: cell(ImportColumn::ParentFirstName),
            parent_last_name: cell(ImportColumn::ParentLastName),
            parent_date_of_birth: cell(ImportColumn::ParentDateOfBirth),
            parent_national_insurance_number: cell(ImportColumn::ParentNino),
            parent_email: cell(ImportColumn::ParentEmail),
            child_first_name: cell(ImportColumn::ChildFirstName),
            child_last_name: cell(ImportColumn::ChildLastName),
            child_date_of_birth: cell(ImportColumn::ChildDateOfBirth),
            establishment_urn: cell(ImportColumn::EstablishmentUrn),
        });
    }

    Ok(rows)
}

/// Parse an application import JSON file: an array of records.
pub fn read_application_json(data: &[u8]) -> Result<Vec<ApplicationImportRow>, String> {
    serde_json::from_slice(strip_utf8_bom(data)).map_err(|e| format!("Invalid JSON format: {e}"))
}

/// Parse a bulk delete CSV. The GUID is read from a recognised column, or
/// the first column when no header matches.
pub fn read_guid_csv(data: &[u8]) -> Result<Vec<String>, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(strip_utf8_bom(data));

    let headers = reader
        .headers()
        .map_err(|e| format!("Invalid CSV format: {e}"))?
        .clone();

    let column = headers
        .iter()
        .position(|h| GUID_COLUMNS.contains(&normalize_header(h).as_str()))
        .unwrap_or(0);

    let mut guids = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| format!("Invalid CSV format: {e}"))?;
        guids.push(record.get(column).unwrap_or_default().to_string());
    }

    Ok(guids)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum GuidPayload {
    List(Vec<String>),
    Wrapped {
        #[serde(alias = "applicationGuids", alias = "ids")]
        guids: Vec<String>,
    },
}

/// Parse a bulk delete JSON file: either `["guid", ...]` or
/// `{"guids": ["guid", ...]}`.
pub fn read_guid_json(data: &[u8]) -> Result<Vec<String>, String> {
    let payload: GuidPayload = serde_json::from_slice(strip_utf8_bom(data))
        .map_err(|e| format!("Invalid JSON format: {e}"))?;

    Ok(match payload {
        GuidPayload::List(guids) | GuidPayload::Wrapped { guids } => guids,
    })
}
