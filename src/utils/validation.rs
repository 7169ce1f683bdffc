//! Stricter validation rules layered on the standard row checks

use log::{debug, warn};

use crate::ingestion::{
    check_rows, normalize_rows, unit_of, ResolvedColumns, TabularDataset, ValidatedRow,
    ValidationError, ValidationIssue,
};
use crate::traits::RowValidator;

/// Longest ledger name accepted, in characters
pub const MAX_LEDGER_NAME_LEN: usize = 200;

const FORBIDDEN_NAME_CHARS: [char; 6] = ['<', '>', ';', '|', '&', '$'];

/// Validate a non-blank ledger name's length and character set
pub fn validate_ledger_name(name: &str) -> Result<(), String> {
    if name.trim().chars().count() > MAX_LEDGER_NAME_LEN {
        return Err(format!(
            "Ledger name cannot exceed {} characters",
            MAX_LEDGER_NAME_LEN
        ));
    }
    if let Some(c) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(format!("Invalid character '{}' in ledger name", c));
    }
    Ok(())
}

/// Validator that also rejects blank, overlong or unsafe ledger names and undefined units
///
/// Unit membership is only checked when the list of defined units is non-empty.
#[derive(Debug, Clone, Default)]
pub struct StrictRowValidator {
    defined_units: Vec<String>,
}

impl StrictRowValidator {
    pub fn new(defined_units: Vec<String>) -> Self {
        Self { defined_units }
    }

    fn blank_names(dataset: &TabularDataset, columns: &ResolvedColumns) -> Option<ValidationIssue> {
        let rows: Vec<usize> = (0..dataset.len())
            .filter(|row| dataset.cell(*row, columns.ledger_name).trim().is_empty())
            .map(|row| row + 1)
            .collect();
        (!rows.is_empty()).then_some(ValidationIssue::BlankLedgerNames { rows })
    }

    fn invalid_names(dataset: &TabularDataset, columns: &ResolvedColumns) -> Option<ValidationIssue> {
        let rows: Vec<usize> = (0..dataset.len())
            .filter(|row| {
                let name = dataset.cell(*row, columns.ledger_name);
                !name.trim().is_empty() && validate_ledger_name(name).is_err()
            })
            .map(|row| row + 1)
            .collect();
        (!rows.is_empty()).then_some(ValidationIssue::InvalidLedgerNames { rows })
    }

    fn unknown_units(
        &self,
        dataset: &TabularDataset,
        columns: &ResolvedColumns,
    ) -> Option<ValidationIssue> {
        if self.defined_units.is_empty() {
            return None;
        }
        let mut units: Vec<String> = Vec::new();
        for row in 0..dataset.len() {
            let unit = unit_of(dataset, row, columns);
            if !self.defined_units.contains(&unit) && !units.contains(&unit) {
                units.push(unit);
            }
        }
        (!units.is_empty()).then_some(ValidationIssue::UnknownUnits { units })
    }
}

impl RowValidator for StrictRowValidator {
    fn validate(
        &self,
        dataset: &TabularDataset,
        columns: &ResolvedColumns,
    ) -> Result<Vec<ValidatedRow>, ValidationError> {
        let mut issues = check_rows(dataset, columns);
        // Cell lookups below need every resolved column in range
        let structural = issues.iter().any(|issue| {
            matches!(
                issue,
                ValidationIssue::EmptyDataset | ValidationIssue::MissingColumn { .. }
            )
        });
        if !structural {
            issues.extend(Self::blank_names(dataset, columns));
            issues.extend(Self::invalid_names(dataset, columns));
            issues.extend(self.unknown_units(dataset, columns));
        }

        if let Some(err) = ValidationError::from_issues(issues) {
            warn!("Trial balance rejected by strict checks: {}", err);
            return Err(err);
        }

        let rows = normalize_rows(dataset, columns);
        debug!("Strictly validated {} trial balance rows", rows.len());
        Ok(rows)
    }
}
