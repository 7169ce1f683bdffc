//! Row validation and normalisation
//!
//! Validation batches its feedback: every check runs, and up to
//! [`MAX_ISSUE_CATEGORIES`] distinct problem categories are reported together
//! so the preparer can fix them in one correction pass.

use bigdecimal::BigDecimal;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::ingestion::{ColumnField, ResolvedColumns, TabularDataset};
use crate::traits::RowValidator;
use crate::types::DEFAULT_UNIT;
use crate::utils::numeric::parse_amount;

/// Largest number of issue categories carried by one [`ValidationError`]
pub const MAX_ISSUE_CATEGORIES: usize = 3;

/// Offending items listed per category
const MAX_LISTED: usize = 5;

/// A normalised, typed trial balance row awaiting classification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedRow {
    /// 1-based data row number in the source grid
    pub row_number: usize,
    pub unit: String,
    pub ledger_name: String,
    pub amount_cy: BigDecimal,
    pub amount_py: BigDecimal,
    pub group: Option<String>,
    pub sub_group: Option<String>,
    pub fund_type: Option<String>,
    pub source: Option<String>,
}

/// One category of structural or numeric defect
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationIssue {
    EmptyDataset,
    MissingColumn { field: ColumnField, index: usize },
    DuplicateLedgers { entries: Vec<(String, String)> },
    InvalidCurrentAmounts { rows: Vec<usize> },
    InvalidPriorAmounts { rows: Vec<usize> },
    BlankLedgerNames { rows: Vec<usize> },
    /// Names that are too long or carry shell/markup characters
    InvalidLedgerNames { rows: Vec<usize> },
    UnknownUnits { units: Vec<String> },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::EmptyDataset => write!(f, "File is empty"),
            ValidationIssue::MissingColumn { field, index } => {
                write!(f, "Column {} for {} not found", index, field)
            }
            ValidationIssue::DuplicateLedgers { entries } => {
                let listed: Vec<String> = entries
                    .iter()
                    .take(MAX_LISTED)
                    .map(|(unit, name)| format!("{} ({})", name, unit))
                    .collect();
                write!(f, "Duplicate ledger names: {}", listed.join(", "))
            }
            ValidationIssue::InvalidCurrentAmounts { rows } => write!(
                f,
                "Invalid or negative current year amounts at rows: {:?}",
                first_few(rows)
            ),
            ValidationIssue::InvalidPriorAmounts { rows } => write!(
                f,
                "Invalid previous year amounts at rows: {:?}",
                first_few(rows)
            ),
            ValidationIssue::BlankLedgerNames { rows } => {
                write!(f, "Blank ledger names at rows: {:?}", first_few(rows))
            }
            ValidationIssue::InvalidLedgerNames { rows } => write!(
                f,
                "Ledger names too long or containing < > ; | & $ at rows: {:?}",
                first_few(rows)
            ),
            ValidationIssue::UnknownUnits { units } => {
                write!(f, "Units not defined: {}", first_few(units).join(", "))
            }
        }
    }
}

fn first_few<T: Clone>(items: &[T]) -> Vec<T> {
    items.iter().take(MAX_LISTED).cloned().collect()
}

/// Batched validation failure
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{}", summarize(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

impl ValidationError {
    /// Build an error from collected issues, keeping the first distinct categories
    ///
    /// Returns `None` when there is nothing to report.
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Option<Self> {
        let mut kept: Vec<ValidationIssue> = Vec::new();
        for issue in issues {
            let duplicate = kept
                .iter()
                .any(|k| std::mem::discriminant(k) == std::mem::discriminant(&issue));
            if !duplicate && kept.len() < MAX_ISSUE_CATEGORIES {
                kept.push(issue);
            }
        }
        if kept.is_empty() {
            None
        } else {
            Some(Self { issues: kept })
        }
    }

    pub fn summary(&self) -> String {
        summarize(&self.issues)
    }
}

fn summarize(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Unit name of a data row; blank or absent unit cells fall back to [`DEFAULT_UNIT`]
pub fn unit_of(dataset: &TabularDataset, row: usize, columns: &ResolvedColumns) -> String {
    columns
        .unit
        .map(|col| dataset.cell(row, col).trim())
        .filter(|unit| !unit.is_empty())
        .unwrap_or(DEFAULT_UNIT)
        .to_string()
}

/// Run the structural and numeric checks, in order, returning every issue found
pub fn check_rows(dataset: &TabularDataset, columns: &ResolvedColumns) -> Vec<ValidationIssue> {
    if dataset.is_empty() {
        return vec![ValidationIssue::EmptyDataset];
    }

    let missing: Vec<ValidationIssue> = columns
        .indices()
        .into_iter()
        .filter(|(_, index)| *index >= dataset.headers.len())
        .map(|(field, index)| ValidationIssue::MissingColumn { field, index })
        .collect();
    if !missing.is_empty() {
        return missing;
    }

    let mut issues = Vec::new();

    let mut seen = HashSet::new();
    let mut duplicates: Vec<(String, String)> = Vec::new();
    for row in 0..dataset.len() {
        let key = (
            unit_of(dataset, row, columns),
            dataset.cell(row, columns.ledger_name).trim().to_string(),
        );
        if !seen.insert(key.clone()) && !duplicates.contains(&key) {
            duplicates.push(key);
        }
    }
    if !duplicates.is_empty() {
        issues.push(ValidationIssue::DuplicateLedgers {
            entries: duplicates,
        });
    }

    let zero = BigDecimal::from(0);
    let invalid_cy: Vec<usize> = (0..dataset.len())
        .filter(|&row| match parse_amount(dataset.cell(row, columns.amount_cy)) {
            Some(amount) => amount < zero,
            None => true,
        })
        .map(|row| row + 1)
        .collect();
    if !invalid_cy.is_empty() {
        issues.push(ValidationIssue::InvalidCurrentAmounts { rows: invalid_cy });
    }

    if let Some(py_col) = columns.amount_py {
        let invalid_py: Vec<usize> = (0..dataset.len())
            .filter(|&row| parse_amount(dataset.cell(row, py_col)).is_none())
            .map(|row| row + 1)
            .collect();
        if !invalid_py.is_empty() {
            issues.push(ValidationIssue::InvalidPriorAmounts { rows: invalid_py });
        }
    }

    issues
}

/// Convert rows that passed [`check_rows`] into typed records
pub fn normalize_rows(dataset: &TabularDataset, columns: &ResolvedColumns) -> Vec<ValidatedRow> {
    let optional = |row: usize, col: Option<usize>| {
        col.map(|c| dataset.cell(row, c).trim())
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    let amount = |row: usize, col: Option<usize>| {
        col.and_then(|c| parse_amount(dataset.cell(row, c)))
            .unwrap_or_else(|| BigDecimal::from(0))
    };

    (0..dataset.len())
        .map(|row| ValidatedRow {
            row_number: row + 1,
            unit: unit_of(dataset, row, columns),
            ledger_name: dataset.cell(row, columns.ledger_name).trim().to_string(),
            amount_cy: amount(row, Some(columns.amount_cy)),
            amount_py: amount(row, columns.amount_py),
            group: optional(row, columns.group),
            sub_group: optional(row, columns.sub_group),
            fund_type: optional(row, columns.fund_type),
            source: optional(row, columns.source),
        })
        .collect()
}

/// Validator applying the standard trial balance checks
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRowValidator;

impl RowValidator for DefaultRowValidator {
    fn validate(
        &self,
        dataset: &TabularDataset,
        columns: &ResolvedColumns,
    ) -> Result<Vec<ValidatedRow>, ValidationError> {
        if let Some(err) = ValidationError::from_issues(check_rows(dataset, columns)) {
            warn!("Trial balance rejected: {}", err);
            return Err(err);
        }

        let rows = normalize_rows(dataset, columns);
        debug!("Validated {} trial balance rows", rows.len());
        Ok(rows)
    }
}
