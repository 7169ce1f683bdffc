//! Heuristic column resolution for trial balance headers
//!
//! Headers are matched case-insensitively against ordered keyword rules. Each
//! header is claimed by at most one field, so a "Group Head" column is never
//! mistaken for the ledger name and "Particulars" never becomes an amount.

use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fields the resolver looks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnField {
    LedgerName,
    AmountCurrent,
    AmountPrior,
    Unit,
    Group,
    SubGroup,
    FundType,
    Source,
}

impl fmt::Display for ColumnField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnField::LedgerName => "ledger name",
            ColumnField::AmountCurrent => "current year amount",
            ColumnField::AmountPrior => "prior year amount",
            ColumnField::Unit => "unit",
            ColumnField::Group => "group",
            ColumnField::SubGroup => "sub-group",
            ColumnField::FundType => "fund type",
            ColumnField::Source => "contribution source",
        };
        f.write_str(name)
    }
}

/// A keyword rule claiming one header for one field
#[derive(Debug, Clone, PartialEq)]
pub struct MatcherRule {
    pub field: ColumnField,
    /// Tried in order; an earlier keyword beats a later one regardless of column order
    pub any_of: &'static [&'static str],
    /// Every fragment must also be present
    pub all_of: &'static [&'static str],
    /// None of these fragments may be present
    pub none_of: &'static [&'static str],
}

impl MatcherRule {
    fn accepts(&self, header: &str, keyword: &str) -> bool {
        header.contains(keyword)
            && self.all_of.iter().all(|part| header.contains(part))
            && !self.none_of.iter().any(|part| header.contains(part))
    }
}

/// Column indices after resolution; only the two required fields are guaranteed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedColumns {
    pub ledger_name: usize,
    pub amount_cy: usize,
    pub amount_py: Option<usize>,
    pub unit: Option<usize>,
    pub group: Option<usize>,
    pub sub_group: Option<usize>,
    pub fund_type: Option<usize>,
    pub source: Option<usize>,
}

impl ResolvedColumns {
    /// Every resolved index with the field it serves
    pub fn indices(&self) -> Vec<(ColumnField, usize)> {
        let mut indices = vec![
            (ColumnField::LedgerName, self.ledger_name),
            (ColumnField::AmountCurrent, self.amount_cy),
        ];
        let optional = [
            (ColumnField::AmountPrior, self.amount_py),
            (ColumnField::Unit, self.unit),
            (ColumnField::Group, self.group),
            (ColumnField::SubGroup, self.sub_group),
            (ColumnField::FundType, self.fund_type),
            (ColumnField::Source, self.source),
        ];
        indices.extend(
            optional
                .into_iter()
                .filter_map(|(field, index)| index.map(|i| (field, i))),
        );
        indices
    }
}

/// Full outcome of inspecting a header row
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnResolution {
    pub ledger_name: Option<usize>,
    pub amount_cy: Option<usize>,
    pub amount_py: Option<usize>,
    pub unit: Option<usize>,
    pub group: Option<usize>,
    pub sub_group: Option<usize>,
    pub fund_type: Option<usize>,
    pub source: Option<usize>,
    /// Amount-like headers in column order, whether used or not
    pub amount_candidates: Vec<usize>,
}

impl ColumnResolution {
    /// Required fields that could not be resolved
    pub fn missing(&self) -> Vec<ColumnField> {
        let mut missing = Vec::new();
        if self.ledger_name.is_none() {
            missing.push(ColumnField::LedgerName);
        }
        if self.amount_cy.is_none() {
            missing.push(ColumnField::AmountCurrent);
        }
        missing
    }

    fn slot(&mut self, field: ColumnField) -> &mut Option<usize> {
        match field {
            ColumnField::LedgerName => &mut self.ledger_name,
            ColumnField::AmountCurrent => &mut self.amount_cy,
            ColumnField::AmountPrior => &mut self.amount_py,
            ColumnField::Unit => &mut self.unit,
            ColumnField::Group => &mut self.group,
            ColumnField::SubGroup => &mut self.sub_group,
            ColumnField::FundType => &mut self.fund_type,
            ColumnField::Source => &mut self.source,
        }
    }
}

/// Raised when the header row lacks a ledger-name or current-year amount column
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Could not identify {} column(s) in headers {headers:?}", join_fields(.missing))]
pub struct ColumnResolutionError {
    pub missing: Vec<ColumnField>,
    pub headers: Vec<String>,
}

fn join_fields(fields: &[ColumnField]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" and ")
}

/// Ordered rule set resolving header rows into [`ResolvedColumns`]
#[derive(Debug, Clone)]
pub struct ColumnResolver {
    rules: Vec<MatcherRule>,
    amount_keywords: &'static [&'static str],
    prior_tags: &'static [&'static str],
    current_tags: &'static [&'static str],
}

impl Default for ColumnResolver {
    fn default() -> Self {
        // Evaluated in this order; descriptive columns claim their headers before the ledger name
        let rules = vec![
            MatcherRule {
                field: ColumnField::SubGroup,
                any_of: &["sub"],
                all_of: &["group"],
                none_of: &[],
            },
            MatcherRule {
                field: ColumnField::Group,
                any_of: &["group"],
                all_of: &[],
                none_of: &["sub"],
            },
            MatcherRule {
                field: ColumnField::FundType,
                any_of: &["fund"],
                all_of: &["type"],
                none_of: &[],
            },
            MatcherRule {
                field: ColumnField::Source,
                any_of: &["fcra", "source", "contribution"],
                all_of: &[],
                none_of: &[],
            },
            MatcherRule {
                field: ColumnField::Unit,
                any_of: &["unit", "branch"],
                all_of: &[],
                none_of: &[],
            },
            MatcherRule {
                field: ColumnField::LedgerName,
                any_of: &["ledger", "particular", "head"],
                all_of: &[],
                none_of: &[],
            },
        ];

        Self {
            rules,
            amount_keywords: &["amount", "debit", "balance", "rs"],
            prior_tags: &["prev", "py"],
            current_tags: &["curr", "cy"],
        }
    }
}

impl ColumnResolver {
    pub fn new(rules: Vec<MatcherRule>) -> Self {
        Self {
            rules,
            ..Self::default()
        }
    }

    /// Resolve as much as possible without failing
    pub fn inspect<S: AsRef<str>>(&self, headers: &[S]) -> ColumnResolution {
        let lowered: Vec<String> = headers
            .iter()
            .map(|h| h.as_ref().trim().to_lowercase())
            .collect();
        let mut claimed = vec![false; lowered.len()];
        let mut resolution = ColumnResolution::default();

        for rule in &self.rules {
            let hit = rule.any_of.iter().find_map(|keyword| {
                lowered
                    .iter()
                    .enumerate()
                    .find(|(idx, header)| !claimed[*idx] && rule.accepts(header, keyword))
                    .map(|(idx, _)| idx)
            });
            if let Some(idx) = hit {
                claimed[idx] = true;
                *resolution.slot(rule.field) = Some(idx);
            }
        }

        resolution.amount_candidates = lowered
            .iter()
            .enumerate()
            .filter(|(idx, header)| {
                !claimed[*idx] && self.amount_keywords.iter().any(|k| header.contains(k))
            })
            .map(|(idx, _)| idx)
            .collect();

        let mut untagged = Vec::new();
        for &idx in &resolution.amount_candidates {
            let header = &lowered[idx];
            if self.prior_tags.iter().any(|t| header.contains(t)) {
                resolution.amount_py.get_or_insert(idx);
            } else if self.current_tags.iter().any(|t| header.contains(t)) {
                resolution.amount_cy.get_or_insert(idx);
            } else {
                untagged.push(idx);
            }
        }

        // Untagged candidates fill the gaps in column order: current year first, then prior year
        let mut untagged = untagged.into_iter();
        if resolution.amount_cy.is_none() {
            resolution.amount_cy = untagged.next();
        }
        if resolution.amount_py.is_none() {
            resolution.amount_py = untagged.next();
        }

        debug!(
            "Resolved columns: ledger={:?} cy={:?} py={:?} unit={:?} group={:?} ({} amount candidates)",
            resolution.ledger_name,
            resolution.amount_cy,
            resolution.amount_py,
            resolution.unit,
            resolution.group,
            resolution.amount_candidates.len()
        );

        resolution
    }

    /// Resolve the header row, failing when a required column is missing
    pub fn resolve<S: AsRef<str>>(
        &self,
        headers: &[S],
    ) -> Result<ResolvedColumns, ColumnResolutionError> {
        let resolution = self.inspect(headers);
        match (resolution.ledger_name, resolution.amount_cy) {
            (Some(ledger_name), Some(amount_cy)) => Ok(ResolvedColumns {
                ledger_name,
                amount_cy,
                amount_py: resolution.amount_py,
                unit: resolution.unit,
                group: resolution.group,
                sub_group: resolution.sub_group,
                fund_type: resolution.fund_type,
                source: resolution.source,
            }),
            _ => Err(ColumnResolutionError {
                missing: resolution.missing(),
                headers: headers.iter().map(|h| h.as_ref().to_string()).collect(),
            }),
        }
    }
}
