//! Chart-of-accounts classification of validated rows
//!
//! Classification never fails. A row whose group cannot be matched is tagged
//! [`CanonicalGroup::Unclassified`] and reported as a [`ClassificationGap`], which
//! downstream reports surface as a data-quality signal.

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ChartOfAccountsTaxonomy;
use crate::ingestion::ValidatedRow;
use crate::types::*;

/// Why a row could not be fully classified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GapKind {
    /// The input carried no group for the row
    MissingGroup,
    /// The group text matched no canonical group in the taxonomy
    UnknownGroup(String),
    /// The sub-group is not listed for the row's group; the text is kept as given
    UnknownSubGroup(String),
    /// The fund type was not recognised; the row defaults to the general fund
    UnknownFundType(String),
    /// The contribution source was not recognised; the row defaults to local
    UnknownSource(String),
}

impl GapKind {
    /// Whether the gap leaves the row without a canonical group
    pub fn is_unclassified(&self) -> bool {
        matches!(self, GapKind::MissingGroup | GapKind::UnknownGroup(_))
    }
}

/// A non-fatal classification shortfall on one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationGap {
    pub row_number: usize,
    pub unit: String,
    pub ledger_name: String,
    pub kind: GapKind,
}

impl fmt::Display for ClassificationGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let detail = match &self.kind {
            GapKind::MissingGroup => "no group assigned".to_string(),
            GapKind::UnknownGroup(raw) => format!("unknown group '{}'", raw),
            GapKind::UnknownSubGroup(raw) => format!("unlisted sub-group '{}'", raw),
            GapKind::UnknownFundType(raw) => format!("unknown fund type '{}'", raw),
            GapKind::UnknownSource(raw) => format!("unknown contribution source '{}'", raw),
        };
        write!(
            f,
            "Row {} '{}' ({}): {}",
            self.row_number, self.ledger_name, self.unit, detail
        )
    }
}

/// Classified entries together with every gap found on the way
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub entries: Vec<LedgerEntry>,
    pub gaps: Vec<ClassificationGap>,
}

impl Classification {
    pub fn unclassified_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| !entry.group.is_classified())
            .count()
    }
}

/// Assigns canonical group, sub-group, fund type and source to rows
pub struct Classifier<'a> {
    taxonomy: &'a ChartOfAccountsTaxonomy,
}

impl<'a> Classifier<'a> {
    pub fn new(taxonomy: &'a ChartOfAccountsTaxonomy) -> Self {
        Self { taxonomy }
    }

    pub fn classify(&self, rows: Vec<ValidatedRow>) -> Classification {
        let mut classification = Classification::default();

        for row in rows {
            let mut gaps = Vec::new();

            let group = match row.group.as_deref() {
                None => {
                    gaps.push(GapKind::MissingGroup);
                    CanonicalGroup::Unclassified
                }
                Some(raw) => match CanonicalGroup::from_label(raw)
                    .filter(|group| self.taxonomy.class_of(*group).is_some())
                {
                    Some(group) => group,
                    None => {
                        gaps.push(GapKind::UnknownGroup(raw.to_string()));
                        CanonicalGroup::Unclassified
                    }
                },
            };

            let sub_group = row.sub_group.map(|raw| {
                let listed = self.taxonomy.sub_groups(group);
                match listed.iter().find(|known| known.eq_ignore_ascii_case(&raw)) {
                    Some(known) => known.clone(),
                    None => {
                        if !listed.is_empty() {
                            gaps.push(GapKind::UnknownSubGroup(raw.clone()));
                        }
                        raw
                    }
                }
            });

            let fund_type = match row.fund_type.as_deref() {
                None => FundType::General,
                Some(raw) => FundType::parse(raw).unwrap_or_else(|| {
                    gaps.push(GapKind::UnknownFundType(raw.to_string()));
                    FundType::General
                }),
            };

            let source = match row.source.as_deref() {
                None => ContributionSource::Local,
                Some(raw) => ContributionSource::parse(raw).unwrap_or_else(|| {
                    gaps.push(GapKind::UnknownSource(raw.to_string()));
                    ContributionSource::Local
                }),
            };

            classification
                .gaps
                .extend(gaps.into_iter().map(|kind| ClassificationGap {
                    row_number: row.row_number,
                    unit: row.unit.clone(),
                    ledger_name: row.ledger_name.clone(),
                    kind,
                }));

            classification.entries.push(LedgerEntry {
                unit: row.unit,
                ledger_name: row.ledger_name,
                amount_cy: row.amount_cy,
                amount_py: row.amount_py,
                group,
                sub_group,
                fund_type,
                source,
            });
        }

        if !classification.gaps.is_empty() {
            warn!(
                "{} classification gaps ({} rows unclassified)",
                classification.gaps.len(),
                classification.unclassified_count()
            );
        }
        debug!("Classified {} rows", classification.entries.len());

        classification
    }
}
