//! Written-down-value depreciation for the fixed asset register

use bigdecimal::BigDecimal;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::{DepreciationCategory, DepreciationRateTable};
use crate::types::{UnitSelector, DEFAULT_UNIT};
use crate::utils::numeric::round_money;

/// One line of the fixed asset register as maintained by the preparer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetRecord {
    pub name: String,
    /// Gross block at the start of the year
    pub opening_gross: BigDecimal,
    pub additions: BigDecimal,
    pub deletions: BigDecimal,
    /// Accumulated depreciation at the start of the year
    pub opening_accumulated: BigDecimal,
    /// Depreciation written back on deleted assets
    pub deletion_adjustment: Option<BigDecimal>,
    /// Unit holding the asset; untagged assets belong to [`DEFAULT_UNIT`]
    #[serde(default)]
    pub unit: Option<String>,
}

impl AssetRecord {
    pub fn new(
        name: &str,
        opening_gross: BigDecimal,
        additions: BigDecimal,
        deletions: BigDecimal,
    ) -> Self {
        Self {
            name: name.to_string(),
            opening_gross,
            additions,
            deletions,
            opening_accumulated: BigDecimal::from(0),
            deletion_adjustment: None,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: &str) -> Self {
        self.unit = Some(unit.to_string());
        self
    }

    /// Unit the asset is attributed to
    pub fn unit_name(&self) -> &str {
        self.unit.as_deref().unwrap_or(DEFAULT_UNIT)
    }

    /// Whether the asset falls in the selected partition
    pub fn belongs_to(&self, selector: &UnitSelector) -> bool {
        match selector {
            UnitSelector::Consolidated => true,
            UnitSelector::Named(unit) => self.unit_name() == unit,
        }
    }

    pub fn with_opening_accumulated(mut self, amount: BigDecimal) -> Self {
        self.opening_accumulated = amount;
        self
    }

    pub fn with_deletion_adjustment(mut self, amount: BigDecimal) -> Self {
        self.deletion_adjustment = Some(amount);
        self
    }

    /// Gross block at the end of the year
    pub fn closing_gross(&self) -> BigDecimal {
        &self.opening_gross + &self.additions - &self.deletions
    }

    /// Tagged as immovable property by name
    pub fn is_immovable(&self) -> bool {
        self.name.to_lowercase().contains("immovable")
    }

    /// Tagged as movable property by name; "immovable" does not count
    pub fn is_movable(&self) -> bool {
        let lowered = self.name.to_lowercase();
        lowered.replace("immovable", "").contains("movable")
    }
}

/// Computed depreciation for one asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationLine {
    pub asset: AssetRecord,
    /// Matched rate-table category, `None` when the default rate applied
    pub category: Option<String>,
    pub rate: BigDecimal,
    /// Set when no category matched and the fallback rate was used
    pub rate_defaulted: bool,
    /// Current-year depreciation, rounded to 2 decimals
    pub depreciation: BigDecimal,
    pub closing_gross: BigDecimal,
    pub closing_accumulated: BigDecimal,
    /// Closing gross less closing accumulated depreciation
    pub net_block: BigDecimal,
}

/// The computed asset register
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssetRegister {
    pub lines: Vec<DepreciationLine>,
}

impl AssetRegister {
    /// Capital expenditure of the year (sum of additions)
    pub fn total_additions(&self) -> BigDecimal {
        self.lines.iter().map(|line| &line.asset.additions).sum()
    }

    pub fn total_depreciation(&self) -> BigDecimal {
        self.lines.iter().map(|line| &line.depreciation).sum()
    }

    pub fn total_net_block(&self) -> BigDecimal {
        self.lines.iter().map(|line| &line.net_block).sum()
    }

    /// Register lines of the selected partition
    pub fn select(&self, selector: &UnitSelector) -> AssetRegister {
        AssetRegister {
            lines: self
                .lines
                .iter()
                .filter(|line| line.asset.belongs_to(selector))
                .cloned()
                .collect(),
        }
    }

    /// Assets whose rate fell back to the default, for audit review
    pub fn defaulted(&self) -> impl Iterator<Item = &DepreciationLine> {
        self.lines.iter().filter(|line| line.rate_defaulted)
    }
}

/// Sum of additions over raw asset records
pub fn capital_expenditure(assets: &[AssetRecord]) -> BigDecimal {
    assets.iter().map(|asset| &asset.additions).sum()
}

fn word_matches(word: &str, keyword: &str) -> bool {
    match word.strip_prefix(keyword) {
        Some(rest) => rest.is_empty() || rest == "s" || rest == "es",
        None => false,
    }
}

/// Multi-word keywords must match consecutive words, the last one allowing a plural
fn keyword_matches(words: &[&str], keyword: &str) -> bool {
    let parts: Vec<&str> = keyword.split_whitespace().collect();
    let Some((last, leading)) = parts.split_last() else {
        return false;
    };
    words.windows(parts.len()).any(|window| {
        window[..leading.len()] == *leading && word_matches(window[leading.len()], last)
    })
}

/// Depreciation calculator over a rate table
///
/// Stateless: computing the same records twice yields identical registers.
pub struct DepreciationEngine<'a> {
    table: &'a DepreciationRateTable,
}

impl<'a> DepreciationEngine<'a> {
    pub fn new(table: &'a DepreciationRateTable) -> Self {
        Self { table }
    }

    /// First category with a keyword matching a whole word of the asset name
    ///
    /// Matching ignores case and accepts a plural "s"/"es" on the name's word, so
    /// "Computers" matches "computer" while "Carpets" does not match "car".
    pub fn match_category(&self, asset_name: &str) -> Option<&'a DepreciationCategory> {
        let lowered = asset_name.to_lowercase();
        let words: Vec<&str> = lowered
            .split(|c: char| !c.is_alphanumeric())
            .filter(|word| !word.is_empty())
            .collect();
        self.table.categories.iter().find(|category| {
            category
                .keywords
                .iter()
                .any(|keyword| keyword_matches(&words, &keyword.to_lowercase()))
        })
    }

    /// Depreciate one record at a given rate
    pub fn compute_with_rate(record: &AssetRecord, rate: &BigDecimal) -> DepreciationLine {
        let closing_gross = record.closing_gross();
        let depreciation = round_money(&(&closing_gross * rate));
        let write_back = record
            .deletion_adjustment
            .clone()
            .unwrap_or_else(|| BigDecimal::from(0));
        let closing_accumulated = &record.opening_accumulated + &depreciation - write_back;
        let net_block = &closing_gross - &closing_accumulated;

        DepreciationLine {
            asset: record.clone(),
            category: None,
            rate: rate.clone(),
            rate_defaulted: false,
            depreciation,
            closing_gross,
            closing_accumulated,
            net_block,
        }
    }

    /// Depreciate one record, resolving its rate from the table
    pub fn compute_line(&self, record: &AssetRecord) -> DepreciationLine {
        match self.match_category(&record.name) {
            Some(category) => {
                let mut line = Self::compute_with_rate(record, &category.rate);
                line.category = Some(category.name.clone());
                line
            }
            None => {
                warn!(
                    "No depreciation category matches '{}', applying default rate {}",
                    record.name, self.table.default_rate
                );
                let mut line = Self::compute_with_rate(record, &self.table.default_rate);
                line.rate_defaulted = true;
                line
            }
        }
    }

    pub fn compute(&self, records: &[AssetRecord]) -> AssetRegister {
        let register = AssetRegister {
            lines: records.iter().map(|r| self.compute_line(r)).collect(),
        };
        debug!(
            "Depreciation computed for {} assets ({} at default rate)",
            register.lines.len(),
            register.defaulted().count()
        );
        register
    }
}
