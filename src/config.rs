//! Immutable engine configuration: taxonomy, rate tables and statutory layouts
//!
//! An [`EngineConfig`] is built once, validated, and then passed by reference
//! into every calculator. [`EngineConfig::default`] carries the built-in tables
//! for Indian public charitable trusts (Income Tax Act, Gujarat Public Trusts
//! Act and the ICAI guidance note for not-for-profit organisations).

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::types::{CanonicalGroup, GroupClass};
use crate::utils::numeric::percent;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Group '{group}' is listed as both {first:?} and {second:?}")]
    OverlappingGroup {
        group: CanonicalGroup,
        first: GroupClass,
        second: GroupClass,
    },
    #[error("Group '{group}' appears in more than one line of schedule '{schedule}'")]
    DuplicateScheduleGroup {
        schedule: String,
        group: CanonicalGroup,
    },
    #[error("Rate '{name}' must be between 0 and 1, got {rate}")]
    InvalidRate { name: String, rate: BigDecimal },
    #[error("Invalid configuration document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The four disjoint canonical group sets plus the sub-group table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOfAccountsTaxonomy {
    pub assets: Vec<CanonicalGroup>,
    pub liabilities: Vec<CanonicalGroup>,
    pub income: Vec<CanonicalGroup>,
    pub expense: Vec<CanonicalGroup>,
    /// Recognised sub-groups keyed by canonical group
    pub sub_groups: BTreeMap<CanonicalGroup, Vec<String>>,
}

impl ChartOfAccountsTaxonomy {
    /// Statement set a group belongs to, or `None` when it is in none of them
    pub fn class_of(&self, group: CanonicalGroup) -> Option<GroupClass> {
        self.sets()
            .into_iter()
            .find(|(_, groups)| groups.contains(&group))
            .map(|(class, _)| class)
    }

    pub fn is_in(&self, group: CanonicalGroup, class: GroupClass) -> bool {
        self.groups(class).contains(&group)
    }

    pub fn groups(&self, class: GroupClass) -> &[CanonicalGroup] {
        match class {
            GroupClass::Asset => &self.assets,
            GroupClass::Liability => &self.liabilities,
            GroupClass::Income => &self.income,
            GroupClass::Expense => &self.expense,
        }
    }

    /// Recognised sub-groups for a group; empty when the group has no sub-group table
    pub fn sub_groups(&self, group: CanonicalGroup) -> &[String] {
        self.sub_groups
            .get(&group)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn sets(&self) -> [(GroupClass, &[CanonicalGroup]); 4] {
        [
            (GroupClass::Asset, &self.assets),
            (GroupClass::Liability, &self.liabilities),
            (GroupClass::Income, &self.income),
            (GroupClass::Expense, &self.expense),
        ]
    }

    /// Check the four sets are pairwise disjoint
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen: HashMap<CanonicalGroup, GroupClass> = HashMap::new();
        for (class, groups) in self.sets() {
            for group in groups {
                if let Some(first) = seen.insert(*group, class) {
                    if first != class {
                        return Err(ConfigError::OverlappingGroup {
                            group: *group,
                            first,
                            second: class,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Default for ChartOfAccountsTaxonomy {
    fn default() -> Self {
        use CanonicalGroup::*;

        let sub = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let mut sub_groups = BTreeMap::new();
        sub_groups.insert(
            LongTermBorrowings,
            sub(&["Secured", "Unsecured", "From Trustees", "From Banks"]),
        );
        sub_groups.insert(
            CashAndBank,
            sub(&["Cash on Hand", "Savings Bank", "Current Account", "Fixed Deposits"]),
        );
        sub_groups.insert(
            PropertyPlantEquipment,
            sub(&[
                "Immovable Properties",
                "Movable Properties",
                "Vehicles",
                "Furniture",
                "Computers",
            ]),
        );
        sub_groups.insert(
            DonationsAndGrants,
            sub(&[
                "Cash Donations",
                "Grant-in-Aid",
                "Corporate Donations",
                "Foreign Donations",
            ]),
        );
        sub_groups.insert(
            ProgrammeExpenses,
            sub(&["Scholarships", "Medical Aid", "Relief Work", "Education Programs"]),
        );

        Self {
            assets: vec![
                PropertyPlantEquipment,
                IntangibleAssets,
                CapitalWorkInProgress,
                InvestmentsLongTerm,
                InvestmentsCurrent,
                Inventories,
                Receivables,
                LoansAndAdvances,
                CashAndBank,
                OtherCurrentAssets,
                OtherNonCurrentAssets,
            ],
            liabilities: vec![
                CorpusFund,
                GeneralFund,
                DesignatedFunds,
                RestrictedFunds,
                LongTermBorrowings,
                LongTermProvisions,
                OtherLongTermLiabilities,
                CurrentLiabilities,
                ShortTermProvisions,
                ShortTermBorrowings,
                TradePayables,
                IncomeReceivedInAdvance,
            ],
            income: vec![
                DonationsAndGrants,
                FeesSubscriptions,
                InterestIncome,
                DividendIncome,
                OtherIncome,
                SaleOfGoods,
                RentIncome,
            ],
            expense: vec![
                ProgrammeExpenses,
                StaffPaymentsBenefits,
                AdminExpenses,
                RentRatesTaxes,
                RepairsMaintenance,
                FinanceCosts,
                Depreciation,
                OtherExpenses,
                AuditFees,
                LegalExpenses,
            ],
            sub_groups,
        }
    }
}

/// One row of the depreciation rate table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationCategory {
    /// Block of assets, e.g. "Computers"
    pub name: String,
    /// Written-down-value rate as a fraction (0.40 for 40%)
    pub rate: BigDecimal,
    /// Lower-case fragments matched against asset names
    pub keywords: Vec<String>,
}

/// Ordered rate table; the first matching category wins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepreciationRateTable {
    pub categories: Vec<DepreciationCategory>,
    /// Applied when no category matches
    pub default_rate: BigDecimal,
}

impl Default for DepreciationRateTable {
    fn default() -> Self {
        let category = |name: &str, rate: i64, keywords: &[&str]| DepreciationCategory {
            name: name.to_string(),
            rate: percent(rate),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        };

        // "immovable" must be tried before "movable"
        Self {
            categories: vec![
                category("Immovable Properties", 10, &["immovable", "building"]),
                category("Movable Properties", 15, &["movable", "plant", "machinery"]),
                category("Vehicles", 15, &["vehicle", "car", "motor"]),
                category("Furniture", 10, &["furniture", "fixture"]),
                category("Computers", 40, &["computer", "laptop"]),
                category("Intangible Assets", 25, &["intangible", "software"]),
            ],
            default_rate: percent(15),
        }
    }
}

/// A jurisdiction line item and the canonical groups summed into it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleLine {
    pub label: String,
    pub groups: Vec<CanonicalGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSection {
    pub heading: String,
    pub lines: Vec<ScheduleLine>,
}

/// A jurisdiction-specific statement layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatutorySchedule {
    /// Short identifier, e.g. "Sch VIII"
    pub id: String,
    pub title: String,
    pub sections: Vec<ScheduleSection>,
}

impl StatutorySchedule {
    pub fn lines(&self) -> impl Iterator<Item = &ScheduleLine> {
        self.sections.iter().flat_map(|section| section.lines.iter())
    }

    /// Check every canonical group appears in at most one line
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = Vec::new();
        for group in self.lines().flat_map(|line| line.groups.iter()) {
            if seen.contains(group) {
                return Err(ConfigError::DuplicateScheduleGroup {
                    schedule: self.id.clone(),
                    group: *group,
                });
            }
            seen.push(*group);
        }
        Ok(())
    }
}

/// A group requirement: at least one row must fall in any of `any_of`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredGroupRule {
    pub label: String,
    pub any_of: Vec<CanonicalGroup>,
}

/// A statutory document identifier with its title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentId {
    pub id: String,
    pub title: String,
}

/// Rules of the state trust act
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JurisdictionRules {
    pub name: String,
    pub required_groups: Vec<RequiredGroupRule>,
    /// Require immovable and movable entries when an asset register is supplied
    pub check_asset_register: bool,
    pub forms_required: Vec<DocumentId>,
    pub schedules: Vec<StatutorySchedule>,
}

impl Default for JurisdictionRules {
    fn default() -> Self {
        use CanonicalGroup::*;

        let line = |label: &str, groups: &[CanonicalGroup]| ScheduleLine {
            label: label.to_string(),
            groups: groups.to_vec(),
        };
        let rule = |label: &str, any_of: &[CanonicalGroup]| RequiredGroupRule {
            label: label.to_string(),
            any_of: any_of.to_vec(),
        };
        let doc = |id: &str, title: &str| DocumentId {
            id: id.to_string(),
            title: title.to_string(),
        };

        let balance_sheet = StatutorySchedule {
            id: "Sch VIII".to_string(),
            title: "Schedule VIII [Vide Rule 17(1)] - Balance Sheet".to_string(),
            sections: vec![
                ScheduleSection {
                    heading: "Funds & Liabilities".to_string(),
                    lines: vec![
                        line("Trust Funds or Corpus", &[CorpusFund]),
                        line("Other Earmarked Funds", &[RestrictedFunds, DesignatedFunds]),
                        line(
                            "Loans (Secured/Unsecured)",
                            &[LongTermBorrowings, ShortTermBorrowings],
                        ),
                        line(
                            "Liabilities",
                            &[
                                CurrentLiabilities,
                                TradePayables,
                                LongTermProvisions,
                                ShortTermProvisions,
                            ],
                        ),
                    ],
                },
                ScheduleSection {
                    heading: "Property & Assets".to_string(),
                    lines: vec![
                        line(
                            "Immovable Properties, Furniture & Fixtures",
                            &[PropertyPlantEquipment],
                        ),
                        line("Investments", &[InvestmentsLongTerm, InvestmentsCurrent]),
                        line("Loans (Scholarships/Other) and Advances", &[LoansAndAdvances]),
                        line("Cash and Bank Balances", &[CashAndBank]),
                    ],
                },
            ],
        };

        let income_expenditure = StatutorySchedule {
            id: "Sch IX".to_string(),
            title: "Schedule IX [Vide Rule 17(1)] - Income & Expenditure Account".to_string(),
            sections: vec![
                ScheduleSection {
                    heading: "Expenditure".to_string(),
                    lines: vec![
                        line("To Rent, Rates, Taxes", &[RentRatesTaxes]),
                        line("To Repairs & Maintenance", &[RepairsMaintenance]),
                        line("To Salaries", &[StaffPaymentsBenefits]),
                        line("To Audit Fees", &[AuditFees]),
                        line("To Establishment Expenses", &[AdminExpenses, OtherExpenses]),
                        line("To Depreciation", &[Depreciation]),
                        line("To Expenditure on Objects of Trust", &[ProgrammeExpenses]),
                    ],
                },
                ScheduleSection {
                    heading: "Income".to_string(),
                    lines: vec![
                        line("By Rent (Accrued/Realised)", &[RentIncome]),
                        line("By Interest (Accrued/Realised)", &[InterestIncome]),
                        line("By Dividend", &[DividendIncome]),
                        line("By Donations in Cash or Kind and Grants", &[DonationsAndGrants]),
                        line(
                            "By Income from other sources",
                            &[OtherIncome, FeesSubscriptions, SaleOfGoods],
                        ),
                    ],
                },
            ],
        };

        Self {
            name: "Gujarat Public Trusts Act".to_string(),
            required_groups: vec![
                rule("Corpus Fund", &[CorpusFund]),
                rule("Restricted Funds", &[RestrictedFunds]),
                rule("Property, Plant & Equipment", &[PropertyPlantEquipment]),
                rule("Investments", &[InvestmentsLongTerm, InvestmentsCurrent]),
            ],
            check_asset_register: true,
            forms_required: vec![
                doc("Form 10", "Annual Statement of Accounts"),
                doc("Form 11", "Balance Sheet"),
                doc("Form 12", "Income & Expenditure Account"),
            ],
            schedules: vec![balance_sheet, income_expenditure],
        }
    }
}

/// Professional-body guidance note requirements
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GuidanceRules {
    pub name: String,
    pub schedules_required: Vec<DocumentId>,
    pub notes_required: bool,
}

impl Default for GuidanceRules {
    fn default() -> Self {
        let schedules = [
            ("I", "Classification of Funds"),
            ("II", "Application of Funds"),
            ("III", "Receipts and Payments"),
            ("IV", "Income and Expenditure"),
            ("V", "Balance Sheet"),
            ("VI", "Notes to Accounts"),
        ];
        Self {
            name: "ICAI Guidance Note on Accounting for NPOs".to_string(),
            schedules_required: schedules
                .iter()
                .map(|(id, title)| DocumentId {
                    id: id.to_string(),
                    title: title.to_string(),
                })
                .collect(),
            notes_required: true,
        }
    }
}

/// Complete engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub taxonomy: ChartOfAccountsTaxonomy,
    pub depreciation: DepreciationRateTable,
    pub trust_act: JurisdictionRules,
    pub guidance: GuidanceRules,
    /// Expense groups counted as programme (objects of the trust) spending
    pub program_groups: Vec<CanonicalGroup>,
    /// Share of income that may be accumulated under section 11(1)(a)
    pub accumulation_rate: BigDecimal,
    /// Largest absolute difference at which the balance check still passes
    pub balance_tolerance: BigDecimal,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            taxonomy: ChartOfAccountsTaxonomy::default(),
            depreciation: DepreciationRateTable::default(),
            trust_act: JurisdictionRules::default(),
            guidance: GuidanceRules::default(),
            program_groups: vec![CanonicalGroup::ProgrammeExpenses],
            accumulation_rate: percent(15),
            balance_tolerance: BigDecimal::from(1),
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration document; omitted sections take their defaults
    pub fn from_json(document: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Return a copy with a different accumulation rate
    pub fn with_accumulation_rate(mut self, rate: BigDecimal) -> Result<Self, ConfigError> {
        validate_rate("accumulation_rate", &rate)?;
        self.accumulation_rate = rate;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.taxonomy.validate()?;
        for schedule in &self.trust_act.schedules {
            schedule.validate()?;
        }
        validate_rate("accumulation_rate", &self.accumulation_rate)?;
        validate_rate("default depreciation rate", &self.depreciation.default_rate)?;
        for category in &self.depreciation.categories {
            validate_rate(&category.name, &category.rate)?;
        }
        Ok(())
    }
}

fn validate_rate(name: &str, rate: &BigDecimal) -> Result<(), ConfigError> {
    if *rate < BigDecimal::from(0) || *rate > BigDecimal::from(1) {
        return Err(ConfigError::InvalidRate {
            name: name.to_string(),
            rate: rate.clone(),
        });
    }
    Ok(())
}
