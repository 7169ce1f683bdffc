//! Core types and data structures for the compliance engine

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ConfigError;
use crate::ingestion::{ColumnResolutionError, ValidationError};

/// Unit name every row falls into when the input carries no unit column
pub const DEFAULT_UNIT: &str = "Main Unit";

/// Sentinel unit name selecting the union of all units
pub const CONSOLIDATED: &str = "Consolidated";

/// Canonical, jurisdiction-neutral account groups
///
/// The variants cover the fixed Indian NPO chart of accounts. Which of the four
/// statement sets a group belongs to is decided by the configured
/// [`ChartOfAccountsTaxonomy`](crate::config::ChartOfAccountsTaxonomy), not by the enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalGroup {
    // Balance sheet - assets
    #[serde(rename = "Property, Plant & Equipment")]
    PropertyPlantEquipment,
    #[serde(rename = "Intangible Assets")]
    IntangibleAssets,
    #[serde(rename = "Capital Work in Progress")]
    CapitalWorkInProgress,
    #[serde(rename = "Investments - Long Term")]
    InvestmentsLongTerm,
    #[serde(rename = "Investments - Current")]
    InvestmentsCurrent,
    #[serde(rename = "Inventories")]
    Inventories,
    #[serde(rename = "Receivables")]
    Receivables,
    #[serde(rename = "Loans & Advances")]
    LoansAndAdvances,
    #[serde(rename = "Cash and Bank Balances")]
    CashAndBank,
    #[serde(rename = "Other Current Assets")]
    OtherCurrentAssets,
    #[serde(rename = "Other Non-Current Assets")]
    OtherNonCurrentAssets,
    // Balance sheet - funds and liabilities
    #[serde(rename = "Corpus Fund")]
    CorpusFund,
    #[serde(rename = "General Fund")]
    GeneralFund,
    #[serde(rename = "Designated Funds")]
    DesignatedFunds,
    #[serde(rename = "Restricted Funds")]
    RestrictedFunds,
    #[serde(rename = "Long Term Borrowings")]
    LongTermBorrowings,
    #[serde(rename = "Long Term Provisions")]
    LongTermProvisions,
    #[serde(rename = "Other Long Term Liabilities")]
    OtherLongTermLiabilities,
    #[serde(rename = "Current Liabilities")]
    CurrentLiabilities,
    #[serde(rename = "Short Term Provisions")]
    ShortTermProvisions,
    #[serde(rename = "Short Term Borrowings")]
    ShortTermBorrowings,
    #[serde(rename = "Trade Payables")]
    TradePayables,
    #[serde(rename = "Income Received in Advance")]
    IncomeReceivedInAdvance,
    // Income
    #[serde(rename = "Donations and Grants")]
    DonationsAndGrants,
    #[serde(rename = "Fees / Subscriptions")]
    FeesSubscriptions,
    #[serde(rename = "Interest Income")]
    InterestIncome,
    #[serde(rename = "Dividend Income")]
    DividendIncome,
    #[serde(rename = "Other Income")]
    OtherIncome,
    #[serde(rename = "Sale of Goods")]
    SaleOfGoods,
    #[serde(rename = "Rent Income")]
    RentIncome,
    // Expenditure
    #[serde(rename = "Programme Expenses")]
    ProgrammeExpenses,
    #[serde(rename = "Staff Payments & Benefits")]
    StaffPaymentsBenefits,
    #[serde(rename = "Admin Expenses")]
    AdminExpenses,
    #[serde(rename = "Rent, Rates & Taxes")]
    RentRatesTaxes,
    #[serde(rename = "Repairs & Maintenance")]
    RepairsMaintenance,
    #[serde(rename = "Finance Costs")]
    FinanceCosts,
    #[serde(rename = "Depreciation")]
    Depreciation,
    #[serde(rename = "Other Expenses")]
    OtherExpenses,
    #[serde(rename = "Audit Fees")]
    AuditFees,
    #[serde(rename = "Legal Expenses")]
    LegalExpenses,
    /// No canonical group could be matched for the row
    #[serde(rename = "Unclassified")]
    Unclassified,
}

impl CanonicalGroup {
    /// Every classifiable group, in chart order (excludes `Unclassified`)
    pub const ALL: [CanonicalGroup; 40] = [
        CanonicalGroup::PropertyPlantEquipment,
        CanonicalGroup::IntangibleAssets,
        CanonicalGroup::CapitalWorkInProgress,
        CanonicalGroup::InvestmentsLongTerm,
        CanonicalGroup::InvestmentsCurrent,
        CanonicalGroup::Inventories,
        CanonicalGroup::Receivables,
        CanonicalGroup::LoansAndAdvances,
        CanonicalGroup::CashAndBank,
        CanonicalGroup::OtherCurrentAssets,
        CanonicalGroup::OtherNonCurrentAssets,
        CanonicalGroup::CorpusFund,
        CanonicalGroup::GeneralFund,
        CanonicalGroup::DesignatedFunds,
        CanonicalGroup::RestrictedFunds,
        CanonicalGroup::LongTermBorrowings,
        CanonicalGroup::LongTermProvisions,
        CanonicalGroup::OtherLongTermLiabilities,
        CanonicalGroup::CurrentLiabilities,
        CanonicalGroup::ShortTermProvisions,
        CanonicalGroup::ShortTermBorrowings,
        CanonicalGroup::TradePayables,
        CanonicalGroup::IncomeReceivedInAdvance,
        CanonicalGroup::DonationsAndGrants,
        CanonicalGroup::FeesSubscriptions,
        CanonicalGroup::InterestIncome,
        CanonicalGroup::DividendIncome,
        CanonicalGroup::OtherIncome,
        CanonicalGroup::SaleOfGoods,
        CanonicalGroup::RentIncome,
        CanonicalGroup::ProgrammeExpenses,
        CanonicalGroup::StaffPaymentsBenefits,
        CanonicalGroup::AdminExpenses,
        CanonicalGroup::RentRatesTaxes,
        CanonicalGroup::RepairsMaintenance,
        CanonicalGroup::FinanceCosts,
        CanonicalGroup::Depreciation,
        CanonicalGroup::OtherExpenses,
        CanonicalGroup::AuditFees,
        CanonicalGroup::LegalExpenses,
    ];

    /// Human-readable label as it appears on trial balances and schedules
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalGroup::PropertyPlantEquipment => "Property, Plant & Equipment",
            CanonicalGroup::IntangibleAssets => "Intangible Assets",
            CanonicalGroup::CapitalWorkInProgress => "Capital Work in Progress",
            CanonicalGroup::InvestmentsLongTerm => "Investments - Long Term",
            CanonicalGroup::InvestmentsCurrent => "Investments - Current",
            CanonicalGroup::Inventories => "Inventories",
            CanonicalGroup::Receivables => "Receivables",
            CanonicalGroup::LoansAndAdvances => "Loans & Advances",
            CanonicalGroup::CashAndBank => "Cash and Bank Balances",
            CanonicalGroup::OtherCurrentAssets => "Other Current Assets",
            CanonicalGroup::OtherNonCurrentAssets => "Other Non-Current Assets",
            CanonicalGroup::CorpusFund => "Corpus Fund",
            CanonicalGroup::GeneralFund => "General Fund",
            CanonicalGroup::DesignatedFunds => "Designated Funds",
            CanonicalGroup::RestrictedFunds => "Restricted Funds",
            CanonicalGroup::LongTermBorrowings => "Long Term Borrowings",
            CanonicalGroup::LongTermProvisions => "Long Term Provisions",
            CanonicalGroup::OtherLongTermLiabilities => "Other Long Term Liabilities",
            CanonicalGroup::CurrentLiabilities => "Current Liabilities",
            CanonicalGroup::ShortTermProvisions => "Short Term Provisions",
            CanonicalGroup::ShortTermBorrowings => "Short Term Borrowings",
            CanonicalGroup::TradePayables => "Trade Payables",
            CanonicalGroup::IncomeReceivedInAdvance => "Income Received in Advance",
            CanonicalGroup::DonationsAndGrants => "Donations and Grants",
            CanonicalGroup::FeesSubscriptions => "Fees / Subscriptions",
            CanonicalGroup::InterestIncome => "Interest Income",
            CanonicalGroup::DividendIncome => "Dividend Income",
            CanonicalGroup::OtherIncome => "Other Income",
            CanonicalGroup::SaleOfGoods => "Sale of Goods",
            CanonicalGroup::RentIncome => "Rent Income",
            CanonicalGroup::ProgrammeExpenses => "Programme Expenses",
            CanonicalGroup::StaffPaymentsBenefits => "Staff Payments & Benefits",
            CanonicalGroup::AdminExpenses => "Admin Expenses",
            CanonicalGroup::RentRatesTaxes => "Rent, Rates & Taxes",
            CanonicalGroup::RepairsMaintenance => "Repairs & Maintenance",
            CanonicalGroup::FinanceCosts => "Finance Costs",
            CanonicalGroup::Depreciation => "Depreciation",
            CanonicalGroup::OtherExpenses => "Other Expenses",
            CanonicalGroup::AuditFees => "Audit Fees",
            CanonicalGroup::LegalExpenses => "Legal Expenses",
            CanonicalGroup::Unclassified => "Unclassified",
        }
    }

    /// Look a group up by its label, ignoring case and surrounding whitespace
    pub fn from_label(label: &str) -> Option<Self> {
        let needle = label.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|group| group.label().eq_ignore_ascii_case(needle))
    }

    pub fn is_classified(&self) -> bool {
        *self != CanonicalGroup::Unclassified
    }
}

impl fmt::Display for CanonicalGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The four disjoint statement sets of the chart of accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupClass {
    /// Balance sheet, property and assets side
    Asset,
    /// Balance sheet, funds and liabilities side
    Liability,
    /// Income and expenditure account, income side
    Income,
    /// Income and expenditure account, expenditure side
    Expense,
}

/// Donor-restriction classification of a fund balance
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum FundType {
    /// Unrestricted funds available for any object of the trust
    #[default]
    General,
    /// Earmarked by the trustees, not by donors
    Designated,
    /// Restricted by donor stipulation
    Restricted,
    /// Corpus contributions, not available for revenue application
    Corpus,
}

impl FundType {
    pub const ALL: [FundType; 4] = [
        FundType::General,
        FundType::Designated,
        FundType::Restricted,
        FundType::Corpus,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FundType::General => "General",
            FundType::Designated => "Designated",
            FundType::Restricted => "Restricted",
            FundType::Corpus => "Corpus",
        }
    }

    /// Parse a fund type cell; accepts the bare label or the label followed by "fund(s)"
    pub fn parse(value: &str) -> Option<Self> {
        let lowered = value.trim().to_lowercase();
        let stem = lowered
            .strip_suffix("funds")
            .or_else(|| lowered.strip_suffix("fund"))
            .unwrap_or(&lowered)
            .trim();
        Self::ALL
            .iter()
            .copied()
            .find(|fund_type| fund_type.label().eq_ignore_ascii_case(stem))
    }
}

impl fmt::Display for FundType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Origin of a contribution for FCRA segregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ContributionSource {
    #[default]
    Local,
    /// Received under the Foreign Contribution (Regulation) Act
    Foreign,
}

impl ContributionSource {
    pub fn label(&self) -> &'static str {
        match self {
            ContributionSource::Local => "Local",
            ContributionSource::Foreign => "FCRA",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "local" | "domestic" | "indian" => Some(ContributionSource::Local),
            "fcra" | "foreign" | "foreign contribution" => Some(ContributionSource::Foreign),
            _ => None,
        }
    }
}

/// Which partition of the ledger a computation runs over
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitSelector {
    /// Union of all units
    Consolidated,
    /// Exactly one named unit
    Named(String),
}

impl UnitSelector {
    /// Build a selector from a unit name, mapping the consolidated sentinel
    pub fn from_name(name: &str) -> Self {
        if name == CONSOLIDATED {
            UnitSelector::Consolidated
        } else {
            UnitSelector::Named(name.to_string())
        }
    }

    pub fn name(&self) -> &str {
        match self {
            UnitSelector::Consolidated => CONSOLIDATED,
            UnitSelector::Named(name) => name,
        }
    }
}

/// A classified trial balance line
///
/// Entries are created by the classifier from validated rows and are not
/// mutated afterwards; re-ingestion produces a fresh set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Branch or division the line belongs to
    pub unit: String,
    /// Ledger name, unique within its unit
    pub ledger_name: String,
    /// Current-year balance, never negative
    pub amount_cy: BigDecimal,
    /// Prior-year balance, may be negative
    pub amount_py: BigDecimal,
    pub group: CanonicalGroup,
    pub sub_group: Option<String>,
    pub fund_type: FundType,
    pub source: ContributionSource,
}

impl LedgerEntry {
    /// Create an unclassified general-fund local entry
    pub fn new(unit: &str, ledger_name: &str, amount_cy: BigDecimal, amount_py: BigDecimal) -> Self {
        Self {
            unit: unit.to_string(),
            ledger_name: ledger_name.to_string(),
            amount_cy,
            amount_py,
            group: CanonicalGroup::Unclassified,
            sub_group: None,
            fund_type: FundType::General,
            source: ContributionSource::Local,
        }
    }

    pub fn with_group(mut self, group: CanonicalGroup) -> Self {
        self.group = group;
        self
    }

    pub fn with_sub_group(mut self, sub_group: &str) -> Self {
        self.sub_group = Some(sub_group.to_string());
        self
    }

    pub fn with_fund_type(mut self, fund_type: FundType) -> Self {
        self.fund_type = fund_type;
        self
    }

    pub fn with_source(mut self, source: ContributionSource) -> Self {
        self.source = source;
        self
    }
}

/// Organization metadata supplied by the surrounding application
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    /// Balance sheet date
    pub period_end: Option<NaiveDate>,
    /// e.g. "2024-25"
    pub assessment_year: Option<String>,
    pub pan: Option<String>,
    /// Registration number under section 12A/12AB
    pub registration_number: Option<String>,
}

/// Errors that can occur in the compliance engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    ColumnResolution(#[from] ColumnResolutionError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Dataset error: {0}")]
    Dataset(String),
    #[error("Collaborator error: {0}")]
    Collaborator(String),
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::Dataset(err.to_string())
    }
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
