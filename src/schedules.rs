//! Remapping of canonical groups into statutory schedule line items

use bigdecimal::BigDecimal;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::config::{ScheduleLine, StatutorySchedule};
use crate::depreciation::AssetRegister;
use crate::types::{CanonicalGroup, LedgerEntry};

/// A populated schedule line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleAmount {
    pub label: String,
    /// Sum of current-year amounts of the line's groups
    pub ledger_amount: BigDecimal,
    /// Net book value from the asset register, on the fixed-asset line only
    pub net_book_value: BigDecimal,
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTableSection {
    pub heading: String,
    pub lines: Vec<ScheduleAmount>,
    pub total: BigDecimal,
}

/// A statutory schedule populated from classified entries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleTable {
    pub id: String,
    pub title: String,
    pub sections: Vec<ScheduleTableSection>,
}

impl ScheduleTable {
    pub fn grand_total(&self) -> BigDecimal {
        self.sections.iter().map(|section| &section.total).sum()
    }

    pub fn section(&self, heading: &str) -> Option<&ScheduleTableSection> {
        self.sections.iter().find(|section| section.heading == heading)
    }
}

/// Fills statutory schedules from classified entries and the asset register
pub struct ScheduleMapper<'a> {
    schedules: &'a [StatutorySchedule],
}

impl<'a> ScheduleMapper<'a> {
    pub fn new(schedules: &'a [StatutorySchedule]) -> Self {
        Self { schedules }
    }

    pub fn map(&self, entries: &[LedgerEntry], register: &AssetRegister) -> Vec<ScheduleTable> {
        self.schedules
            .iter()
            .map(|schedule| map_schedule(schedule, entries, register))
            .collect()
    }
}

/// Populate one schedule
pub fn map_schedule(
    schedule: &StatutorySchedule,
    entries: &[LedgerEntry],
    register: &AssetRegister,
) -> ScheduleTable {
    let net_book_value = register.total_net_block();

    let sections = schedule
        .sections
        .iter()
        .map(|section| {
            let lines: Vec<ScheduleAmount> = section
                .lines
                .iter()
                .map(|line| map_line(line, entries, &net_book_value))
                .collect();
            ScheduleTableSection {
                heading: section.heading.clone(),
                total: lines.iter().map(|line| &line.amount).sum(),
                lines,
            }
        })
        .collect();

    debug!("Mapped schedule {}", schedule.id);
    ScheduleTable {
        id: schedule.id.clone(),
        title: schedule.title.clone(),
        sections,
    }
}

fn map_line(line: &ScheduleLine, entries: &[LedgerEntry], net_book_value: &BigDecimal) -> ScheduleAmount {
    let ledger_amount: BigDecimal = entries
        .iter()
        .filter(|entry| line.groups.contains(&entry.group))
        .map(|entry| &entry.amount_cy)
        .sum();
    let net_book_value = if line.groups.contains(&CanonicalGroup::PropertyPlantEquipment) {
        net_book_value.clone()
    } else {
        BigDecimal::from(0)
    };

    ScheduleAmount {
        label: line.label.clone(),
        amount: &ledger_amount + &net_book_value,
        ledger_amount,
        net_book_value,
    }
}
