//! Income-tax audit form outlines (Form 10B and Form 10BB)

use serde::{Deserialize, Serialize};

use crate::types::Organization;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormSection {
    pub number: u8,
    pub title: String,
}

/// Skeleton of a statutory form with organization details filled in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormOutline {
    pub form: String,
    pub assessment_year: Option<String>,
    pub trust_name: String,
    pub pan: Option<String>,
    pub registration_number: Option<String>,
    pub sections: Vec<FormSection>,
}

impl FormOutline {
    fn build(form: &str, organization: &Organization, titles: &[&str]) -> Self {
        Self {
            form: form.to_string(),
            assessment_year: organization.assessment_year.clone(),
            trust_name: organization.name.clone(),
            pan: organization.pan.clone(),
            registration_number: organization.registration_number.clone(),
            sections: titles
                .iter()
                .zip(1u8..)
                .map(|(title, number)| FormSection {
                    number,
                    title: title.to_string(),
                })
                .collect(),
        }
    }
}

/// Audit report under section 12A(1)(b)
pub fn form_10b(organization: &Organization) -> FormOutline {
    FormOutline::build(
        "Form 10B",
        organization,
        &[
            "Particulars of registration under section 12A/12AA",
            "Audit of accounts",
            "Computation of income",
            "Application of income",
            "Accumulation of income",
            "Investments",
            "Voluntary contributions",
            "Auditor's certificate",
        ],
    )
}

pub fn form_10bb(organization: &Organization) -> FormOutline {
    FormOutline::build(
        "Form 10BB",
        organization,
        &[
            "Basic information",
            "Activities undertaken",
            "Receipt and application of income",
            "Statement of income",
            "Certificate",
        ],
    )
}
