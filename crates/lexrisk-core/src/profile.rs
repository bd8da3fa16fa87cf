//! Company profile captured by the analysis form, and its wire shape.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Practice areas offered by the analysis form.
pub const PRACTICE_AREAS: &[&str] = &[
    "Corporate & Commercial Law",
    "Mergers & Acquisitions (M&A)",
    "Litigation & Dispute Resolution",
    "Intellectual Property Law",
    "Employment & Labor Law",
    "Real Estate & Property Law",
    "Banking & Finance Law",
    "Tax Law",
    "Regulatory & Compliance Law",
    "Data Protection & Privacy Law",
];

/// The four editable form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProfileField {
    CompanyName,
    CompanyEmail,
    CompanyPhone,
    PracticeArea,
}

impl ProfileField {
    pub const ALL: [ProfileField; 4] = [
        ProfileField::CompanyName,
        ProfileField::CompanyEmail,
        ProfileField::CompanyPhone,
        ProfileField::PracticeArea,
    ];

    /// Human-readable label, as shown next to the form input.
    pub fn label(self) -> &'static str {
        match self {
            ProfileField::CompanyName => "Company Name",
            ProfileField::CompanyEmail => "Company Email ID",
            ProfileField::CompanyPhone => "Company Phone Number",
            ProfileField::PracticeArea => "Practice Area",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Company details entered on the analysis form.
///
/// Mutated field by field while the form is showing; validated as a whole on
/// submit (see [`validate`](crate::validate)).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyProfile {
    pub company_name: String,
    pub company_email: String,
    pub company_phone: String,
    pub practice_area: String,
}

impl CompanyProfile {
    pub fn new(
        company_name: impl Into<String>,
        company_email: impl Into<String>,
        company_phone: impl Into<String>,
        practice_area: impl Into<String>,
    ) -> Self {
        Self {
            company_name: company_name.into(),
            company_email: company_email.into(),
            company_phone: company_phone.into(),
            practice_area: practice_area.into(),
        }
    }

    pub fn get(&self, field: ProfileField) -> &str {
        match field {
            ProfileField::CompanyName => &self.company_name,
            ProfileField::CompanyEmail => &self.company_email,
            ProfileField::CompanyPhone => &self.company_phone,
            ProfileField::PracticeArea => &self.practice_area,
        }
    }

    /// Apply a single field edit.
    pub fn set(&mut self, field: ProfileField, value: impl Into<String>) {
        let slot = match field {
            ProfileField::CompanyName => &mut self.company_name,
            ProfileField::CompanyEmail => &mut self.company_email,
            ProfileField::CompanyPhone => &mut self.company_phone,
            ProfileField::PracticeArea => &mut self.practice_area,
        };
        *slot = value.into();
    }
}

/// Supporting-source toggles on the analysis form.
///
/// These stay client-side; the risk-analysis endpoint does not accept them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub include_internal_docs: bool,
    pub include_public_news: bool,
    pub use_past_matters: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            include_internal_docs: true,
            include_public_news: true,
            use_past_matters: true,
        }
    }
}

/// Request body for `POST /api/v1/risk-analysis`.
///
/// Key casing is the server contract: only `companyName` is camel-cased.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskAnalysisRequest {
    #[serde(rename = "companyName")]
    pub company_name: String,
    #[serde(rename = "companyemail")]
    pub company_email: String,
    #[serde(rename = "companyphonenumber")]
    pub company_phone: String,
    #[serde(rename = "practicearea")]
    pub practice_area: String,
}

impl From<&CompanyProfile> for RiskAnalysisRequest {
    fn from(profile: &CompanyProfile) -> Self {
        Self {
            company_name: profile.company_name.clone(),
            company_email: profile.company_email.clone(),
            company_phone: profile.company_phone.clone(),
            practice_area: profile.practice_area.clone(),
        }
    }
}
