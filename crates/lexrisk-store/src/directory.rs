//! Seeded, in-memory directories backing the browse pages.

use chrono::{Days, NaiveDate};
use lexrisk_core::table::{CellValue, TableRow};
use lexrisk_core::{Location, WizardView, initials};
use tracing::{debug, info};

use crate::StoreError;

const REPORT_DATE_FORMAT: &str = "%b %d, %Y";

/// An internal attorney profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attorney {
    pub id: u32,
    pub name: String,
    pub initials: String,
    pub role: String,
    pub practice_area: String,
    pub about: String,
    pub expertise: Vec<String>,
    pub past_matters: u32,
    pub email: String,
    pub phone: String,
    pub location: String,
}

/// A previously run analysis, as listed on the reports page.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub id: u32,
    pub company_name: String,
    pub practice_area: String,
    pub date: NaiveDate,
    pub confidence: u8,
}

impl ReportSummary {
    /// Query that reopens this report in the analysis wizard.
    pub fn deep_link(&self) -> String {
        Location {
            view: Some(WizardView::Report),
            company_name: Some(self.company_name.clone()),
            practice_area: Some(self.practice_area.clone()),
            confidence: Some(self.confidence.into()),
            ..Default::default()
        }
        .to_query()
    }

    pub fn display_date(&self) -> String {
        self.date.format(REPORT_DATE_FORMAT).to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: u32,
    pub name: String,
    pub industry: String,
    pub contact_email: String,
    pub open_matters: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnowledgeKind {
    InternalDocument,
    PublicNews,
    Regulation,
}

impl KnowledgeKind {
    pub fn label(self) -> &'static str {
        match self {
            KnowledgeKind::InternalDocument => "Internal document",
            KnowledgeKind::PublicNews => "Public news",
            KnowledgeKind::Regulation => "Regulation",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgeSource {
    pub id: u32,
    pub title: String,
    pub kind: KnowledgeKind,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AttorneyFilter {
    pub practice_area: Option<String>,
    /// Case-insensitive substring of the attorney's name.
    pub search: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportOrder {
    #[default]
    LatestFirst,
    OldestFirst,
}

#[derive(Debug, Clone, Default)]
pub struct ReportQuery {
    /// Case-insensitive substring of the company name.
    pub search: Option<String>,
    pub practice_area: Option<String>,
    /// Only reports dated within this many days of `today`.
    pub within_days: Option<u64>,
    pub order: ReportOrder,
}

/// All browseable directories.
///
/// Lookups by id fail with [`StoreError::NotFound`] rather than panicking, so
/// callers can render a "not found" state.
pub struct Directory {
    attorneys: Vec<Attorney>,
    reports: Vec<ReportSummary>,
    customers: Vec<Customer>,
    knowledge: Vec<KnowledgeSource>,
}

impl Directory {
    /// Build the directory from its seed data.
    pub fn seeded() -> Result<Self, StoreError> {
        let dir = Self {
            attorneys: seed_attorneys(),
            reports: seed_reports()?,
            customers: seed_customers(),
            knowledge: seed_knowledge(),
        };
        info!(
            attorneys = dir.attorneys.len(),
            reports = dir.reports.len(),
            customers = dir.customers.len(),
            knowledge = dir.knowledge.len(),
            "loaded directory"
        );
        Ok(dir)
    }

    pub fn attorney(&self, id: u32) -> Result<&Attorney, StoreError> {
        self.attorneys
            .iter()
            .find(|a| a.id == id)
            .ok_or(StoreError::NotFound {
                entity: "attorney",
                id,
            })
    }

    pub fn attorneys(&self, filter: &AttorneyFilter) -> Vec<&Attorney> {
        let needle = filter.search.as_deref().map(str::to_lowercase);
        self.attorneys
            .iter()
            .filter(|a| {
                filter
                    .practice_area
                    .as_deref()
                    .is_none_or(|area| a.practice_area.eq_ignore_ascii_case(area))
            })
            .filter(|a| {
                needle
                    .as_deref()
                    .is_none_or(|n| a.name.to_lowercase().contains(n))
            })
            .collect()
    }

    pub fn report(&self, id: u32) -> Result<&ReportSummary, StoreError> {
        self.reports
            .iter()
            .find(|r| r.id == id)
            .ok_or(StoreError::NotFound { entity: "report", id })
    }

    /// Filter and order past reports relative to `today`.
    pub fn reports(&self, query: &ReportQuery, today: NaiveDate) -> Vec<&ReportSummary> {
        let needle = query.search.as_deref().map(str::to_lowercase);
        let cutoff = query
            .within_days
            .and_then(|days| today.checked_sub_days(Days::new(days)));

        let mut out: Vec<&ReportSummary> = self
            .reports
            .iter()
            .filter(|r| {
                needle
                    .as_deref()
                    .is_none_or(|n| r.company_name.to_lowercase().contains(n))
            })
            .filter(|r| {
                query
                    .practice_area
                    .as_deref()
                    .is_none_or(|area| r.practice_area.eq_ignore_ascii_case(area))
            })
            .filter(|r| cutoff.is_none_or(|c| r.date >= c))
            .collect();

        match query.order {
            ReportOrder::LatestFirst => out.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id))),
            ReportOrder::OldestFirst => out.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id))),
        }
        debug!(matched = out.len(), "filtered reports");
        out
    }

    pub fn customer(&self, id: u32) -> Result<&Customer, StoreError> {
        self.customers
            .iter()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound {
                entity: "customer",
                id,
            })
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn knowledge_sources(&self) -> &[KnowledgeSource] {
        &self.knowledge
    }
}

// ── Table rows ──

impl TableRow for Attorney {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "role" => self.role.as_str().into(),
            "practice_area" => self.practice_area.as_str().into(),
            "past_matters" => self.past_matters.into(),
            "email" => self.email.as_str().into(),
            "location" => self.location.as_str().into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for ReportSummary {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "company_name" => self.company_name.as_str().into(),
            "practice_area" => self.practice_area.as_str().into(),
            // ISO form so text ordering is chronological.
            "date" => self.date.to_string().into(),
            "confidence" => self.confidence.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for Customer {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "name" => self.name.as_str().into(),
            "industry" => self.industry.as_str().into(),
            "contact_email" => self.contact_email.as_str().into(),
            "open_matters" => self.open_matters.into(),
            _ => CellValue::Empty,
        }
    }
}

impl TableRow for KnowledgeSource {
    fn cell(&self, key: &str) -> CellValue {
        match key {
            "id" => self.id.into(),
            "title" => self.title.as_str().into(),
            "kind" => self.kind.label().into(),
            "url" => self.url.clone().map_or(CellValue::Empty, CellValue::Text),
            _ => CellValue::Empty,
        }
    }
}

// ── Seed data ──

#[allow(clippy::too_many_arguments)]
fn attorney(
    id: u32,
    name: &str,
    role: &str,
    practice_area: &str,
    about: &str,
    expertise: &[&str],
    past_matters: u32,
    email: &str,
    phone: &str,
    location: &str,
) -> Attorney {
    Attorney {
        id,
        name: name.to_string(),
        initials: initials(Some(name)),
        role: role.to_string(),
        practice_area: practice_area.to_string(),
        about: about.to_string(),
        expertise: expertise.iter().map(|s| s.to_string()).collect(),
        past_matters,
        email: email.to_string(),
        phone: phone.to_string(),
        location: location.to_string(),
    }
}

fn seed_attorneys() -> Vec<Attorney> {
    vec![
        attorney(
            1,
            "A.K. Raman",
            "Partner",
            "Compliance",
            "Leads the regulatory compliance group with a focus on manufacturing clients.",
            &["Environmental permits", "Supplier contracts", "Workforce classification"],
            18,
            "ak.raman@afs.example.com",
            "+1 (555) 201-4410",
            "Chicago, IL",
        ),
        attorney(
            2,
            "Priya Natarajan",
            "Senior Associate",
            "Corporate",
            "Advises on corporate governance, M&A diligence and commercial agreements.",
            &["M&A diligence", "Board governance", "Commercial contracts"],
            24,
            "priya.natarajan@afs.example.com",
            "+1 (555) 201-4432",
            "New York, NY",
        ),
        attorney(
            3,
            "Marcus Oyelaran",
            "Counsel",
            "Employment",
            "Handles employment disputes, classification audits and executive agreements.",
            &["Misclassification", "Wage and hour", "Executive compensation"],
            31,
            "marcus.oyelaran@afs.example.com",
            "+1 (555) 201-4457",
            "Austin, TX",
        ),
        attorney(
            4,
            "Elena Fischer",
            "Partner",
            "Litigation",
            "Trial lawyer covering commercial disputes and regulatory enforcement actions.",
            &["Commercial litigation", "Arbitration", "Regulatory enforcement"],
            42,
            "elena.fischer@afs.example.com",
            "+1 (555) 201-4471",
            "Boston, MA",
        ),
        attorney(
            5,
            "Daniel Kwon",
            "Associate",
            "IP",
            "Works on patent portfolios, licensing and trade secret protection.",
            &["Patent licensing", "Trade secrets", "Open source compliance"],
            9,
            "daniel.kwon@afs.example.com",
            "+1 (555) 201-4489",
            "San Jose, CA",
        ),
        attorney(
            6,
            "Sofia Martins",
            "Senior Associate",
            "Compliance",
            "Focuses on data protection programs and cross-border privacy compliance.",
            &["GDPR", "Data breach response", "Vendor privacy reviews"],
            15,
            "sofia.martins@afs.example.com",
            "+1 (555) 201-4493",
            "Seattle, WA",
        ),
    ]
}

fn report(
    id: u32,
    company_name: &str,
    practice_area: &str,
    date: &str,
    confidence: u8,
) -> Result<ReportSummary, StoreError> {
    let date = NaiveDate::parse_from_str(date, REPORT_DATE_FORMAT)
        .map_err(|_| StoreError::BadDate(date.to_string()))?;
    Ok(ReportSummary {
        id,
        company_name: company_name.to_string(),
        practice_area: practice_area.to_string(),
        date,
        confidence,
    })
}

fn seed_reports() -> Result<Vec<ReportSummary>, StoreError> {
    Ok(vec![
        report(1, "Acme Manufacturing", "Compliance", "Jan 12, 2024", 92)?,
        report(2, "NextGen Pharma", "Corporate", "Jan 10, 2024", 87)?,
        report(3, "Bluestone Media", "Employment", "Jan 09, 2024", 78)?,
        report(4, "Orion Logistics", "Litigation", "Jan 07, 2024", 85)?,
        report(5, "TechVentures Inc", "IP", "Jan 05, 2024", 91)?,
        report(6, "Global Finance Corp", "Compliance", "Jan 03, 2024", 76)?,
    ])
}

fn seed_customers() -> Vec<Customer> {
    let rows: [(&str, &str, &str, u32); 4] = [
        ("Acme Manufacturing", "Industrial manufacturing", "legal@acme.example.com", 3),
        ("NextGen Pharma", "Pharmaceuticals", "counsel@nextgen.example.com", 1),
        ("Orion Logistics", "Freight and logistics", "risk@orion.example.com", 2),
        ("Global Finance Corp", "Banking", "compliance@gfc.example.com", 4),
    ];
    rows.iter()
        .zip(1..)
        .map(|((name, industry, email, open), id)| Customer {
            id,
            name: name.to_string(),
            industry: industry.to_string(),
            contact_email: email.to_string(),
            open_matters: *open,
        })
        .collect()
}

fn seed_knowledge() -> Vec<KnowledgeSource> {
    vec![
        KnowledgeSource {
            id: 1,
            title: "Supplier contract playbook".into(),
            kind: KnowledgeKind::InternalDocument,
            url: None,
        },
        KnowledgeSource {
            id: 2,
            title: "Environmental permit register".into(),
            kind: KnowledgeKind::Regulation,
            url: Some("https://www.epa.gov/permits".into()),
        },
        KnowledgeSource {
            id: 3,
            title: "Industry enforcement news digest".into(),
            kind: KnowledgeKind::PublicNews,
            url: Some("https://news.example.com/enforcement".into()),
        },
        KnowledgeSource {
            id: 4,
            title: "Worker classification guidance".into(),
            kind: KnowledgeKind::Regulation,
            url: Some("https://www.dol.gov/agencies/whd/flsa/misclassification".into()),
        },
    ]
}
