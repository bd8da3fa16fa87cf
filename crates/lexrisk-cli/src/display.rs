//! Terminal rendering for reports, drafts and directory records.
//!
//! Cards are printed as grouped `label  value` sections; listings go through
//! the column-driven [`Table`].

use lexrisk_core::table::{Align, Column, Table};
use lexrisk_core::{AnalysisResult, CompanyProfile, EmailDraft, WizardView};
use lexrisk_store::{Attorney, Customer, KnowledgeSource, ReportSummary};

const LABEL_WIDTH: usize = 18;
const MAX_RISKS: usize = 10;

// ── Wizard views ──

pub fn print_view_banner(from: WizardView, to: WizardView) {
    println!();
    println!("── {} → {} ──", title_case(&from.to_string()), title_case(&to.to_string()));
}

pub fn print_form(profile: &CompanyProfile) {
    println!("=== New Analysis ===");
    println!();
    field("Company name", &profile.company_name);
    field("Company email", &profile.company_email);
    field("Company phone", &profile.company_phone);
    field("Practice area", &profile.practice_area);
}

/// Print an analysis result as a report card.
pub fn print_report(profile: &CompanyProfile, result: &AnalysisResult) {
    let company = if profile.company_name.trim().is_empty() {
        "Unnamed company"
    } else {
        profile.company_name.as_str()
    };
    println!("=== {company} ===");
    if !profile.practice_area.is_empty() {
        println!("{} risk analysis", profile.practice_area);
    }
    println!();

    println!("Confidence");
    field("Score", &format!("{}%  {}", result.score, meter(result.score)));
    println!();

    if !result.risks.is_empty() {
        println!("Key Risks");
        for risk in result.risks.iter().take(MAX_RISKS) {
            println!("  • {risk}");
        }
        if result.risks.len() > MAX_RISKS {
            println!("  … and {} more", result.risks.len() - MAX_RISKS);
        }
        println!();
    }

    let attorney = &result.attorney;
    println!("Recommended Attorney");
    field(
        "Name",
        &if attorney.name.is_empty() {
            format!("[{}]", attorney.initials)
        } else {
            format!("[{}] {}", attorney.initials, attorney.name)
        },
    );
    field("Title", &attorney.title);
    field("Past matters", &attorney.past_matters.to_string());
    if let Some(email) = &attorney.email {
        field("Email", email);
    }
    println!();

    if !result.evidence.is_empty() {
        println!("Evidence");
        for evidence in &result.evidence {
            let action = format!("{:?}", evidence.action);
            match &evidence.url {
                Some(url) => println!("  {:<width$} [{action}] {url}", evidence.label, width = LABEL_WIDTH),
                None => println!("  {:<width$} [{action}]", evidence.label, width = LABEL_WIDTH),
            }
        }
        println!();
    }
}

pub fn print_draft(draft: &EmailDraft) {
    println!("=== Email Draft ===");
    field("To", draft.to.as_deref().unwrap_or("(not set)"));
    field("Subject", &draft.subject);
    println!();
    for line in draft.body.lines() {
        println!("  {line}");
    }
    println!();
}

// ── Directory cards ──

pub fn print_attorney(attorney: &Attorney) {
    println!("=== [{}] {} ===", attorney.initials, attorney.name);
    println!("{}", attorney.role);
    println!();

    field("Practice area", &attorney.practice_area);
    field("Past matters", &attorney.past_matters.to_string());
    field("Email", &attorney.email);
    field("Phone", &attorney.phone);
    field("Location", &attorney.location);
    if !attorney.expertise.is_empty() {
        field("Expertise", &attorney.expertise.join(", "));
    }
    if !attorney.about.is_empty() {
        println!();
        println!("About");
        println!("  {}", attorney.about);
    }
}

pub fn print_customer(customer: &Customer) {
    println!("=== {} ===", customer.name);
    println!();
    field("Industry", &customer.industry);
    field("Contact", &customer.contact_email);
    field("Open matters", &customer.open_matters.to_string());
}

// ── Tables ──

pub fn attorney_table<'a>() -> Table<&'a Attorney> {
    Table::new(vec![
        Column::new("id", "ID").align(Align::Right),
        Column::new("name", "Name").sortable(),
        Column::new("role", "Role").sortable(),
        Column::new("practice_area", "Practice Area").sortable(),
        Column::new("past_matters", "Matters").sortable().align(Align::Right),
        Column::new("email", "Email"),
    ])
}

pub fn report_table<'a>() -> Table<&'a ReportSummary> {
    Table::new(vec![
        Column::new("id", "ID").align(Align::Right),
        Column::new("company_name", "Company").sortable().width(28),
        Column::new("practice_area", "Practice Area").sortable(),
        Column::<&ReportSummary>::new("date", "Date")
            .sortable()
            .render(|r| r.display_date()),
        Column::<&ReportSummary>::new("confidence", "Confidence")
            .sortable()
            .align(Align::Right)
            .render(|r| format!("{}%", r.confidence)),
    ])
}

pub fn customer_table<'a>() -> Table<&'a Customer> {
    Table::new(vec![
        Column::new("id", "ID").align(Align::Right),
        Column::new("name", "Name").sortable(),
        Column::new("industry", "Industry").sortable(),
        Column::new("contact_email", "Contact"),
        Column::new("open_matters", "Open").sortable().align(Align::Right),
    ])
}

pub fn knowledge_table<'a>() -> Table<&'a KnowledgeSource> {
    Table::new(vec![
        Column::new("id", "ID").align(Align::Right),
        Column::new("title", "Title"),
        Column::new("kind", "Kind"),
        Column::new("url", "URL"),
    ])
}

// ── Helpers ──

fn field(label: &str, value: &str) {
    if !value.is_empty() {
        println!("  {label:<LABEL_WIDTH$} {value}");
    }
}

fn meter(score: u8) -> String {
    let filled = usize::from(score) / 5;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(20 - filled))
}

fn title_case(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
