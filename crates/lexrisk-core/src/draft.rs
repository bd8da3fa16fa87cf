//! Follow-up email drafted to the recommended attorney.

use serde::{Deserialize, Serialize};

use crate::analysis::AnalysisResult;
use crate::profile::CompanyProfile;

/// Subject and body of the follow-up email.
///
/// Seeded once when the email view opens; after that each field is edited
/// independently and never re-derived from the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub to: Option<String>,
    pub subject: String,
    pub body: String,
}

impl EmailDraft {
    /// Seed a draft from an analysis.
    ///
    /// The server's `email_template` wins when present; otherwise the body is
    /// built from the profile, the attorney and the listed risks.
    pub fn seed(profile: &CompanyProfile, result: &AnalysisResult) -> Self {
        let body = match &result.email_template {
            Some(template) if !template.trim().is_empty() => template.clone(),
            _ => default_body(profile, result),
        };
        Self {
            to: result.attorney.email.clone(),
            subject: subject_for(&profile.company_name),
            body,
        }
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_body(&mut self, body: impl Into<String>) {
        self.body = body.into();
    }
}

fn company_or_placeholder(company_name: &str) -> &str {
    let name = company_name.trim();
    if name.is_empty() { "the company" } else { name }
}

pub fn subject_for(company_name: &str) -> String {
    format!(
        "Re: Compliance risks identified for {}",
        company_or_placeholder(company_name)
    )
}

fn default_body(profile: &CompanyProfile, result: &AnalysisResult) -> String {
    let company = company_or_placeholder(&profile.company_name);
    let greeting = result
        .attorney
        .name
        .split_whitespace()
        .next()
        .unwrap_or("there");

    let mut body = format!("Hi {greeting},\n\n");
    if result.risks.is_empty() {
        body.push_str(&format!(
            "Our analysis for {company} is ready for review.\n"
        ));
    } else {
        let noun = if result.risks.len() == 1 { "risk" } else { "risks" };
        body.push_str(&format!(
            "Our analysis for {company} identified {} key {noun}:\n",
            result.risks.len()
        ));
        for risk in &result.risks {
            body.push_str(&format!("• {risk}\n"));
        }
    }

    let area = profile.practice_area.trim();
    if area.is_empty() {
        body.push_str(
            "\nBased on your experience, you appear to be the best internal expert to support this matter.\n",
        );
    } else {
        body.push_str(&format!(
            "\nBased on your experience in {area}, you appear to be the best internal expert to support this matter.\n"
        ));
    }
    body.push_str("\nPlease let me know if you'd like a meeting arranged.\n\nRegards,");
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::AttorneyRecommendation;

    fn profile() -> CompanyProfile {
        CompanyProfile::new("Acme", "a@b.com", "555-1234", "Regulatory & Compliance Law")
    }

    fn result() -> AnalysisResult {
        AnalysisResult {
            score: 88,
            risks: vec!["Environmental permit gaps".into(), "Supplier contract exposure".into()],
            attorney: AttorneyRecommendation {
                name: "Jane Doe".into(),
                initials: "JD".into(),
                email: Some("jane.doe@firm.example".into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn template_wins_when_present() {
        let mut res = result();
        res.email_template = Some("Server supplied body".into());
        let draft = EmailDraft::seed(&profile(), &res);
        assert_eq!(draft.body, "Server supplied body");
        assert_eq!(draft.subject, "Re: Compliance risks identified for Acme");
        assert_eq!(draft.to.as_deref(), Some("jane.doe@firm.example"));
    }

    #[test]
    fn default_body_lists_risks() {
        let draft = EmailDraft::seed(&profile(), &result());
        assert!(draft.body.starts_with("Hi Jane,\n\n"));
        assert!(draft.body.contains("identified 2 key risks:"));
        assert!(draft.body.contains("• Environmental permit gaps\n"));
        assert!(draft.body.contains("experience in Regulatory & Compliance Law"));
        assert!(draft.body.ends_with("Regards,"));
    }

    #[test]
    fn seeding_is_deterministic() {
        assert_eq!(
            EmailDraft::seed(&profile(), &result()),
            EmailDraft::seed(&profile(), &result())
        );
    }

    #[test]
    fn blank_company_and_attorney() {
        let draft = EmailDraft::seed(&CompanyProfile::default(), &AnalysisResult::default());
        assert_eq!(draft.subject, "Re: Compliance risks identified for the company");
        assert!(draft.body.starts_with("Hi there,"));
        assert!(draft.body.contains("is ready for review"));
    }

    #[test]
    fn blank_template_falls_back() {
        let mut res = result();
        res.email_template = Some("   ".into());
        let draft = EmailDraft::seed(&profile(), &res);
        assert!(draft.body.starts_with("Hi Jane,"));
    }
}
