//! Navigable-URL state: which wizard view is showing and the report parameters
//! needed to restore it from a deep link.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::warn;
use url::form_urlencoded;

/// The wizard screen currently on display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WizardView {
    #[default]
    Form,
    Report,
    EmailDraft,
}

impl WizardView {
    /// Value of the `view` query parameter; the form has none.
    pub fn query_value(self) -> Option<&'static str> {
        match self {
            WizardView::Form => None,
            WizardView::Report => Some("report"),
            WizardView::EmailDraft => Some("email"),
        }
    }

    pub fn from_query_value(value: &str) -> Option<Self> {
        match value {
            "report" => Some(WizardView::Report),
            "email" => Some(WizardView::EmailDraft),
            _ => None,
        }
    }
}

impl fmt::Display for WizardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WizardView::Form => "form",
            WizardView::Report => "report",
            WizardView::EmailDraft => "email draft",
        })
    }
}

/// Query parameters of the analysis page.
///
/// `company_email` and `company_phone` only pre-seed the form; the report
/// parameters are read when `view` is `report` or `email`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Location {
    pub view: Option<WizardView>,
    pub company_name: Option<String>,
    pub company_email: Option<String>,
    pub company_phone: Option<String>,
    pub practice_area: Option<String>,
    pub confidence: Option<f64>,
}

impl Location {
    /// Parse a query string. Accepts a bare query, one with a leading `?`,
    /// or a full URL / absolute path. A bare query is taken whole, so a raw
    /// `?` inside a value survives.
    ///
    /// Unknown views and unparsable confidences are dropped with a warning.
    pub fn parse(input: &str) -> Self {
        let has_prefix = input.starts_with('?') || input.starts_with('/') || input.contains("://");
        let query = match input.split_once('?') {
            Some((_, q)) if has_prefix => q,
            Some(_) => input,
            None if has_prefix => "",
            None => input,
        };
        let query = query.split('#').next().unwrap_or_default();

        let mut loc = Location::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            let value = value.into_owned();
            match key.as_ref() {
                "view" => {
                    loc.view = WizardView::from_query_value(&value);
                    if loc.view.is_none() {
                        warn!(view = %value, "ignoring unknown view in location");
                    }
                }
                "companyName" => loc.company_name = non_empty(value),
                "companyEmail" => loc.company_email = non_empty(value),
                "companyPhone" => loc.company_phone = non_empty(value),
                "practiceArea" => loc.practice_area = non_empty(value),
                "confidence" => match value.trim().parse::<f64>() {
                    Ok(c) if c.is_finite() => loc.confidence = Some(c),
                    _ => warn!(confidence = %value, "ignoring unparsable confidence in location"),
                },
                _ => {}
            }
        }
        loc
    }

    /// Does this location ask for a reconstructed report?
    pub fn is_deep_link(&self) -> bool {
        matches!(self.view, Some(WizardView::Report | WizardView::EmailDraft))
    }

    /// Serialize back into a query string (no leading `?`).
    pub fn to_query(&self) -> String {
        let mut ser = form_urlencoded::Serializer::new(String::new());
        if let Some(view) = self.view.and_then(WizardView::query_value) {
            ser.append_pair("view", view);
        }
        if let Some(name) = &self.company_name {
            ser.append_pair("companyName", name);
        }
        if let Some(email) = &self.company_email {
            ser.append_pair("companyEmail", email);
        }
        if let Some(phone) = &self.company_phone {
            ser.append_pair("companyPhone", phone);
        }
        if let Some(area) = &self.practice_area {
            ser.append_pair("practiceArea", area);
        }
        if let Some(confidence) = self.confidence {
            ser.append_pair("confidence", &format_confidence(confidence));
        }
        ser.finish()
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

fn format_confidence(confidence: f64) -> String {
    if confidence.fract() == 0.0 {
        format!("{}", confidence as i64)
    } else {
        confidence.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_report_deep_link() {
        let loc = Location::parse("?view=report&companyName=Acme&practiceArea=Compliance&confidence=92");
        assert_eq!(loc.view, Some(WizardView::Report));
        assert_eq!(loc.company_name.as_deref(), Some("Acme"));
        assert_eq!(loc.practice_area.as_deref(), Some("Compliance"));
        assert_eq!(loc.confidence, Some(92.0));
        assert!(loc.is_deep_link());
    }

    #[test]
    fn parses_full_url_and_encoding() {
        let loc = Location::parse(
            "https://app.example.com/new-analysis?view=email&companyName=Acme+%26+Sons&practiceArea=Tax%20Law#top",
        );
        assert_eq!(loc.view, Some(WizardView::EmailDraft));
        assert_eq!(loc.company_name.as_deref(), Some("Acme & Sons"));
        assert_eq!(loc.practice_area.as_deref(), Some("Tax Law"));
    }

    #[test]
    fn unknown_view_and_bad_confidence_are_dropped() {
        let loc = Location::parse("view=dashboard&confidence=high&companyName=Acme");
        assert_eq!(loc.view, None);
        assert_eq!(loc.confidence, None);
        assert!(!loc.is_deep_link());
        assert_eq!(loc.company_name.as_deref(), Some("Acme"));
    }

    #[test]
    fn form_pre_seed_fields() {
        let loc = Location::parse("companyName=Acme&companyEmail=a%40b.com&companyPhone=555");
        assert_eq!(loc.view, None);
        assert_eq!(loc.company_email.as_deref(), Some("a@b.com"));
        assert_eq!(loc.company_phone.as_deref(), Some("555"));
    }

    #[test]
    fn bare_query_keeps_raw_question_mark() {
        let loc = Location::parse("view=report&companyName=What?Co&confidence=70");
        assert_eq!(loc.view, Some(WizardView::Report));
        assert_eq!(loc.company_name.as_deref(), Some("What?Co"));
        assert_eq!(loc.confidence, Some(70.0));

        let loc = Location::parse("/new-analysis?companyName=What?Co");
        assert_eq!(loc.company_name.as_deref(), Some("What?Co"));
        assert_eq!(Location::parse("/new-analysis"), Location::default());
    }

    #[test]
    fn writes_query_in_stable_order() {
        let loc = Location {
            view: Some(WizardView::Report),
            company_name: Some("Acme & Sons".into()),
            practice_area: Some("IP".into()),
            confidence: Some(92.0),
            ..Default::default()
        };
        assert_eq!(
            loc.to_query(),
            "view=report&companyName=Acme+%26+Sons&practiceArea=IP&confidence=92"
        );
        assert_eq!(Location::parse(&loc.to_query()), loc);
    }

    #[test]
    fn form_view_has_no_view_param() {
        let loc = Location {
            view: Some(WizardView::Form),
            ..Default::default()
        };
        assert_eq!(loc.to_query(), "");
    }
}
