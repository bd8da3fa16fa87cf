//! Risk-analysis results: the raw server shape and its normalized display model.

use serde::{Deserialize, Serialize};

/// Stand-in for the attorney's matter count until the API returns one.
// TODO: source from the attorney directory once risk-analysis responses carry matter counts.
pub const PLACEHOLDER_PAST_MATTERS: u32 = 18;

/// Title used when the server omits the attorney's role.
pub const DEFAULT_ATTORNEY_TITLE: &str = "Associate";

/// Initials used when the server omits the attorney's name.
pub const FALLBACK_INITIALS: &str = "XX";

/// Response body of `POST /api/v1/risk-analysis`.
///
/// Every field is optional; missing fields normalize to defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAnalysis {
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub risks: Option<Vec<String>>,
    #[serde(default)]
    pub recommended_attorney: Option<RawAttorney>,
    #[serde(default)]
    pub references: Option<Vec<RawReference>>,
    #[serde(default)]
    pub email_template: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAttorney {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawReference {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvidenceAction {
    View,
    Open,
}

/// A supporting document or source cited by the analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceRef {
    pub label: String,
    pub action: EvidenceAction,
    pub url: Option<String>,
}

/// The internal attorney the analysis recommends for the matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttorneyRecommendation {
    pub name: String,
    pub title: String,
    pub initials: String,
    pub past_matters: u32,
    pub email: Option<String>,
}

impl Default for AttorneyRecommendation {
    fn default() -> Self {
        Self {
            name: String::new(),
            title: DEFAULT_ATTORNEY_TITLE.to_string(),
            initials: FALLBACK_INITIALS.to_string(),
            past_matters: PLACEHOLDER_PAST_MATTERS,
            email: None,
        }
    }
}

/// Normalized analysis shown on the report view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Confidence score, 0 to 100.
    pub score: u8,
    pub risks: Vec<String>,
    pub attorney: AttorneyRecommendation,
    pub evidence: Vec<EvidenceRef>,
    pub email_template: Option<String>,
}

/// Round a confidence value into the 0..=100 display range.
///
/// NaN maps to 0.
pub fn score_from_confidence(confidence: f64) -> u8 {
    confidence.round().clamp(0.0, 100.0) as u8
}

/// Derive display initials from an attorney name.
///
/// "Jane Doe" → "JD", "Cher" → "CH", blank → "XX".
pub fn initials(name: Option<&str>) -> String {
    let mut tokens = name.unwrap_or_default().split_whitespace();
    let Some(first) = tokens.next() else {
        return FALLBACK_INITIALS.to_string();
    };

    let out: String = match tokens.next() {
        Some(second) => first.chars().take(1).chain(second.chars().take(1)).collect(),
        None => first.chars().take(2).collect(),
    };
    out.to_uppercase()
}

/// Map a raw server response into the display model. Never fails.
pub fn normalize(raw: RawAnalysis) -> AnalysisResult {
    let attorney = raw.recommended_attorney.unwrap_or_default();
    let name = attorney.name.unwrap_or_default();

    let evidence = raw
        .references
        .unwrap_or_default()
        .into_iter()
        .map(|r| EvidenceRef {
            label: r.label.unwrap_or_default(),
            action: EvidenceAction::View,
            url: r.url,
        })
        .collect();

    AnalysisResult {
        score: score_from_confidence(raw.confidence_score.unwrap_or(0.0)),
        risks: raw.risks.unwrap_or_default(),
        attorney: AttorneyRecommendation {
            initials: initials(Some(name.as_str())),
            name,
            title: attorney
                .role
                .unwrap_or_else(|| DEFAULT_ATTORNEY_TITLE.to_string()),
            past_matters: PLACEHOLDER_PAST_MATTERS,
            email: attorney.email,
        },
        evidence,
        email_template: raw.email_template,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initials_rules() {
        assert_eq!(initials(Some("Jane Doe")), "JD");
        assert_eq!(initials(Some("Cher")), "CH");
        assert_eq!(initials(Some("a. k. raman")), "AK");
        assert_eq!(initials(Some("  Mary   Ann  Smith ")), "MA");
        assert_eq!(initials(Some("Q")), "Q");
        assert_eq!(initials(Some("")), "XX");
        assert_eq!(initials(Some("   ")), "XX");
        assert_eq!(initials(None), "XX");
    }

    #[test]
    fn empty_response_normalizes_to_defaults() {
        let raw: RawAnalysis = serde_json::from_str("{}").unwrap();
        let result = normalize(raw);
        assert_eq!(result.score, 0);
        assert!(result.risks.is_empty());
        assert!(result.evidence.is_empty());
        assert_eq!(result.attorney.initials, "XX");
        assert_eq!(result.attorney.title, "Associate");
        assert_eq!(result.email_template, None);
    }

    #[test]
    fn null_fields_are_tolerated() {
        let raw: RawAnalysis = serde_json::from_str(
            r#"{"confidence_score": null, "risks": null, "recommended_attorney": {"name": null}, "references": null, "extra": 1}"#,
        )
        .unwrap();
        let result = normalize(raw);
        assert_eq!(result.score, 0);
        assert_eq!(result.attorney.initials, "XX");
    }

    #[test]
    fn full_response_normalizes() {
        let raw: RawAnalysis = serde_json::from_str(
            r#"{
                "confidence_score": 87.6,
                "risks": ["r1"],
                "recommended_attorney": {"name": "A B", "role": "Counsel"},
                "references": [{"label": "doc1"}]
            }"#,
        )
        .unwrap();
        let result = normalize(raw);
        assert_eq!(
            result,
            AnalysisResult {
                score: 88,
                risks: vec!["r1".into()],
                attorney: AttorneyRecommendation {
                    name: "A B".into(),
                    title: "Counsel".into(),
                    initials: "AB".into(),
                    past_matters: 18,
                    email: None,
                },
                evidence: vec![EvidenceRef {
                    label: "doc1".into(),
                    action: EvidenceAction::View,
                    url: None,
                }],
                email_template: None,
            }
        );
    }

    #[test]
    fn evidence_keeps_urls_and_order() {
        let raw = RawAnalysis {
            references: Some(vec![
                RawReference {
                    label: Some("10-K filing".into()),
                    url: Some("https://example.com/10k".into()),
                },
                RawReference {
                    label: Some("Permit register".into()),
                    url: None,
                },
            ]),
            ..Default::default()
        };
        let result = normalize(raw);
        assert_eq!(result.evidence.len(), 2);
        assert_eq!(result.evidence[0].url.as_deref(), Some("https://example.com/10k"));
        assert!(result.evidence.iter().all(|e| e.action == EvidenceAction::View));
    }

    #[test]
    fn score_is_rounded_and_clamped() {
        assert_eq!(score_from_confidence(87.4), 87);
        assert_eq!(score_from_confidence(87.5), 88);
        assert_eq!(score_from_confidence(-3.0), 0);
        assert_eq!(score_from_confidence(140.0), 100);
        assert_eq!(score_from_confidence(f64::NAN), 0);
    }
}
