//! Analysis wizard: owns the visible view (form, report, email draft), the
//! company profile, the normalized analysis and the email draft, and mediates
//! every transition between them.

use std::fmt;
use std::path::Path;

use lexrisk_api::{AnalysisService, ApiError};
use lexrisk_core::analysis::score_from_confidence;
use lexrisk_core::upload::{Attachment, UploadError, UploadPolicy};
use lexrisk_core::{
    AnalysisOptions, AnalysisResult, CompanyProfile, EmailDraft, FieldError, Location,
    ProfileField, RawAnalysis, RiskAnalysisRequest, ValidationError, WizardView, normalize,
    validate,
};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Host of the (mocked) report share links.
pub const SHARE_LINK_BASE: &str = "https://afs.company.com/report";

/// A user action that moves between views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    RunAnalysis,
    DraftEmail,
    Back,
    ShareReport,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Action::RunAnalysis => "run analysis",
            Action::DraftEmail => "draft email",
            Action::Back => "go back",
            Action::ShareReport => "share report",
        })
    }
}

#[derive(Error, Debug)]
pub enum WizardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("analysis failed: {0}")]
    Analysis(#[from] ApiError),
    #[error(transparent)]
    Upload(#[from] UploadError),
    #[error("an analysis is already in progress")]
    Busy,
    #[error("cannot {action} from the {from} view")]
    InvalidTransition { from: WizardView, action: Action },
}

/// Issued by [`Wizard::begin_analysis`]; hand it back to
/// [`Wizard::finish_analysis`] with the outcome. Each ticket settles at most
/// one outcome.
#[derive(Debug, PartialEq, Eq)]
pub struct AnalysisTicket {
    generation: u64,
    pub request: RiskAnalysisRequest,
}

/// What happened to an analysis outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result was applied and the report is showing.
    Applied,
    /// The wizard was torn down or restarted while the request was out.
    Discarded,
}

/// Called after every view change. Receives only the two views, never the
/// state behind them.
pub trait TransitionHook: Send {
    fn on_transition(&mut self, from: WizardView, to: WizardView);
}

impl<F> TransitionHook for F
where
    F: FnMut(WizardView, WizardView) + Send,
{
    fn on_transition(&mut self, from: WizardView, to: WizardView) {
        self(from, to)
    }
}

/// One view change, timestamped by the wizard.
#[derive(Debug, Clone)]
pub struct TransitionRecord {
    pub from: WizardView,
    pub to: WizardView,
    pub at: chrono::DateTime<chrono::Utc>,
}

pub struct Wizard<B> {
    backend: B,
    view: WizardView,
    profile: CompanyProfile,
    options: AnalysisOptions,
    attachments: Vec<Attachment>,
    upload_policy: UploadPolicy,
    field_errors: Option<ValidationError>,
    result: Option<AnalysisResult>,
    draft: Option<EmailDraft>,
    last_error: Option<String>,
    in_flight: bool,
    generation: u64,
    hooks: Vec<Box<dyn TransitionHook>>,
    history: Vec<TransitionRecord>,
}

impl<B> Wizard<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            view: WizardView::Form,
            profile: CompanyProfile::default(),
            options: AnalysisOptions::default(),
            attachments: Vec::new(),
            upload_policy: UploadPolicy::default(),
            field_errors: None,
            result: None,
            draft: None,
            last_error: None,
            in_flight: false,
            generation: 0,
            hooks: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Restore a wizard from a navigable URL or query string.
    ///
    /// `view=report` or `view=email` rebuilds a display-only report from the
    /// company name, practice area and confidence; nothing is fetched. Other
    /// parameters only pre-seed the form.
    pub fn from_location(backend: B, query: &str) -> Self {
        let loc = Location::parse(query);
        let mut wizard = Self::new(backend);
        wizard.profile = CompanyProfile::new(
            loc.company_name.clone().unwrap_or_default(),
            loc.company_email.clone().unwrap_or_default(),
            loc.company_phone.clone().unwrap_or_default(),
            loc.practice_area.clone().unwrap_or_default(),
        );

        if let Some(view) = loc.view.filter(|_| loc.is_deep_link()) {
            let result = AnalysisResult {
                score: score_from_confidence(loc.confidence.unwrap_or(0.0)),
                ..AnalysisResult::default()
            };
            if view == WizardView::EmailDraft {
                wizard.draft = Some(EmailDraft::seed(&wizard.profile, &result));
            }
            wizard.result = Some(result);
            wizard.view = view;
            info!(
                view = %view,
                company = %wizard.profile.company_name,
                "restored wizard from deep link"
            );
        }
        wizard
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn add_hook(&mut self, hook: impl TransitionHook + 'static) {
        self.hooks.push(Box::new(hook));
    }

    pub fn view(&self) -> WizardView {
        self.view
    }

    pub fn profile(&self) -> &CompanyProfile {
        &self.profile
    }

    /// Edit one form field. Clears any validation error shown for it.
    pub fn set_field(&mut self, field: ProfileField, value: impl Into<String>) {
        self.profile.set(field, value);
        if let Some(errors) = &mut self.field_errors {
            errors.errors.retain(|e| e.field != field);
        }
        if self.field_errors.as_ref().is_some_and(|e| e.errors.is_empty()) {
            self.field_errors = None;
        }
    }

    pub fn field_error(&self, field: ProfileField) -> Option<&FieldError> {
        self.field_errors.as_ref().and_then(|e| e.for_field(field))
    }

    pub fn options(&self) -> AnalysisOptions {
        self.options
    }

    pub fn set_options(&mut self, options: AnalysisOptions) {
        self.options = options;
    }

    pub fn attachments(&self) -> &[Attachment] {
        &self.attachments
    }

    /// Add a supporting document after checking it against the upload policy.
    pub fn attach(&mut self, path: &Path) -> Result<(), WizardError> {
        let file = Attachment::from_path(path)?;
        self.upload_policy.validate(&file)?;
        debug!(name = %file.name, size = file.size, "attachment added");
        self.attachments.push(file);
        Ok(())
    }

    pub fn remove_attachment(&mut self, index: usize) -> Option<Attachment> {
        (index < self.attachments.len()).then(|| self.attachments.remove(index))
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        self.result.as_ref()
    }

    pub fn draft(&self) -> Option<&EmailDraft> {
        self.draft.as_ref()
    }

    pub fn edit_subject(&mut self, subject: impl Into<String>) {
        if let Some(draft) = &mut self.draft {
            draft.set_subject(subject);
        }
    }

    pub fn edit_body(&mut self, body: impl Into<String>) {
        if let Some(draft) = &mut self.draft {
            draft.set_body(body);
        }
    }

    /// User-facing message from the last failed analysis.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// True while an analysis request is out; the submit control is disabled.
    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    pub fn history(&self) -> &[TransitionRecord] {
        &self.history
    }

    /// The navigable URL state for the current view.
    pub fn location(&self) -> Location {
        match (self.view, &self.result) {
            (WizardView::Form, _) | (_, None) => Location::default(),
            (view, Some(result)) => Location {
                view: Some(view),
                company_name: non_blank(&self.profile.company_name),
                practice_area: non_blank(&self.profile.practice_area),
                confidence: Some(f64::from(result.score)),
                ..Location::default()
            },
        }
    }

    /// Validate the form and mark an analysis as in flight.
    pub fn begin_analysis(&mut self) -> Result<AnalysisTicket, WizardError> {
        if self.in_flight {
            return Err(WizardError::Busy);
        }
        self.expect_view(WizardView::Form, Action::RunAnalysis)?;

        if let Err(errors) = validate(&self.profile) {
            debug!(fields = errors.errors.len(), "form validation failed");
            self.field_errors = Some(errors.clone());
            return Err(errors.into());
        }
        self.field_errors = None;
        self.last_error = None;
        self.in_flight = true;

        Ok(AnalysisTicket {
            generation: self.generation,
            request: RiskAnalysisRequest::from(&self.profile),
        })
    }

    /// Apply the outcome of the request `ticket` was issued for.
    ///
    /// Outcomes for a ticket issued before the last [`unmount`](Self::unmount)
    /// or [`start_new`](Self::start_new), or for a ticket that already settled,
    /// are dropped without touching state.
    pub fn finish_analysis(
        &mut self,
        ticket: AnalysisTicket,
        outcome: Result<RawAnalysis, ApiError>,
    ) -> Result<Completion, WizardError> {
        if !self.in_flight || ticket.generation != self.generation {
            info!(
                ticket = ticket.generation,
                current = self.generation,
                in_flight = self.in_flight,
                "discarding stale analysis outcome"
            );
            return Ok(Completion::Discarded);
        }
        self.in_flight = false;
        self.generation += 1;

        match outcome {
            Ok(raw) => {
                let result = normalize(raw);
                info!(
                    company = %self.profile.company_name,
                    score = result.score,
                    risks = result.risks.len(),
                    "analysis applied"
                );
                self.result = Some(result);
                self.draft = None;
                self.transition(WizardView::Report);
                Ok(Completion::Applied)
            }
            Err(e) => {
                warn!(error = %e, "analysis failed");
                self.last_error = Some(e.user_message());
                Err(e.into())
            }
        }
    }

    /// Open the email draft, seeded fresh from the current report.
    pub fn draft_email(&mut self) -> Result<&EmailDraft, WizardError> {
        self.expect_view(WizardView::Report, Action::DraftEmail)?;
        let Some(result) = &self.result else {
            return Err(WizardError::InvalidTransition {
                from: self.view,
                action: Action::DraftEmail,
            });
        };
        let draft = EmailDraft::seed(&self.profile, result);
        self.transition(WizardView::EmailDraft);
        Ok(self.draft.insert(draft))
    }

    /// Report goes back to the form and drops the result; the email draft goes
    /// back to the report and drops the draft.
    pub fn back(&mut self) -> Result<WizardView, WizardError> {
        match self.view {
            WizardView::Report => {
                self.result = None;
                self.transition(WizardView::Form);
            }
            WizardView::EmailDraft => {
                self.draft = None;
                self.transition(WizardView::Report);
            }
            WizardView::Form => {
                return Err(WizardError::InvalidTransition {
                    from: WizardView::Form,
                    action: Action::Back,
                });
            }
        }
        Ok(self.view)
    }

    /// Clear everything and return to an empty form. Any analysis still in
    /// flight is abandoned.
    pub fn start_new(&mut self) {
        self.generation += 1;
        self.in_flight = false;
        self.profile = CompanyProfile::default();
        self.attachments.clear();
        self.field_errors = None;
        self.result = None;
        self.draft = None;
        self.last_error = None;
        if self.view != WizardView::Form {
            self.transition(WizardView::Form);
        }
    }

    /// The wizard is going away; late outcomes must not land.
    pub fn unmount(&mut self) {
        self.generation += 1;
        self.in_flight = false;
        debug!(generation = self.generation, "wizard unmounted");
    }

    /// Shareable link to the current report.
    pub fn share_link(&self) -> Result<String, WizardError> {
        if self.view == WizardView::Form || self.result.is_none() {
            return Err(WizardError::InvalidTransition {
                from: self.view,
                action: Action::ShareReport,
            });
        }
        let mut parts: Vec<String> = [&self.profile.company_name, &self.profile.practice_area]
            .into_iter()
            .map(|s| slug(s))
            .filter(|s| !s.is_empty())
            .collect();
        parts.push("analysis".to_string());
        Ok(format!("{SHARE_LINK_BASE}/{}", parts.join("-")))
    }

    fn expect_view(&self, view: WizardView, action: Action) -> Result<(), WizardError> {
        if self.view == view {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition {
                from: self.view,
                action,
            })
        }
    }

    fn transition(&mut self, to: WizardView) {
        let from = self.view;
        self.view = to;
        info!(from = %from, to = %to, "wizard transition");
        self.history.push(TransitionRecord {
            from,
            to,
            at: chrono::Utc::now(),
        });
        for hook in &mut self.hooks {
            hook.on_transition(from, to);
        }
    }
}

impl<B: AnalysisService> Wizard<B> {
    /// Validate, submit and apply in one step.
    pub async fn run_analysis(&mut self) -> Result<Completion, WizardError> {
        let ticket = self.begin_analysis()?;
        let outcome = self.backend.submit_analysis(&ticket.request).await;
        self.finish_analysis(ticket, outcome)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let v = value.trim();
    (!v.is_empty()).then(|| v.to_string())
}

fn slug(value: &str) -> String {
    value
        .split(|c: char| !c.is_alphanumeric())
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use lexrisk_core::FieldErrorKind;
    use lexrisk_core::analysis::{RawAttorney, RawReference};
    use lexrisk_core::{EvidenceAction, EvidenceRef};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct Stub {
        outcome: Result<RawAnalysis, ApiError>,
        calls: AtomicUsize,
    }

    impl Stub {
        fn ok(raw: RawAnalysis) -> Self {
            Self {
                outcome: Ok(raw),
                calls: AtomicUsize::new(0),
            }
        }

        fn err(e: ApiError) -> Self {
            Self {
                outcome: Err(e),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisService for Stub {
        async fn submit_analysis(
            &self,
            _request: &RiskAnalysisRequest,
        ) -> Result<RawAnalysis, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    fn acme_response() -> RawAnalysis {
        RawAnalysis {
            confidence_score: Some(87.6),
            risks: Some(vec!["r1".into()]),
            recommended_attorney: Some(RawAttorney {
                name: Some("A B".into()),
                role: Some("Counsel".into()),
                email: None,
            }),
            references: Some(vec![RawReference {
                label: Some("doc1".into()),
                url: None,
            }]),
            email_template: None,
        }
    }

    fn filled<B>(wizard: &mut Wizard<B>) {
        wizard.set_field(ProfileField::CompanyName, "Acme");
        wizard.set_field(ProfileField::CompanyEmail, "a@b.com");
        wizard.set_field(ProfileField::CompanyPhone, "555-1234");
        wizard.set_field(ProfileField::PracticeArea, "IP");
    }

    fn recorder<B>(wizard: &mut Wizard<B>) -> Arc<Mutex<Vec<(WizardView, WizardView)>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        wizard.add_hook(move |from, to| sink.lock().unwrap().push((from, to)));
        seen
    }

    #[tokio::test]
    async fn successful_analysis_shows_report() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);

        assert_eq!(w.run_analysis().await.unwrap(), Completion::Applied);
        assert_eq!(w.view(), WizardView::Report);
        assert!(!w.is_submitting());

        let result = w.result().unwrap();
        assert_eq!(result.score, 88);
        assert_eq!(result.risks, vec!["r1".to_string()]);
        assert_eq!(result.attorney.name, "A B");
        assert_eq!(result.attorney.title, "Counsel");
        assert_eq!(result.attorney.initials, "AB");
        assert_eq!(result.attorney.past_matters, 18);
        assert_eq!(
            result.evidence,
            vec![EvidenceRef {
                label: "doc1".into(),
                action: EvidenceAction::View,
                url: None,
            }]
        );
    }

    #[tokio::test]
    async fn network_failure_keeps_form_and_profile() {
        let mut w = Wizard::new(Stub::err(ApiError::Network("operation timed out".into())));
        filled(&mut w);
        let before = w.profile().clone();

        let err = w.run_analysis().await.unwrap_err();
        assert!(matches!(err, WizardError::Analysis(ApiError::Network(_))));
        assert_eq!(w.view(), WizardView::Form);
        assert_eq!(w.profile(), &before);
        assert!(w.result().is_none());
        assert!(!w.is_submitting());
        assert_eq!(
            w.last_error(),
            Some("No response from server. Please check your connection.")
        );
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let mut w = Wizard::new(Stub::err(ApiError::Server {
            status: 422,
            message: Some("Company not found".into()),
        }));
        filled(&mut w);
        w.run_analysis().await.unwrap_err();
        assert_eq!(w.last_error(), Some("Company not found"));
    }

    #[tokio::test]
    async fn invalid_form_never_calls_backend() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);
        w.set_field(ProfileField::CompanyEmail, "not-an-email");
        w.set_field(ProfileField::CompanyPhone, "");

        let err = w.run_analysis().await.unwrap_err();
        let WizardError::Validation(v) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(
            v.fields().collect::<Vec<_>>(),
            vec![ProfileField::CompanyEmail, ProfileField::CompanyPhone]
        );
        assert_eq!(w.backend().calls(), 0);
        assert_eq!(w.view(), WizardView::Form);
        assert_eq!(
            w.field_error(ProfileField::CompanyEmail).map(|e| e.kind),
            Some(FieldErrorKind::InvalidFormat)
        );

        // Editing a field clears only its own error.
        w.set_field(ProfileField::CompanyEmail, "a@b.com");
        assert!(w.field_error(ProfileField::CompanyEmail).is_none());
        assert!(w.field_error(ProfileField::CompanyPhone).is_some());
    }

    #[test]
    fn second_submit_while_in_flight_is_busy() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);

        let ticket = w.begin_analysis().unwrap();
        assert!(w.is_submitting());
        assert!(matches!(w.begin_analysis(), Err(WizardError::Busy)));

        let done = w.finish_analysis(ticket, Ok(acme_response())).unwrap();
        assert_eq!(done, Completion::Applied);
        assert!(!w.is_submitting());
    }

    #[test]
    fn settled_ticket_cannot_land_twice() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);

        let ticket = w.begin_analysis().unwrap();
        let replay = AnalysisTicket {
            generation: ticket.generation,
            request: ticket.request.clone(),
        };
        assert_eq!(
            w.finish_analysis(ticket, Ok(acme_response())).unwrap(),
            Completion::Applied
        );
        w.back().unwrap();

        let done = w.finish_analysis(replay, Ok(acme_response())).unwrap();
        assert_eq!(done, Completion::Discarded);
        assert_eq!(w.view(), WizardView::Form);
        assert!(w.result().is_none());
    }

    #[test]
    fn old_ticket_is_rejected_by_a_newer_submission() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);

        let first = w.begin_analysis().unwrap();
        let replay = AnalysisTicket {
            generation: first.generation,
            request: first.request.clone(),
        };
        w.finish_analysis(first, Err(ApiError::Network("reset".into())))
            .unwrap_err();

        let _second = w.begin_analysis().unwrap();
        let done = w.finish_analysis(replay, Ok(acme_response())).unwrap();
        assert_eq!(done, Completion::Discarded);
        assert!(w.is_submitting());
        assert_eq!(w.view(), WizardView::Form);
    }

    #[test]
    fn outcome_after_unmount_is_discarded() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);
        let seen = recorder(&mut w);

        let ticket = w.begin_analysis().unwrap();
        w.unmount();
        let done = w.finish_analysis(ticket, Ok(acme_response())).unwrap();

        assert_eq!(done, Completion::Discarded);
        assert_eq!(w.view(), WizardView::Form);
        assert!(w.result().is_none());
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn failure_after_start_new_is_discarded() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);

        let ticket = w.begin_analysis().unwrap();
        w.start_new();
        let done = w
            .finish_analysis(ticket, Err(ApiError::Network("reset".into())))
            .unwrap();
        assert_eq!(done, Completion::Discarded);
        assert_eq!(w.last_error(), None);
        assert_eq!(w.profile(), &CompanyProfile::default());
    }

    #[tokio::test]
    async fn back_from_report_discards_result() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);
        w.run_analysis().await.unwrap();

        assert_eq!(w.back().unwrap(), WizardView::Form);
        assert!(w.result().is_none());
        assert_eq!(w.profile().company_name, "Acme");
    }

    #[tokio::test]
    async fn back_from_draft_keeps_result() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);
        w.run_analysis().await.unwrap();
        w.draft_email().unwrap();

        assert_eq!(w.back().unwrap(), WizardView::Report);
        assert_eq!(w.result().unwrap().score, 88);
        assert!(w.draft().is_none());
    }

    #[tokio::test]
    async fn draft_reentry_reseeds_from_template() {
        let raw = RawAnalysis {
            email_template: Some("Template body".into()),
            ..acme_response()
        };
        let mut w = Wizard::new(Stub::ok(raw));
        filled(&mut w);
        w.run_analysis().await.unwrap();

        let seeded = w.draft_email().unwrap().clone();
        assert_eq!(seeded.body, "Template body");
        assert_eq!(seeded.subject, "Re: Compliance risks identified for Acme");

        w.edit_subject("Edited subject");
        w.edit_body("Edited body");
        assert_eq!(w.draft().unwrap().subject, "Edited subject");

        w.back().unwrap();
        let reseeded = w.draft_email().unwrap();
        assert_eq!(reseeded, &seeded);
    }

    #[test]
    fn invalid_transitions_leave_state_alone() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        assert!(matches!(
            w.back(),
            Err(WizardError::InvalidTransition {
                from: WizardView::Form,
                action: Action::Back
            })
        ));
        assert!(matches!(
            w.draft_email(),
            Err(WizardError::InvalidTransition {
                from: WizardView::Form,
                action: Action::DraftEmail
            })
        ));
        assert!(w.share_link().is_err());
        assert_eq!(w.view(), WizardView::Form);
        assert!(w.history().is_empty());
    }

    #[test]
    fn run_analysis_only_from_form() {
        let mut w = Wizard::from_location(
            Stub::ok(acme_response()),
            "?view=report&companyName=Acme&practiceArea=Compliance&confidence=92",
        );
        let err = w.begin_analysis().unwrap_err();
        assert_eq!(err.to_string(), "cannot run analysis from the report view");
    }

    #[test]
    fn deep_link_restores_report_without_network() {
        let w = Wizard::from_location(
            Stub::ok(acme_response()),
            "?view=report&companyName=Acme&practiceArea=Compliance&confidence=92",
        );
        assert_eq!(w.view(), WizardView::Report);
        assert_eq!(w.profile().company_name, "Acme");
        assert_eq!(w.profile().practice_area, "Compliance");
        assert_eq!(w.result().unwrap().score, 92);
        assert!(w.draft().is_none());
        assert_eq!(w.backend().calls(), 0);
    }

    #[test]
    fn deep_link_to_email_seeds_draft() {
        let w = Wizard::from_location(
            Stub::ok(acme_response()),
            "view=email&companyName=Acme&confidence=150",
        );
        assert_eq!(w.view(), WizardView::EmailDraft);
        assert_eq!(w.result().unwrap().score, 100);
        let draft = w.draft().unwrap();
        assert_eq!(draft.subject, "Re: Compliance risks identified for Acme");
    }

    #[test]
    fn form_deep_link_preseeds_fields() {
        let w = Wizard::from_location(
            Stub::ok(acme_response()),
            "/analysis?companyName=Acme%20Corp&companyEmail=a%40b.com&view=bogus",
        );
        assert_eq!(w.view(), WizardView::Form);
        assert_eq!(w.profile().company_name, "Acme Corp");
        assert_eq!(w.profile().company_email, "a@b.com");
        assert!(w.result().is_none());
    }

    #[tokio::test]
    async fn location_mirrors_view() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        filled(&mut w);
        assert_eq!(w.location().to_query(), "");

        w.run_analysis().await.unwrap();
        assert_eq!(
            w.location().to_query(),
            "view=report&companyName=Acme&practiceArea=IP&confidence=88"
        );

        w.draft_email().unwrap();
        assert_eq!(w.location().view, Some(WizardView::EmailDraft));

        // A mirrored location restores the same report.
        let restored = Wizard::from_location(Stub::ok(RawAnalysis::default()), &w.location().to_query());
        assert_eq!(restored.view(), WizardView::EmailDraft);
        assert_eq!(restored.result().unwrap().score, 88);
    }

    #[tokio::test]
    async fn hooks_see_every_transition() {
        let mut w = Wizard::new(Stub::ok(acme_response()));
        let seen = recorder(&mut w);
        filled(&mut w);

        w.run_analysis().await.unwrap();
        w.draft_email().unwrap();
        w.back().unwrap();
        w.start_new();

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                (WizardView::Form, WizardView::Report),
                (WizardView::Report, WizardView::EmailDraft),
                (WizardView::EmailDraft, WizardView::Report),
                (WizardView::Report, WizardView::Form),
            ]
        );
        assert_eq!(w.history().len(), 4);
    }

    #[test]
    fn share_link_slugs_company_and_area() {
        let w = Wizard::from_location(
            Stub::ok(acme_response()),
            "view=report&companyName=ABC%20Company&practiceArea=Compliance&confidence=70",
        );
        assert_eq!(
            w.share_link().unwrap(),
            "https://afs.company.com/report/abc-company-compliance-analysis"
        );
    }

    #[test]
    fn attachments_are_policy_checked() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = dir.path().join("brief.pdf");
        let txt = dir.path().join("notes.txt");
        std::fs::write(&pdf, b"%PDF-1.4").unwrap();
        std::fs::write(&txt, b"notes").unwrap();

        let mut w = Wizard::new(Stub::ok(acme_response()));
        w.attach(&pdf).unwrap();
        assert!(matches!(
            w.attach(&txt),
            Err(WizardError::Upload(UploadError::UnsupportedType { .. }))
        ));
        assert_eq!(w.attachments().len(), 1);
        assert_eq!(w.remove_attachment(0).unwrap().name, "brief.pdf");
        assert!(w.remove_attachment(0).is_none());
    }
}
