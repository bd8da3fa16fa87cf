pub mod analysis;
pub mod draft;
pub mod location;
pub mod profile;
pub mod select;
pub mod table;
pub mod upload;
pub mod validation;

pub use analysis::{
    AnalysisResult, AttorneyRecommendation, EvidenceAction, EvidenceRef, RawAnalysis, initials,
    normalize,
};
pub use draft::EmailDraft;
pub use location::{Location, WizardView};
pub use profile::{AnalysisOptions, CompanyProfile, PRACTICE_AREAS, ProfileField, RiskAnalysisRequest};
pub use validation::{FieldError, FieldErrorKind, ValidationError, is_valid_email, validate};
