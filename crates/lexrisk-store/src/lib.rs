//! Directory layer: attorneys, past reports, customers and knowledge sources, held in memory.

mod directory;
mod error;

pub use directory::{
    Attorney, AttorneyFilter, Customer, Directory, KnowledgeKind, KnowledgeSource, ReportOrder,
    ReportQuery, ReportSummary,
};
pub use error::StoreError;
