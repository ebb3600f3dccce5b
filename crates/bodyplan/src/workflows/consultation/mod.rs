//! Body-measurement consultations: classification, rule resolution, and decision records.
//!
//! Measurements pass through the intake guard, are classified into a BMI and body-fat
//! combination, impossible combinations are redirected, and the active rule set picks the
//! program. The resulting [`DecisionRecord`] is handed to a [`ConsultationRepository`].

pub mod catalog;
pub mod domain;
pub mod engine;
pub mod intake;
pub mod report;
pub mod repository;
pub mod router;
pub mod service;
pub mod store;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, RuleCatalog};
pub use domain::{
    BmiCategory, BodyFatCategory, Combination, ConsultationId, ConsultationRequest,
    ConsultationStatus, Measurements, ProgramCode, Sex,
};
pub use engine::{
    DecisionRecord, EdgeCaseAudit, ProgramResolver, RealisticCombination, ResolutionError,
    RuleTable, DEFAULT_PROGRAM_CODE,
};
pub use intake::{IntakeBounds, IntakeGuard, IntakeViolation};
pub use report::MissingCombinationsReport;
pub use repository::{
    ConsultationRecord, ConsultationRepository, ConsultationUpdate, ConsultationView,
    RepositoryError,
};
pub use router::consultation_router;
pub use service::{ConsultationService, ConsultationServiceError};
pub use store::{Program, Rule, RuleStore, StoreError};
