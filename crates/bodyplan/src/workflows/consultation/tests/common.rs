use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::workflows::consultation::catalog::RuleCatalog;
use crate::workflows::consultation::domain::{
    ConsultationId, ConsultationRequest, Measurements, ProgramCode, Sex,
};
use crate::workflows::consultation::engine::ProgramResolver;
use crate::workflows::consultation::repository::{
    ConsultationRecord, ConsultationRepository, RepositoryError,
};
use crate::workflows::consultation::service::ConsultationService;
use crate::workflows::consultation::store::{Program, Rule, RuleStore, StoreError};
use crate::workflows::consultation::Combination;

pub(super) fn measurements(
    weight_kg: f64,
    height_cm: f64,
    body_fat_percent: f64,
    sex: Sex,
) -> Measurements {
    Measurements {
        weight_kg,
        height_cm,
        body_fat_percent,
        sex,
    }
}

pub(super) fn request(
    weight_kg: f64,
    height_cm: f64,
    body_fat_percent: f64,
    sex: &str,
) -> ConsultationRequest {
    ConsultationRequest {
        weight_kg,
        height_cm,
        body_fat_percent,
        sex: Some(sex.to_string()),
        notes: None,
    }
}

/// 55 kg, 175 cm, 8 % male: Underweight-Low.
pub(super) fn underweight_lean_male() -> ConsultationRequest {
    request(55.0, 175.0, 8.0, "male")
}

/// 100 kg, 170 cm, 8 % male: BMI 34.6 with low body fat, an impossible combination.
pub(super) fn obese_low_fat_male() -> Measurements {
    measurements(100.0, 170.0, 8.0, Sex::Male)
}

pub(super) fn code(raw: &str) -> ProgramCode {
    ProgramCode::new(raw)
}

pub(super) fn seeded_catalog() -> Arc<RuleCatalog> {
    Arc::new(RuleCatalog::seeded())
}

pub(super) fn resolver(catalog: &Arc<RuleCatalog>) -> ProgramResolver<RuleCatalog> {
    ProgramResolver::new(catalog.clone())
}

pub(super) fn service_with(
    repository: Arc<MemoryRepository>,
    catalog: Arc<RuleCatalog>,
) -> ConsultationService<MemoryRepository, RuleCatalog> {
    ConsultationService::new(repository, catalog)
}

pub(super) async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    records: Arc<Mutex<HashMap<ConsultationId, ConsultationRecord>>>,
}

impl ConsultationRepository for MemoryRepository {
    fn insert(&self, record: ConsultationRecord) -> Result<ConsultationRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, record: ConsultationRecord) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            guard.insert(record.id.clone(), record);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &ConsultationId) -> Result<Option<ConsultationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<ConsultationRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.values().cloned().collect())
    }
}

pub(super) struct UnavailableRepository;

impl ConsultationRepository for UnavailableRepository {
    fn insert(&self, _record: ConsultationRecord) -> Result<ConsultationRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: ConsultationRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &ConsultationId) -> Result<Option<ConsultationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list(&self) -> Result<Vec<ConsultationRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) struct UnavailableStore;

impl RuleStore for UnavailableStore {
    fn active_rule(&self, _combination: Combination) -> Result<Option<Rule>, StoreError> {
        Err(StoreError::Unavailable("rules table offline".to_string()))
    }

    fn program(&self, _code: &ProgramCode) -> Result<Option<Program>, StoreError> {
        Err(StoreError::Unavailable("rules table offline".to_string()))
    }
}
