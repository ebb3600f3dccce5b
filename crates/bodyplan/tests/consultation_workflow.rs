//! End-to-end consultation scenarios driven through the public service facade and router.

mod common {
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    use bodyplan::workflows::consultation::{
        ConsultationId, ConsultationRecord, ConsultationRepository, ConsultationRequest,
        ConsultationService, RepositoryError, RuleCatalog,
    };

    #[derive(Default)]
    pub(super) struct BTreeRepository {
        records: Mutex<BTreeMap<ConsultationId, ConsultationRecord>>,
    }

    impl ConsultationRepository for BTreeRepository {
        fn insert(
            &self,
            record: ConsultationRecord,
        ) -> Result<ConsultationRecord, RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            if guard.contains_key(&record.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(record.id.clone(), record.clone());
            Ok(record)
        }

        fn update(&self, record: ConsultationRecord) -> Result<(), RepositoryError> {
            let mut guard = self.records.lock().expect("repository mutex poisoned");
            match guard.get_mut(&record.id) {
                Some(existing) => {
                    *existing = record;
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
        }

        fn fetch(
            &self,
            id: &ConsultationId,
        ) -> Result<Option<ConsultationRecord>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn list(&self) -> Result<Vec<ConsultationRecord>, RepositoryError> {
            let guard = self.records.lock().expect("repository mutex poisoned");
            Ok(guard.values().cloned().collect())
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

    pub(super) fn service(
        catalog: Arc<RuleCatalog>,
    ) -> ConsultationService<BTreeRepository, RuleCatalog> {
        ConsultationService::new(Arc::new(BTreeRepository::default()), catalog)
    }
}

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use bodyplan::workflows::consultation::{
    consultation_router, BmiCategory, BodyFatCategory, Combination, ConsultationServiceError,
    ConsultationStatus, ConsultationUpdate, ProgramCode, RuleCatalog,
};
use common::{request, service};
use tower::ServiceExt;

#[test]
fn underweight_low_fat_male_receives_p1() {
    let service = service(Arc::new(RuleCatalog::seeded()));

    let record = service
        .submit(request(55.0, 175.0, 8.0, "male"))
        .expect("submission succeeds");
    let decision = record.decision();

    assert_eq!(decision.bmi(), 17.96);
    assert_eq!(decision.bmi_category(), BmiCategory::Underweight);
    assert_eq!(decision.body_fat_category(), BodyFatCategory::Low);
    assert_eq!(decision.program_code(), &ProgramCode::new("P1"));
    assert!(!decision.is_default());
}

#[test]
fn obese_high_fat_female_receives_p4_without_edge_case() {
    let service = service(Arc::new(RuleCatalog::seeded()));

    let record = service
        .submit(request(90.0, 160.0, 35.0, "female"))
        .expect("submission succeeds");
    let decision = record.decision();

    assert_eq!(decision.bmi(), 35.16);
    assert_eq!(decision.program_code(), &ProgramCode::new("P4"));
    assert!(decision.edge_case().is_none());
}

#[test]
fn deactivated_rule_yields_default_program_flag() {
    let catalog = Arc::new(RuleCatalog::seeded());
    catalog
        .set_rule_active(
            Combination::new(BmiCategory::Ideal, BodyFatCategory::Normal),
            false,
        )
        .expect("toggle succeeds");
    let service = service(catalog);

    let record = service
        .submit(request(70.0, 175.0, 15.0, "male"))
        .expect("submission succeeds");

    assert_eq!(record.decision().program_code(), &ProgramCode::new("P2"));
    assert!(record.decision().is_default());
}

#[test]
fn decision_survives_lifecycle_updates() {
    let service = service(Arc::new(RuleCatalog::seeded()));
    let record = service
        .submit(request(100.0, 170.0, 15.0, "male"))
        .expect("submission succeeds");

    let updated = service
        .update(
            &record.id,
            ConsultationUpdate {
                notes: Some("switched to evening sessions".to_string()),
                status: Some(ConsultationStatus::Completed),
            },
        )
        .expect("update succeeds");

    assert_eq!(updated.decision(), record.decision());
    let audit = updated.decision().edge_case().expect("edge case kept");
    assert_eq!(audit.original_combination.to_string(), "Obese-Normal");
}

#[test]
fn removed_default_program_surfaces_as_configuration_error() {
    let catalog = Arc::new(RuleCatalog::seeded());
    catalog
        .set_rule_active(
            Combination::new(BmiCategory::Overweight, BodyFatCategory::High),
            false,
        )
        .expect("toggle succeeds");
    catalog
        .remove_program(&ProgramCode::new("P2"))
        .expect("removal succeeds");
    let service = service(catalog);

    match service.submit(request(85.0, 175.0, 28.0, "male")) {
        Err(ConsultationServiceError::Resolution(error)) => assert!(error.is_configuration()),
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert!(service.list().expect("list succeeds").is_empty());
}

#[tokio::test]
async fn router_round_trip_submit_then_fetch() {
    let service = Arc::new(service(Arc::new(RuleCatalog::seeded())));
    let app = consultation_router(service);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/consultations")
                .header("content-type", "application/json")
                .body(Body::from(
                    r#"{"weightKg":55,"heightCm":175,"bodyFatPercent":8,"sex":"male","notes":"intake"}"#,
                ))
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let created: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
    let id = created["id"].as_str().expect("id present").to_string();

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/consultations/{id}"))
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("router responds");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let fetched: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");

    assert_eq!(fetched["programCode"], "P1");
    assert_eq!(fetched["notes"], "intake");
    assert_eq!(fetched["bmi"], created["bmi"]);
}
