use crate::cli::ServeArgs;
use crate::infra::{load_catalog, AppState, InMemoryConsultationRepository};
use crate::routes::with_consultation_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use bodyplan::config::AppConfig;
use bodyplan::error::AppError;
use bodyplan::telemetry;
use bodyplan::workflows::consultation::{ConsultationService, MissingCombinationsReport};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(path) = args.rules_csv.take() {
        config.rules.overrides_csv = Some(path);
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let catalog = load_catalog(config.rules.overrides_csv.as_deref())?;
    let coverage = MissingCombinationsReport::build(catalog.as_ref())?;
    if !coverage.is_complete() {
        warn!(
            missing = coverage.missing.len(),
            "some realistic combinations have no active rule; the default program will be used"
        );
    }

    let repository = Arc::new(InMemoryConsultationRepository::default());
    let consultation_service = Arc::new(ConsultationService::new(repository, catalog));

    let app = with_consultation_routes(consultation_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "program assignment service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
