use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCandidateRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use candidate_intake::config::AppConfig;
use candidate_intake::error::AppError;
use candidate_intake::intake::{CandidateIntakeService, CandidateValidator};
use candidate_intake::lookup::{MokaLookupCache, PostalLookupService, RetryPolicy, ViaCepClient};
use candidate_intake::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let client = ViaCepClient::from_config(&config.lookup)?;
    let lookup_service = Arc::new(PostalLookupService::new(
        Arc::new(client),
        Arc::new(MokaLookupCache::from_config(&config.lookup)),
        RetryPolicy::from(&config.lookup),
    ));

    let repository = Arc::new(InMemoryCandidateRepository::default());
    let intake_service = Arc::new(CandidateIntakeService::new(
        repository,
        CandidateValidator::from_config(&config.intake),
    ));

    let app = with_service_routes(
        lookup_service,
        intake_service,
        config.intake.secure_cookies,
    )
    .layer(Extension(app_state))
    .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        upstream = %config.lookup.base_url,
        "candidate intake service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
