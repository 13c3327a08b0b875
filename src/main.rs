use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use anyhow::Context;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use shop_report::config::Config;
use shop_report::middleware::{json_error_handler, ErrorHandler, RequestId};
use shop_report::modules::{health, metrics::MySqlMetricsRepository, reports, stores::MySqlAccountRepository};
use shop_report::reports::{ReportService, XlsxSink};

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("shop_report={},actix_web=info", config.app.log_level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config
        .validate()
        .context("Configuration validation failed")?;

    init_tracing(&config);

    tracing::info!("Starting shop report service");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    config
        .report
        .ensure_output_dir()
        .context("Failed to create report output directory")?;
    tracing::info!("Reports written to {}", config.report.output_dir.display());

    let db_pool = config
        .database
        .create_pool()
        .await
        .context("Failed to create database pool")?;

    tracing::info!(
        "Database pool initialized ({}..{} connections)",
        config.database.pool_size,
        config.database.max_connections
    );

    let report_service = Arc::new(ReportService::new(
        Arc::new(MySqlMetricsRepository::new(db_pool.clone())),
        Arc::new(MySqlAccountRepository::new(db_pool.clone())),
        Arc::new(XlsxSink::new()),
        &config.report,
    ));

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(ErrorHandler)
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .wrap(Cors::permissive())
            .app_data(web::Data::new(db_pool.clone()))
            .app_data(web::Data::new(report_service.clone()))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .configure(health::configure)
            .configure(reports::configure)
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await.context("HTTP server terminated")?;
    Ok(())
}
