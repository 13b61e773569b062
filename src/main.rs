use actix_web::{web, App, HttpServer};
use billing_engine::config::{AppConfig, Config, LogFormat};
use billing_engine::invoices::DocumentCalculationService;
use billing_engine::middleware::{RateLimiter, RequestId};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(app: &AppConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("billing_engine={},actix_web=info", app.log_level))
    });
    let registry = tracing_subscriber::registry().with(filter);

    match app.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration
    let config = Config::from_env().map_err(std::io::Error::other)?;
    config.validate().map_err(std::io::Error::other)?;

    init_tracing(&config.app);

    tracing::info!("Starting billing engine");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let limits = config.limits.clone();
    let rate_limiter =
        RateLimiter::new(limits.rate_limit_per_minute).map_err(std::io::Error::other)?;
    let documents = web::Data::new(DocumentCalculationService::new(limits.clone()));
    let limits = web::Data::new(limits);

    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        App::new()
            .wrap(rate_limiter.clone())
            .wrap(RequestId)
            .wrap(TracingLogger::default())
            .app_data(limits.clone())
            .app_data(documents.clone())
            .configure(billing_engine::configure_routes)
    })
    .workers(config.server.workers)
    .bind(&bind_address)?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await
}
