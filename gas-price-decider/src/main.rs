use actix_web::{web, App, HttpServer};
use gas_price_decider::{api, config, decider, logging};
use tracing_actix_web::TracingLogger;

/// Application entry point
///
/// Sets up logging, loads configuration, builds the configured gas price
/// decider once and serves it over HTTP.
#[actix_web::main]
async fn main() -> eyre::Result<()> {
    // Crate level from RUST_LOG (info when unset); dependencies stay quiet
    logging::init()?;

    // Load configuration from environment variables
    let config = config::Config::from_env()?;

    // One decider for the whole process, shared between workers
    let decider = decider::from_config(&config);

    HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(decider.clone()))
            .configure(api::configure)
    })
    .workers(4)
    .bind(format!("{}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}
