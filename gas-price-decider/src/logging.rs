use eyre::Result;
use tracing_subscriber::EnvFilter;

/// Level for this crate when RUST_LOG is not set
const DEFAULT_CRATE_DIRECTIVE: &str = "gas_price_decider=info";

/// Build the log filter for a RUST_LOG value
///
/// Without RUST_LOG our crate logs at info. Noisy dependencies are always
/// capped, whatever RUST_LOG says about them.
pub fn env_filter(rust_log: Option<&str>) -> Result<EnvFilter> {
    let mut filter = match rust_log.filter(|v| !v.trim().is_empty()) {
        Some(directives) => EnvFilter::new(directives),
        None => EnvFilter::default().add_directive(DEFAULT_CRATE_DIRECTIVE.parse()?),
    };
    for directive in ["actix_web=error", "hyper=warn", "reqwest=warn"] {
        filter = filter.add_directive(directive.parse()?);
    }
    Ok(filter)
}

/// Install the global fmt subscriber using RUST_LOG
pub fn init() -> Result<()> {
    let rust_log = std::env::var("RUST_LOG").ok();
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(rust_log.as_deref())?)
        .init();
    Ok(())
}
