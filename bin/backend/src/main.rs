//! mealshare backend
//!
//! Reads configuration from the environment, migrates the schema, and
//! serves the HTTP API on BIND_ADDR (e.g. 0.0.0.0:8888).

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mealshare_core::log();
    let config = mealshare_core::Config::from_env();
    log::info!("database {} · cache {}", redact(&config.database), config.redis);
    mealshare_server::run(&config).await
}

/// Connection string without its credentials.
fn redact(url: &str) -> &str {
    url.rsplit_once('@').map(|(_, host)| host).unwrap_or(url)
}
