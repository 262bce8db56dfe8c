use tradein_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    tradein_api::telemetry::init_telemetry();

    // Initialize the application (storage, mailer, routes)
    let (_state, router) = tradein_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    tradein_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
