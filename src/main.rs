//! Autoescuela CRM server
//!
//! Loads the configuration, opens the JSON data file and serves the API.

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use autoescuela_crm::database::Database;
use autoescuela_crm::services::{AuthService, Clock, CrmStore};
use autoescuela_crm::{create_router, logging, seed, AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env().context("Invalid configuration")?;

    logging::init_logging(&config);
    logging::log_startup();
    config.log_summary();

    let clock = Clock::system(config.tz()?);
    let today = clock.today();
    let database = Database::open(&config.data_dir, &config.data_file)
        .await
        .context("Failed to open data directory")?;

    let seed_demo_data = config.seed_demo_data;
    let store = CrmStore::open(database, clock, move || {
        if seed_demo_data {
            seed::demo_data(today)
        } else {
            seed::empty_data()
        }
    })
    .await
    .context("Failed to load data file")?;

    AuthService::new(store.clone(), &config)
        .ensure_credential(&config.admin_initial_password)
        .await
        .context("Failed to initialise credential")?;

    let app = create_router(AppState::new(store, &config), &config);

    let listener = TcpListener::bind(config.bind_address())
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address()))?;
    info!("Listening on {}", config.server_url());

    axum::serve(listener, app).await?;

    Ok(())
}
