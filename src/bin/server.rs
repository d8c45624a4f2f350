use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;

use growth_model::api::{self, AppState};
use growth_model::baseline::{HistoricalMarts, InMemoryMarts};
use growth_model::config::{self, StorageMode};
use growth_model::db::db_manager::DbManager;
use growth_model::logging;
use growth_model::scenario::{InMemoryScenarioRepository, ScenarioRepository, ScenarioStore};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment variables from .env file (optional for the server)
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME").to_string()) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e.into());
    }

    // Load configuration
    let cfg = config::Config::load()?;
    info!(storage_mode = %cfg.storage_mode, "Configuration loaded and logging initialized");

    // Wire storage backends
    let (repository, marts): (Arc<dyn ScenarioRepository>, Arc<dyn HistoricalMarts>) = match cfg.storage_mode {
        StorageMode::Postgres => {
            let db_manager = Arc::new(DbManager::init(&cfg).await?);
            info!("Database manager initialized");
            let repository: Arc<dyn ScenarioRepository> = db_manager.clone();
            let marts: Arc<dyn HistoricalMarts> = db_manager;
            (repository, marts)
        }
        StorageMode::Memory => {
            info!("Running on in-memory storage, scenarios are lost on exit");
            let repository: Arc<dyn ScenarioRepository> = Arc::new(InMemoryScenarioRepository::new());
            let marts: Arc<dyn HistoricalMarts> = Arc::new(InMemoryMarts::new());
            (repository, marts)
        }
    };

    let state = AppState {
        store: ScenarioStore::new(repository),
        marts,
    };

    api::serve(cfg.server_addr(), state).await?;

    Ok(())
}
