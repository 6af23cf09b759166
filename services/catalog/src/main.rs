use std::sync::Arc;

use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use catalog::{
    config::{CatalogConfig, StorageBackend},
    routes,
    state::AppState,
    storage::{FilmStorage, UserStorage, memory::InMemoryStorage, postgres::PgStorage},
};
use common::database::{DatabaseConfig, init_pool};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting catalog service");

    let config = CatalogConfig::from_env()?;

    let (user_storage, film_storage): (Arc<dyn UserStorage>, Arc<dyn FilmStorage>) =
        match config.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage backend");
                let storage = Arc::new(InMemoryStorage::new());
                (storage.clone(), storage)
            }
            StorageBackend::Postgres => {
                // Initialize database connection pool
                let db_config = DatabaseConfig::from_env()?;
                let pool = init_pool(&db_config).await?;

                // Check database connectivity
                if common::database::health_check(&pool).await? {
                    info!("Database connection successful");
                } else {
                    anyhow::bail!("Failed to connect to database");
                }

                info!("Using Postgres storage backend");
                let storage = Arc::new(PgStorage::new(pool));
                (storage.clone(), storage)
            }
        };

    let app_state = AppState::new(user_storage, film_storage);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!("Catalog service listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
