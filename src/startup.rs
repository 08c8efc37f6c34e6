use crate::menu;
use crate::shutdown;
use kokous::components::notifier::{MeetingEvent, Notifier};
use kokous::components::schedule::Schedule;
use kokous::components::storage::{MeetingStore, MemoryStore, RedisStore, SharedStore};
use kokous::components::ComponentManager;
use kokous::config::{Config, StorageBackend};
use kokous::error::{component_error, Error};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Component(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub async fn load_config() -> miette::Result<Arc<RwLock<Config>>> {
    match Config::load() {
        Ok(config) => Ok(Arc::new(RwLock::new(config))),
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Build the storage backend named by the config
async fn build_store(config: &Arc<RwLock<Config>>) -> miette::Result<SharedStore> {
    let (backend, redis_url) = {
        let config_read = config.read().await;
        (config_read.storage_backend, config_read.redis_url.clone())
    };

    let store: SharedStore = match backend {
        StorageBackend::Memory => {
            info!("Using the in-memory meeting store");
            Arc::new(MemoryStore::new())
        }
        StorageBackend::Redis => {
            info!("Connecting to Redis at {}", redis_url);
            Arc::new(RedisStore::connect(&redis_url).await?)
        }
    };

    Ok(store)
}

/// Initialize components and run the interactive calendar
pub async fn start_app(config: Arc<RwLock<Config>>) -> miette::Result<()> {
    // Build the storage backend
    let store = build_store(&config).await?;

    // Channel the notifier emits lifecycle events into
    let (events_tx, mut events_rx) = mpsc::channel::<MeetingEvent>(32);

    // Initialize component manager
    let mut component_manager = ComponentManager::new(Arc::clone(&config));

    // Register the scheduling component
    component_manager.register(Schedule::new());

    // Register the lifecycle notifier component
    component_manager.register(Notifier::new(events_tx));

    // Create a shared component manager
    let component_manager = Arc::new(component_manager);

    // Initialize components
    component_manager
        .init_all(Arc::clone(&config), Arc::clone(&store))
        .await?;

    // Fetch the scheduling handle for the menu
    let schedule = component_manager
        .get_component_by_name("schedule")
        .and_then(|c| c.as_any().downcast_ref::<Schedule>())
        .ok_or_else(|| component_error("Schedule component is not registered"))?
        .get_handle()
        .await
        .ok_or_else(|| component_error("Schedule component is disabled or failed to initialize"))?;

    // Print lifecycle events as they arrive
    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            println!("{}", event.message);
        }
    });

    // Create shutdown channel
    let (shutdown_send, shutdown_recv) = oneshot::channel();

    // Clone component manager and store for the shutdown handler
    let shutdown_components = Arc::clone(&component_manager);
    let shutdown_store = Arc::clone(&store);

    // Spawn signal handler task
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components, shutdown_store).await;
    });

    // Run the menu until the user quits or a signal arrives
    tokio::select! {
        result = menu::run(schedule, Arc::clone(&config)) => {
            info!("Menu closed, shutting down...");
            if let Err(e) = component_manager.shutdown_all().await {
                error!("Error shutting down components: {:?}", e);
            }
            if let Err(e) = store.shutdown().await {
                error!("Error shutting down storage: {:?}", e);
            }
            result.map_err(Into::into)
        }
        _ = shutdown_recv => {
            info!("Received shutdown signal, exiting");
            Ok(())
        }
    }
}
