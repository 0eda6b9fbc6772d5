use actix_cors::Cors;
use actix_web::{middleware, web, App, HttpServer};
use collab_match::config::{LoggingSettings, Settings};
use collab_match::core::{Matcher, RuleBasedScorer};
use collab_match::routes::{self, AppState};
use collab_match::services::{ListingCache, MatchStore, RestDocumentStore, StoreCollections};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingSettings) {
    let level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| logging.level.clone());
    let format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| logging.format.clone());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    if format == "pretty" {
        subscriber.pretty().init();
    } else {
        subscriber.json().init();
    }
}

fn io_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{}: {}", context, err))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenv::dotenv().ok();

    let settings = Settings::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        io_error("Configuration error", e)
    })?;

    init_logging(&settings.logging);

    info!("Starting Collab Match scoring service...");

    let store = RestDocumentStore::new(
        settings.store.endpoint.clone(),
        settings.store.api_key.clone(),
        settings.store.project_id.clone(),
        settings.store.database_id.clone(),
        StoreCollections {
            campaigns: settings.store.campaigns_collection.clone(),
            creators: settings.store.creators_collection.clone(),
        },
        settings.store.page_size,
        settings.store.timeout_secs,
    )
    .map_err(|e| io_error("Document store client error", e))?;

    info!("Document store client initialized");

    // Match store is optional: without it opportunities use rule-based scores only
    let match_store = match &settings.database {
        Some(db) => {
            let max_conn = db.max_connections.unwrap_or(10);
            let store = MatchStore::new(
                &db.url,
                max_conn,
                db.min_connections.unwrap_or(1),
                db.acquire_timeout_secs.unwrap_or(5),
                db.idle_timeout_secs.unwrap_or(600),
            )
            .await
            .map_err(|e| {
                error!("Failed to connect to PostgreSQL: {}", e);
                io_error("PostgreSQL connection error", e)
            })?;
            info!("Match store initialized (max: {} connections)", max_conn);
            Some(Arc::new(store))
        }
        None => {
            warn!("No database configured, AI overrides and snapshots disabled");
            None
        }
    };

    // Cache is optional: Redis failures degrade to uncached responses
    let cache = match &settings.cache {
        Some(cache_settings) => {
            let ttl = cache_settings.ttl_secs.unwrap_or(300);
            let l1_size = cache_settings.l1_cache_size.unwrap_or(1000);
            match ListingCache::connect(&cache_settings.redis_url, l1_size, ttl).await {
                Ok(c) => {
                    info!("Listing cache initialized (L1: {} entries, TTL: {}s)", l1_size, ttl);
                    Some(Arc::new(c))
                }
                Err(e) => {
                    error!("Failed to connect to Redis ({}), running without cache", e);
                    None
                }
            }
        }
        None => None,
    };

    let scorer = RuleBasedScorer::new(settings.scoring.clone());
    let matcher = Matcher::new(settings.matching.thresholds());

    info!(
        "Scorer initialized with {:?}, thresholds {:?}",
        scorer.config(),
        matcher.thresholds()
    );

    let app_state = AppState {
        store: Arc::new(store),
        match_store,
        cache,
        scorer,
        matcher,
        max_limit: usize::from(settings.matching.max_limit),
    };

    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.unwrap_or(4);

    info!("Starting HTTP server on {}:{}", host, port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .wrap(middleware::Compress::default())
            .configure(routes::configure_routes)
    })
    .workers(workers)
    .bind((host, port))?
    .run()
    .await
}
