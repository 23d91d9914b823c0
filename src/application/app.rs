//! Process wiring: builds every adapter from configuration and runs the
//! HTTP server and queue consumer side by side until shutdown.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::adapters::cache::MokaAttributeCache;
use crate::adapters::http::{AppState, HttpServer};
use crate::adapters::providers::{build_http_client, HttpAttributeProvider};
use crate::adapters::queue::{LogDeadLetterSink, TopicPoller};
use crate::adapters::sqlite::{
    initialize_database, DatabaseError, PoolConfig, SqliteAttributeCache, SqliteMessageLog,
    SqlitePersonRepository,
};
use crate::domain::models::{CacheBackend, CacheConfig, Config, DatabaseConfig};
use crate::domain::ports::{AttributeCache, MessageLog};
use crate::services::{EnrichmentService, PersonService, QueueConsumer};

/// Open the configured database and apply pending migrations.
pub async fn connect_database(config: &DatabaseConfig) -> Result<SqlitePool, DatabaseError> {
    initialize_database(&config.url(), PoolConfig::from(config)).await
}

fn build_cache(config: &CacheConfig, pool: &SqlitePool) -> Arc<dyn AttributeCache> {
    match config.backend {
        CacheBackend::Memory => Arc::new(MokaAttributeCache::with_capacity(config.max_capacity)),
        CacheBackend::Sqlite => Arc::new(SqliteAttributeCache::new(pool.clone())),
    }
}

/// Wired service graph: database, cache, providers, HTTP server and queue consumer.
pub struct Application {
    config: Config,
    pool: SqlitePool,
    people: PersonService,
    log: Arc<dyn MessageLog>,
}

impl Application {
    /// Open the database, run migrations and wire every component from `config`.
    pub async fn build(config: Config) -> Result<Self> {
        let pool = connect_database(&config.database)
            .await
            .with_context(|| format!("Failed to open database at {}", config.database.path))?;
        Self::with_pool(config, pool)
    }

    /// Wire the application over an existing, migrated pool.
    pub fn with_pool(config: Config, pool: SqlitePool) -> Result<Self> {
        let http = build_http_client(Duration::from_millis(config.providers.timeout_ms))
            .context("Failed to build provider HTTP client")?;
        let [age, gender, nationality] = HttpAttributeProvider::from_config(&config.providers, &http);

        let enrichment = EnrichmentService::with_providers(
            build_cache(&config.cache, &pool),
            Arc::new(age),
            Arc::new(gender),
            Arc::new(nationality),
        );
        let people = PersonService::new(Arc::new(SqlitePersonRepository::new(pool.clone())), Arc::new(enrichment));
        let log: Arc<dyn MessageLog> = Arc::new(SqliteMessageLog::new(pool.clone()));

        Ok(Self {
            config,
            pool,
            people,
            log,
        })
    }

    /// Run until `shutdown` is cancelled or the HTTP server fails.
    pub async fn run(self, shutdown: CancellationToken) -> Result<()> {
        let queue = &self.config.queue;

        let mut poller_task = None;
        let mut consumer_task = None;
        if queue.enabled {
            let dead_letters = Arc::new(LogDeadLetterSink::new(self.log.clone(), queue.dead_letter_topic.clone(), 0));
            let dead_letter_topic = dead_letters.topic().to_string();
            let consumer = QueueConsumer::new(
                self.people.clone(),
                dead_letters,
                self.log.clone(),
                queue.consumer_group.clone(),
            )
            .with_dead_letter_enrichment_failures(queue.dead_letter_enrichment_failures);

            let poller = TopicPoller::from_config(self.log.clone(), queue);
            let (rx, handle) = poller.spawn(queue.channel_capacity, shutdown.clone());
            poller_task = Some(handle);
            consumer_task = Some(tokio::spawn(consumer.run(rx, shutdown.clone())));
            tracing::info!(
                topic = %queue.topic,
                partition = queue.partition,
                dead_letter_topic = %dead_letter_topic,
                "queue ingestion enabled"
            );
        } else {
            tracing::info!("queue ingestion disabled");
        }

        let state = Arc::new(AppState::new(self.people.clone(), self.log.clone()));
        let server = HttpServer::new(state, self.config.server.clone());
        let served = server.serve_with_shutdown(shutdown.clone().cancelled_owned()).await;

        // The server may have exited on its own; stop the queue side too.
        shutdown.cancel();
        if let Some(handle) = poller_task {
            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => tracing::error!(error = %e, "queue poller failed"),
                Err(e) => tracing::error!(error = %e, "queue poller panicked"),
            }
        }
        if let Some(handle) = consumer_task {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "queue consumer panicked");
            }
        }

        self.pool.close().await;
        served.map_err(|e| anyhow::anyhow!("HTTP server failed: {e}"))
    }
}
