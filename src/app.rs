//! Process context: settings, the single store handle and the module registry.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use folio_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::PgPool;

use crate::modules::{
    self,
    books::store::{MemoryBookStore, PgBookStore, SharedStore},
};

pub struct AppContext {
    settings: Settings,
    store: SharedStore,
    pool: Option<PgPool>,
    registry: ModuleRegistry,
}

impl AppContext {
    /// Open the configured store: Postgres, or the in-memory store when
    /// `database.in_memory` is set.
    pub async fn connect(settings: Settings) -> anyhow::Result<Self> {
        if settings.database.in_memory {
            tracing::warn!("database.in_memory is set; books will not survive a restart");
            return Ok(Self::with_store(settings, Arc::new(MemoryBookStore::new())));
        }

        let pool = folio_db::connect(&settings.database).await?;
        Ok(Self::with_pool(settings, pool))
    }

    /// Build around an already opened Postgres pool
    pub fn with_pool(settings: Settings, pool: PgPool) -> Self {
        let store: SharedStore = Arc::new(PgBookStore::new(pool.clone()));
        let mut app = Self::with_store(settings, store);
        app.pool = Some(pool);
        app
    }

    /// Build around any store, e.g. an isolated `MemoryBookStore` per test
    pub fn with_store(settings: Settings, store: SharedStore) -> Self {
        let mut registry = ModuleRegistry::new();
        modules::register_all(&mut registry, store.clone());

        Self {
            settings,
            store,
            pool: None,
            registry,
        }
    }

    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// The complete HTTP router, middleware included
    pub fn router(&self) -> Router {
        folio_http::build_router(&self.registry, &self.settings)
    }

    /// Apply every module's schema statements. A no-op without Postgres.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        let Some(pool) = &self.pool else {
            tracing::info!("no database pool; skipping migrations");
            return Ok(());
        };

        let migrations = self.registry.collect_migrations();
        folio_db::run_migrations(pool, &migrations).await?;
        tracing::info!(count = migrations.len(), "migrations applied");
        Ok(())
    }

    /// Delete every book, optionally restarting the id sequence
    pub async fn clear(&self, restart_ids: bool) -> anyhow::Result<()> {
        self.store
            .clear(restart_ids)
            .await
            .with_context(|| "failed to clear books")?;
        tracing::info!(restart_ids, "books cleared");
        Ok(())
    }

    /// Run the module lifecycle around the HTTP server until shutdown
    pub async fn serve(self) -> anyhow::Result<()> {
        let ctx = InitCtx {
            settings: &self.settings,
        };

        self.registry.init_all(&ctx).await?;
        self.registry.start_all(&ctx).await?;

        let served = folio_http::start_server(&self.registry, &self.settings).await;

        self.registry.stop_all().await?;
        if let Some(pool) = &self.pool {
            pool.close().await;
        }

        served
    }
}
