use async_trait::async_trait;
use axum::Router;

/// Context handed to modules while the application boots
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Schema statement contributed by a module, applied before the server starts
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A self-contained slice of the service: its routes, schema and lifecycle hooks
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Called once during startup, before `start`
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes served by this module, merged at the root of the HTTP router.
    /// The module is expected to have attached its own state already.
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment (`paths` and `components.schemas`) for this module
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Schema statements, applied in the order returned
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Called after every module has been initialized
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during application shutdown
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
