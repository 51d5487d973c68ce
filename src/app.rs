//! Composition root: settings and a pool in, a running service out.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use bookstore_authz::{PasswordHasher, TokenService};
use bookstore_kernel::{settings::Settings, InitCtx, ModuleRegistry};
use sqlx::SqlitePool;

use crate::modules::{self, ModuleDeps};

pub struct Application {
    settings: Settings,
    pool: SqlitePool,
    registry: ModuleRegistry,
}

impl Application {
    /// Wire every module, apply pending migrations, then init and start the
    /// modules.
    pub async fn build(settings: Settings, pool: SqlitePool) -> anyhow::Result<Self> {
        let registry = registry(&settings, &pool);

        let applied = bookstore_db::run_migrations(&pool, &registry.collect_migrations())
            .await
            .context("failed to apply migrations")?;
        tracing::info!(applied, "migrations complete");

        let ctx = InitCtx {
            settings: &settings,
            db: &pool,
        };
        registry.init_modules(&ctx).await?;
        registry.start_modules(&ctx).await?;

        Ok(Self {
            settings,
            pool,
            registry,
        })
    }

    pub fn router(&self) -> Router {
        bookstore_http::build_router(&self.registry, &self.settings)
    }

    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Serve until a shutdown signal, then stop modules and close the pool.
    pub async fn serve(self) -> anyhow::Result<()> {
        let served = bookstore_http::start_server(self.router(), &self.settings).await;

        self.registry.stop_modules().await?;
        self.pool.close().await;
        tracing::info!("bookstore shut down");

        served
    }
}

/// Apply pending migrations without starting anything.
pub async fn migrate(settings: &Settings, pool: &SqlitePool) -> anyhow::Result<usize> {
    let registry = registry(settings, pool);
    bookstore_db::run_migrations(pool, &registry.collect_migrations()).await
}

fn registry(settings: &Settings, pool: &SqlitePool) -> ModuleRegistry {
    let deps = ModuleDeps {
        pool: pool.clone(),
        tokens: Arc::new(TokenService::new(
            &settings.auth.jwt_secret,
            settings.auth.issuer.clone(),
            settings.auth.token_ttl_secs,
        )),
        hasher: Arc::new(PasswordHasher::new(settings.auth.bcrypt_cost)),
        operation_timeout: Duration::from_millis(settings.database.operation_timeout_ms),
    };

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, &deps);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn build_registers_modules_and_migrates() {
        let pool = bookstore_db::connect_in_memory().await.unwrap();
        let mut settings = Settings::default();
        settings.auth.bcrypt_cost = 4;

        let app = Application::build(settings.clone(), pool.clone()).await.unwrap();

        let names: Vec<_> = app.registry().modules().map(|m| m.name()).collect();
        assert_eq!(names, vec!["author", "book", "user"]);

        // Everything is recorded, so a second pass has nothing to do
        assert_eq!(migrate(&settings, app.pool()).await.unwrap(), 0);
    }
}
