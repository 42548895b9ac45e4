//! Test harnesses for integration testing.
//!
//! `TestHarness` runs the schema against the in-memory store and needs no
//! external services. `PostgresHarness` runs against a real database in a
//! shared testcontainers Postgres; every harness gets its own freshly migrated
//! database so tests never see each other's rows.

#![allow(dead_code)]

use anyhow::{Context, Result};
use crm_core::kernel::{ServerDeps, TestDependencies};
use sqlx::PgPool;
use std::sync::Arc;
use test_context::AsyncTestContext;
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::GraphQLClient;

fn init_tracing() {
    // Run tests with: RUST_LOG=debug cargo test -- --nocapture
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// =============================================================================
// In-memory harness
// =============================================================================

/// # Example using test-context
///
/// ```ignore
/// use test_context::test_context;
///
/// #[test_context(TestHarness)]
/// #[tokio::test]
/// async fn my_test(ctx: &mut TestHarness) {
///     let client = ctx.graphql();
///     // ... test code
/// }
/// ```
pub struct TestHarness {
    pub test_deps: Arc<TestDependencies>,
    pub deps: ServerDeps,
}

impl AsyncTestContext for TestHarness {
    async fn setup() -> Self {
        Self::new()
    }

    async fn teardown(self) {
        // In-memory store is dropped with the harness
    }
}

impl TestHarness {
    pub fn new() -> Self {
        init_tracing();
        let test_deps = Arc::new(TestDependencies::new());
        let deps = test_deps.into_server_deps();
        Self { test_deps, deps }
    }

    /// Get a GraphQL client for this harness.
    pub fn graphql(&self) -> GraphQLClient {
        GraphQLClient::new(self.deps.clone())
    }
}

// =============================================================================
// Postgres harness (needs Docker)
// =============================================================================

/// Shared Postgres container, started once for the whole test run.
struct SharedTestInfra {
    admin_url: String,
    host: String,
    port: u16,
    // Keep the container alive for the entire test run
    _postgres: ContainerAsync<Postgres>,
}

static SHARED_INFRA: OnceCell<SharedTestInfra> = OnceCell::const_new();

impl SharedTestInfra {
    async fn init() -> Result<Self> {
        init_tracing();

        let postgres = Postgres::default()
            .with_tag("16")
            .start()
            .await
            .context("Failed to start Postgres container")?;

        let host = postgres.get_host().await?.to_string();
        let port = postgres.get_host_port_ipv4(5432).await?;
        let admin_url = format!("postgresql://postgres:postgres@{}:{}/postgres", host, port);

        Ok(Self {
            admin_url,
            host,
            port,
            _postgres: postgres,
        })
    }

    async fn get() -> &'static Self {
        SHARED_INFRA
            .get_or_init(|| async {
                Self::init()
                    .await
                    .expect("Failed to initialize shared test infrastructure")
            })
            .await
    }

    /// Create an empty database and apply the migrations to it.
    async fn fresh_database(&self) -> Result<PgPool> {
        let name = format!("crm_test_{}", Uuid::new_v4().simple());

        let admin = PgPool::connect(&self.admin_url)
            .await
            .context("Failed to connect to Postgres")?;
        sqlx::query(&format!("CREATE DATABASE {}", name))
            .execute(&admin)
            .await
            .context("Failed to create test database")?;
        admin.close().await;

        let url = format!(
            "postgresql://postgres:postgres@{}:{}/{}",
            self.host, self.port, name
        );
        let pool = PgPool::connect(&url)
            .await
            .context("Failed to connect to test database")?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("Failed to run migrations")?;

        Ok(pool)
    }
}

pub struct PostgresHarness {
    pub db_pool: PgPool,
    pub deps: ServerDeps,
}

impl AsyncTestContext for PostgresHarness {
    async fn setup() -> Self {
        Self::new()
            .await
            .expect("Failed to create Postgres test harness")
    }

    async fn teardown(self) {
        self.db_pool.close().await;
    }
}

impl PostgresHarness {
    pub async fn new() -> Result<Self> {
        let db_pool = SharedTestInfra::get().await.fresh_database().await?;
        let deps = ServerDeps::postgres(db_pool.clone());
        Ok(Self { db_pool, deps })
    }

    pub fn graphql(&self) -> GraphQLClient {
        GraphQLClient::new(self.deps.clone())
    }
}
