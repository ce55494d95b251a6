// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use chrono::NaiveDateTime;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tokio_util::sync::CancellationToken;

use crate::{
    common::query_scope::QueryScope,
    db::LedgerStore,
    services::dashboard_service::{DashboardService, STATS_SUB_QUERIES},
};

// Um pedido de KPIs ocupa STATS_SUB_QUERIES conexões ao mesmo tempo; o pool
// padrão deixa folga para as outras rotas.
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = STATS_SUB_QUERIES + 4;

// Relógio injetável: o dashboard nunca lê a hora direto
pub type Clock = Arc<dyn Fn() -> NaiveDateTime + Send + Sync>;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub query_timeout: Duration,
    pub completed_status: String,
    pub run_migrations: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?,
            jwt_secret: env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?,
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS)?,
            query_timeout: Duration::from_secs(parse_var("QUERY_TIMEOUT_SECS", 10)?),
            completed_status: env::var("COMPLETED_STATUS").unwrap_or_else(|_| "Completed".to_string()),
            run_migrations: parse_var("RUN_MIGRATIONS", false)?,
        })
    }

    pub async fn connect(&self) -> anyhow::Result<PgPool> {
        if self.db_max_connections < STATS_SUB_QUERIES {
            tracing::warn!(
                "DB_MAX_CONNECTIONS={} é menor que as {} consultas paralelas dos KPIs; pedidos concorrentes podem esgotar o pool.",
                self.db_max_connections,
                STATS_SUB_QUERIES
            );
        }

        let db_pool = PgPoolOptions::new()
            .max_connections(self.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&self.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
        Ok(db_pool)
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} inválida: {raw:?}")),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
    pub jwt_secret: String,
    pub query_timeout: Duration,
    // Cancelado no desligamento; cada requisição recebe um filho
    pub shutdown: CancellationToken,
    pub clock: Clock,
}

impl AppState {
    pub fn new(settings: &Settings, ledger: Arc<dyn LedgerStore>, shutdown: CancellationToken) -> Self {
        Self {
            dashboard_service: DashboardService::new(ledger, settings.completed_status.clone()),
            jwt_secret: settings.jwt_secret.clone(),
            query_timeout: settings.query_timeout,
            shutdown,
            clock: Arc::new(|| chrono::Local::now().naive_local()),
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        (self.clock)()
    }

    pub fn query_scope(&self) -> QueryScope {
        QueryScope::with_timeout(&self.shutdown, self.query_timeout)
    }
}
