// src/db/dashboard_repo.rs

use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::{
    common::{error::AppError, period::DateRange},
    models::dashboard::{MonthlyRevenueRow, ProductDisplay, ProductSalesRow},
};

/// Superfície de consulta (somente leitura) sobre notas de venda, itens,
/// produtos e clientes. O dashboard só conversa com o banco por aqui.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Soma de `total_amount` das notas com o status dado, criadas em `range`.
    async fn completed_revenue(&self, range: DateRange, status: &str)
        -> Result<Option<Decimal>, AppError>;

    /// Quantidade de notas criadas em `range`, qualquer status.
    async fn count_invoices(&self, range: DateRange) -> Result<i64, AppError>;

    async fn count_invoices_by_status(&self, status: &str) -> Result<i64, AppError>;

    /// Clientes cuja data de nascimento cai no mês/ano dado.
    async fn count_customers_born_in(&self, year: i32, month: u32) -> Result<i64, AppError>;

    async fn count_active_products(&self) -> Result<i64, AppError>;

    async fn count_active_customers(&self) -> Result<i64, AppError>;

    /// Receita por (ano, mês) de criação, dentro de `range`, para o status dado.
    async fn monthly_revenue(&self, range: DateRange, status: &str)
        -> Result<Vec<MonthlyRevenueRow>, AppError>;

    /// Quantidade e receita dos itens agrupados por produto, só das notas com o status dado.
    async fn product_sales(&self, status: &str) -> Result<Vec<ProductSalesRow>, AppError>;

    /// Lookup em lote. Ids sem produto correspondente simplesmente não voltam.
    async fn products_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductDisplay>, AppError>;
}

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn count(&self, sql: &str) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as(sql).fetch_one(&self.pool).await?;
        Ok(total)
    }
}

#[async_trait]
impl LedgerStore for DashboardRepository {
    async fn completed_revenue(
        &self,
        range: DateRange,
        status: &str,
    ) -> Result<Option<Decimal>, AppError> {
        let (total,): (Option<Decimal>,) = sqlx::query_as(
            r#"
            SELECT SUM(total_amount)
            FROM sale_invoices
            WHERE created_at >= $1
              AND created_at < $2
              AND status = $3
            "#,
        )
            .bind(range.start)
            .bind(range.end)
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn count_invoices(&self, range: DateRange) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM sale_invoices
            WHERE created_at >= $1
              AND created_at < $2
            "#,
        )
            .bind(range.start)
            .bind(range.end)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn count_invoices_by_status(&self, status: &str) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sale_invoices WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn count_customers_born_in(&self, year: i32, month: u32) -> Result<i64, AppError> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*)
            FROM customers
            WHERE EXTRACT(YEAR FROM date_of_birth)::int = $1
              AND EXTRACT(MONTH FROM date_of_birth)::int = $2
            "#,
        )
            .bind(year)
            .bind(month as i32)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn count_active_products(&self) -> Result<i64, AppError> {
        self.count("SELECT COUNT(*) FROM products WHERE is_active = true").await
    }

    async fn count_active_customers(&self) -> Result<i64, AppError> {
        self.count("SELECT COUNT(*) FROM customers WHERE is_active = true").await
    }

    async fn monthly_revenue(
        &self,
        range: DateRange,
        status: &str,
    ) -> Result<Vec<MonthlyRevenueRow>, AppError> {
        let rows = sqlx::query_as::<_, MonthlyRevenueRow>(
            r#"
            SELECT
                EXTRACT(YEAR FROM created_at)::int AS year,
                EXTRACT(MONTH FROM created_at)::int AS month,
                SUM(total_amount) AS revenue
            FROM sale_invoices
            WHERE created_at >= $1
              AND created_at < $2
              AND status = $3
            GROUP BY 1, 2
            ORDER BY 1, 2
            "#,
        )
            .bind(range.start)
            .bind(range.end)
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn product_sales(&self, status: &str) -> Result<Vec<ProductSalesRow>, AppError> {
        // Sem JOIN em products: itens de produtos apagados continuam contando.
        let rows = sqlx::query_as::<_, ProductSalesRow>(
            r#"
            SELECT
                d.product_id,
                SUM(COALESCE(d.quantity, 0))::bigint AS total_sold,
                SUM(COALESCE(d.quantity, 0) * COALESCE(d.unit_price, 0)) AS total_revenue
            FROM sale_invoice_details d
            JOIN sale_invoices i ON d.invoice_id = i.id
            WHERE i.status = $1
            GROUP BY d.product_id
            ORDER BY total_sold DESC, d.product_id ASC
            "#,
        )
            .bind(status)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }

    async fn products_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductDisplay>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, ProductDisplay>(
            r#"
            SELECT
                p.id,
                p.name,
                b.name AS brand_name,
                p.selling_price,
                p.original_price
            FROM products p
            LEFT JOIN brands b ON p.brand_id = b.id
            WHERE p.id = ANY($1)
            "#,
        )
            .bind(ids)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows)
    }
}
