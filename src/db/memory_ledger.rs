// src/db/memory_ledger.rs
//
// Ledger em memória para testes. Implementa as mesmas regras das consultas SQL
// de `DashboardRepository` sobre vetores simples.

use std::{
    sync::atomic::{AtomicUsize, Ordering},
    time::Duration,
};

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::{
    common::{error::AppError, money::OrZero, period::DateRange},
    db::LedgerStore,
    models::dashboard::{MonthlyRevenueRow, ProductDisplay, ProductSalesRow},
};

#[derive(Debug, Clone)]
pub struct SaleInvoice {
    pub id: i32,
    pub created_at: NaiveDateTime,
    pub status: String,
    pub total_amount: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct SaleInvoiceDetail {
    pub invoice_id: i32,
    pub product_id: i32,
    pub quantity: Option<i32>,
    pub unit_price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub brand_id: Option<i32>,
    pub is_active: bool,
    pub selling_price: Option<Decimal>,
    pub original_price: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct Brand {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct Customer {
    pub date_of_birth: Option<NaiveDate>,
    pub is_active: bool,
}

#[derive(Debug, Default)]
pub struct MemoryLedger {
    pub invoices: Vec<SaleInvoice>,
    pub details: Vec<SaleInvoiceDetail>,
    pub products: Vec<Product>,
    pub brands: Vec<Brand>,
    pub customers: Vec<Customer>,
    /// Se definido, toda consulta falha com esta mensagem.
    pub failure: Option<String>,
    /// Atraso artificial por consulta.
    pub latency: Option<Duration>,
    lookups: AtomicUsize,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn invoice(mut self, created_at: NaiveDateTime, status: &str, total: Option<Decimal>) -> Self {
        let id = self.invoices.len() as i32 + 1;
        self.invoices.push(SaleInvoice {
            id,
            created_at,
            status: status.to_string(),
            total_amount: total,
        });
        self
    }

    /// Adiciona um item à última nota inserida.
    pub fn line(mut self, product_id: i32, quantity: Option<i32>, unit_price: Option<Decimal>) -> Self {
        let invoice_id = self.invoices.last().map(|i| i.id).unwrap_or(0);
        self.details.push(SaleInvoiceDetail {
            invoice_id,
            product_id,
            quantity,
            unit_price,
        });
        self
    }

    pub fn brand(mut self, id: i32, name: &str) -> Self {
        self.brands.push(Brand { id, name: name.to_string() });
        self
    }

    pub fn product(
        mut self,
        id: i32,
        name: &str,
        brand_id: Option<i32>,
        selling_price: Option<Decimal>,
        original_price: Option<Decimal>,
    ) -> Self {
        self.products.push(Product {
            id,
            name: name.to_string(),
            brand_id,
            is_active: true,
            selling_price,
            original_price,
        });
        self
    }

    pub fn customer(mut self, date_of_birth: Option<NaiveDate>, is_active: bool) -> Self {
        self.customers.push(Customer { date_of_birth, is_active });
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.failure = Some(message.to_string());
        self
    }

    pub fn slow(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Quantas vezes `products_by_ids` foi chamado.
    pub fn product_lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    async fn touch(&self) -> Result<(), AppError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match &self.failure {
            Some(message) => Err(AppError::InternalServerError(anyhow::anyhow!(message.clone()))),
            None => Ok(()),
        }
    }

    fn invoice_status(&self, invoice_id: i32) -> Option<&str> {
        self.invoices
            .iter()
            .find(|i| i.id == invoice_id)
            .map(|i| i.status.as_str())
    }
}

#[async_trait]
impl LedgerStore for MemoryLedger {
    async fn completed_revenue(
        &self,
        range: DateRange,
        status: &str,
    ) -> Result<Option<Decimal>, AppError> {
        self.touch().await?;
        // SUM do SQL: NULL quando nenhuma linha entra no filtro
        let totals: Vec<Decimal> = self
            .invoices
            .iter()
            .filter(|i| range.contains(i.created_at) && i.status == status)
            .map(|i| i.total_amount.or_zero())
            .collect();
        Ok((!totals.is_empty()).then(|| totals.into_iter().sum()))
    }

    async fn count_invoices(&self, range: DateRange) -> Result<i64, AppError> {
        self.touch().await?;
        Ok(self.invoices.iter().filter(|i| range.contains(i.created_at)).count() as i64)
    }

    async fn count_invoices_by_status(&self, status: &str) -> Result<i64, AppError> {
        self.touch().await?;
        Ok(self.invoices.iter().filter(|i| i.status == status).count() as i64)
    }

    async fn count_customers_born_in(&self, year: i32, month: u32) -> Result<i64, AppError> {
        self.touch().await?;
        Ok(self
            .customers
            .iter()
            .filter_map(|c| c.date_of_birth)
            .filter(|d| d.year() == year && d.month() == month)
            .count() as i64)
    }

    async fn count_active_products(&self) -> Result<i64, AppError> {
        self.touch().await?;
        Ok(self.products.iter().filter(|p| p.is_active).count() as i64)
    }

    async fn count_active_customers(&self) -> Result<i64, AppError> {
        self.touch().await?;
        Ok(self.customers.iter().filter(|c| c.is_active).count() as i64)
    }

    async fn monthly_revenue(
        &self,
        range: DateRange,
        status: &str,
    ) -> Result<Vec<MonthlyRevenueRow>, AppError> {
        self.touch().await?;
        let mut rows: Vec<MonthlyRevenueRow> = Vec::new();
        for invoice in self
            .invoices
            .iter()
            .filter(|i| range.contains(i.created_at) && i.status == status)
        {
            let year = invoice.created_at.year();
            let month = invoice.created_at.month() as i32;
            let amount = invoice.total_amount.or_zero();
            match rows.iter_mut().find(|r| r.year == year && r.month == month) {
                Some(row) => row.revenue = Some(row.revenue.or_zero() + amount),
                None => rows.push(MonthlyRevenueRow { year, month, revenue: Some(amount) }),
            }
        }
        rows.sort_by_key(|r| (r.year, r.month));
        Ok(rows)
    }

    async fn product_sales(&self, status: &str) -> Result<Vec<ProductSalesRow>, AppError> {
        self.touch().await?;
        // Ordem de inserção preservada: o desempate fica a cargo do serviço.
        let mut rows: Vec<ProductSalesRow> = Vec::new();
        for line in self
            .details
            .iter()
            .filter(|d| self.invoice_status(d.invoice_id) == Some(status))
        {
            let quantity = line.quantity.or_zero();
            let revenue = Decimal::from(quantity) * line.unit_price.or_zero();
            match rows.iter_mut().find(|r| r.product_id == line.product_id) {
                Some(row) => {
                    row.total_sold = Some(row.total_sold.or_zero() + quantity);
                    row.total_revenue = Some(row.total_revenue.or_zero() + revenue);
                }
                None => rows.push(ProductSalesRow {
                    product_id: line.product_id,
                    total_sold: Some(quantity),
                    total_revenue: Some(revenue),
                }),
            }
        }
        Ok(rows)
    }

    async fn products_by_ids(&self, ids: &[i32]) -> Result<Vec<ProductDisplay>, AppError> {
        self.touch().await?;
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .products
            .iter()
            .filter(|p| ids.contains(&p.id))
            .map(|p| ProductDisplay {
                id: p.id,
                name: p.name.clone(),
                brand_name: p
                    .brand_id
                    .and_then(|b| self.brands.iter().find(|brand| brand.id == b))
                    .map(|b| b.name.clone()),
                selling_price: p.selling_price,
                original_price: p.original_price,
            })
            .collect())
    }
}
