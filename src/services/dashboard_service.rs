// src/services/dashboard_service.rs

use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::{
    common::{
        error::AppError,
        money::{percent_change, OrZero},
        period::{DateRange, YearMonth},
        query_scope::QueryScope,
    },
    db::LedgerStore,
    models::dashboard::{DashboardStats, RankedProduct, RevenueBucket},
};

pub const DEFAULT_SERIES_MONTHS: i32 = 12;
pub const MAX_SERIES_MONTHS: i32 = 120;
pub const DEFAULT_TOP_PRODUCTS: i32 = 5;
pub const MAX_TOP_PRODUCTS: i32 = 100;
/// Subconsultas disparadas em paralelo por `get_stats`.
pub const STATS_SUB_QUERIES: u32 = 8;

const MISSING_PRODUCT_NAME: &str = "Produto não encontrado";
const MISSING_BRAND_NAME: &str = "N/A";

#[derive(Clone)]
pub struct DashboardService {
    ledger: Arc<dyn LedgerStore>,
    // Único status de nota que conta como receita
    completed_status: String,
}

impl DashboardService {
    pub fn new(ledger: Arc<dyn LedgerStore>, completed_status: impl Into<String>) -> Self {
        Self {
            ledger,
            completed_status: completed_status.into(),
        }
    }

    // =========================================================================
    //  1. KPIs DO MÊS
    // =========================================================================

    /// KPIs do mês `year`/`month` (cada um cai no mês de `now` se ausente),
    /// comparados com o mês de calendário anterior.
    ///
    /// `monthlyNewCustomers` conta clientes pela DATA DE NASCIMENTO no mês,
    /// e não pela data de cadastro. É o comportamento que o painel sempre teve;
    /// não mudar sem alinhar com o time de produto.
    pub async fn get_stats(
        &self,
        scope: &QueryScope,
        now: NaiveDateTime,
        year: Option<i32>,
        month: Option<u32>,
    ) -> Result<DashboardStats, AppError> {
        if let Some(m) = month {
            if !(1..=12).contains(&m) {
                return Err(AppError::InvalidInput(format!(
                    "month deve estar entre 1 e 12 (recebido {m})"
                )));
            }
        }

        let current = YearMonth::of(now);
        let target = YearMonth::new(year.unwrap_or(current.year()), month.unwrap_or(current.month()))
            .ok_or_else(|| AppError::InvalidInput("year fora do intervalo suportado".into()))?;
        let period = month_range(target)?;
        let previous_period = target
            .previous()
            .and_then(|p| p.period())
            .ok_or_else(|| AppError::InvalidInput("year fora do intervalo suportado".into()))?;

        tracing::debug!("Calculando KPIs de {}", target.label());

        let ledger = &self.ledger;
        let status = self.completed_status.as_str();

        // Subconsultas independentes. Uma escrita entre elas pode deixar o mês
        // atual e o anterior levemente inconsistentes; isso é aceito.
        let (
            revenue,
            previous_revenue,
            orders,
            previous_orders,
            new_customers,
            total_products,
            total_customers,
            total_completed_orders,
        ) = tokio::try_join!(
            scope.run(ledger.completed_revenue(period, status)),
            scope.run(ledger.completed_revenue(previous_period, status)),
            scope.run(ledger.count_invoices(period)),
            scope.run(ledger.count_invoices(previous_period)),
            scope.run(ledger.count_customers_born_in(target.year(), target.month())),
            scope.run(ledger.count_active_products()),
            scope.run(ledger.count_active_customers()),
            scope.run(ledger.count_invoices_by_status(status)),
        )?;

        let monthly_revenue = revenue.or_zero();
        let previous_month_revenue = previous_revenue.or_zero();

        Ok(DashboardStats {
            year: target.year(),
            month: target.month(),
            period: target.label(),
            monthly_revenue,
            previous_month_revenue,
            revenue_change: percent_change(monthly_revenue, previous_month_revenue),
            monthly_orders: orders,
            previous_month_orders: previous_orders,
            orders_change: percent_change(Decimal::from(orders), Decimal::from(previous_orders)),
            monthly_new_customers: new_customers,
            total_products,
            total_customers,
            total_completed_orders,
        })
    }

    // =========================================================================
    //  2. SÉRIE DE RECEITA MENSAL
    // =========================================================================

    /// Exatamente `months` buckets, do mais antigo ao mês de `now`, com zero
    /// nos meses sem venda concluída.
    pub async fn get_revenue_series(
        &self,
        scope: &QueryScope,
        now: NaiveDateTime,
        months: Option<i32>,
        lang: &str,
    ) -> Result<Vec<RevenueBucket>, AppError> {
        let months = months.unwrap_or(DEFAULT_SERIES_MONTHS);
        if !(1..=MAX_SERIES_MONTHS).contains(&months) {
            return Err(AppError::InvalidInput(format!(
                "months deve estar entre 1 e {MAX_SERIES_MONTHS} (recebido {months})"
            )));
        }

        let current = YearMonth::of(now);
        let out_of_range = || AppError::InvalidInput("janela fora do intervalo suportado".into());

        // Busca [início do mês atual - N meses, início do mês seguinte).
        // Um mês a mais que a saída; o casamento exato por (ano, mês) abaixo
        // descarta o excedente.
        let fetch = DateRange {
            start: current.shift(-months).ok_or_else(out_of_range)?.start(),
            end: current.shift(1).ok_or_else(out_of_range)?.start(),
        };

        tracing::debug!("Série de receita: {} meses até {}", months, current.label());

        let rows = scope
            .run(self.ledger.monthly_revenue(fetch, &self.completed_status))
            .await?;

        let mut by_month: HashMap<(i32, i32), Decimal> = HashMap::new();
        for row in rows {
            *by_month.entry((row.year, row.month)).or_insert(Decimal::ZERO) += row.revenue.or_zero();
        }

        // Anda do mês atual para trás e inverte no fim.
        let mut buckets = Vec::with_capacity(months as usize);
        for offset in 0..months {
            let ym = current.shift(-offset).ok_or_else(out_of_range)?;
            let revenue = by_month
                .get(&(ym.year(), ym.month() as i32))
                .copied()
                .unwrap_or(Decimal::ZERO);

            buckets.push(RevenueBucket {
                date: ym.label(),
                label: ym.display_label(lang),
                short_label: ym.short_label(lang),
                year: ym.year(),
                month: ym.month(),
                revenue,
            });
        }
        buckets.reverse();

        Ok(buckets)
    }

    // =========================================================================
    //  3. TOP PRODUTOS
    // =========================================================================

    /// Top N produtos por unidades vendidas em notas concluídas.
    /// Empate em `totalSold`: menor `product_id` primeiro.
    pub async fn get_top_products(
        &self,
        scope: &QueryScope,
        limit: Option<i32>,
    ) -> Result<Vec<RankedProduct>, AppError> {
        let limit = limit.unwrap_or(DEFAULT_TOP_PRODUCTS);
        if !(1..=MAX_TOP_PRODUCTS).contains(&limit) {
            return Err(AppError::InvalidInput(format!(
                "limit deve estar entre 1 e {MAX_TOP_PRODUCTS} (recebido {limit})"
            )));
        }

        let mut rows = scope
            .run(self.ledger.product_sales(&self.completed_status))
            .await?;

        rows.sort_by(|a, b| {
            b.total_sold
                .or_zero()
                .cmp(&a.total_sold.or_zero())
                .then(a.product_id.cmp(&b.product_id))
        });
        rows.truncate(limit as usize);

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        // Um único lookup para todos os ids do ranking
        let ids: Vec<i32> = rows.iter().map(|r| r.product_id).collect();
        let catalog: HashMap<i32, _> = scope
            .run(self.ledger.products_by_ids(&ids))
            .await?
            .into_iter()
            .map(|p| (p.id, p))
            .collect();

        if catalog.len() < ids.len() {
            tracing::warn!(
                "{} produto(s) do ranking não existem mais no catálogo",
                ids.len() - catalog.len()
            );
        }

        let ranked = rows
            .into_iter()
            .enumerate()
            .map(|(index, row)| {
                let product = catalog.get(&row.product_id);
                RankedProduct {
                    rank: index as u32 + 1,
                    product_id: row.product_id,
                    product_name: product
                        .map(|p| p.name.clone())
                        .unwrap_or_else(|| MISSING_PRODUCT_NAME.to_string()),
                    brand_name: product
                        .and_then(|p| p.brand_name.clone())
                        .unwrap_or_else(|| MISSING_BRAND_NAME.to_string()),
                    price: product
                        .and_then(|p| p.selling_price.or(p.original_price))
                        .or_zero(),
                    total_sold: row.total_sold.or_zero(),
                    total_revenue: row.total_revenue.or_zero(),
                }
            })
            .collect();

        Ok(ranked)
    }
}

fn month_range(ym: YearMonth) -> Result<DateRange, AppError> {
    ym.period()
        .ok_or_else(|| AppError::InvalidInput("year fora do intervalo suportado".into()))
}
