// src/models/dashboard.rs

use serde::Serialize;
use rust_decimal::Decimal;
use sqlx::FromRow;
use utoipa::ToSchema;

// =============================================================================
//  LINHAS DO LEDGER (o que o banco devolve)
// =============================================================================

// Receita concluída agrupada por (ano, mês) de criação da nota
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct MonthlyRevenueRow {
    pub year: i32,
    pub month: i32,
    pub revenue: Option<Decimal>,
}

// Itens vendidos agrupados por produto (somente notas concluídas)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProductSalesRow {
    pub product_id: i32,
    pub total_sold: Option<i64>,
    pub total_revenue: Option<Decimal>,
}

// Dados de exibição do produto (lookup em lote por id)
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct ProductDisplay {
    pub id: i32,
    pub name: String,
    pub brand_name: Option<String>,
    pub selling_price: Option<Decimal>,
    pub original_price: Option<Decimal>,
}

// =============================================================================
//  RESPOSTAS DO DASHBOARD
// =============================================================================

// 1. Cards do topo (KPIs do mês com variação contra o mês anterior)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub year: i32,
    pub month: u32,
    #[schema(example = "03/2024")]
    pub period: String,               // "MM/yyyy"
    pub monthly_revenue: Decimal,     // Soma das notas concluídas no mês
    pub previous_month_revenue: Decimal,
    pub revenue_change: Decimal,      // % com uma casa decimal
    pub monthly_orders: i64,          // Todas as notas do mês, qualquer status
    pub previous_month_orders: i64,
    pub orders_change: Decimal,
    pub monthly_new_customers: i64,   // ATENÇÃO: conta por data de nascimento
    pub total_products: i64,          // Produtos ativos
    pub total_customers: i64,         // Clientes ativos
    pub total_completed_orders: i64,  // Histórico inteiro, só concluídas
}

// 2. Gráfico de receita mensal (série densa, sem buracos)
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueBucket {
    #[schema(example = "03/2024")]
    pub date: String,
    #[schema(example = "March 2024")]
    pub label: String,
    #[schema(example = "Mar")]
    pub short_label: String,
    pub year: i32,
    pub month: u32,
    pub revenue: Decimal,
}

// 3. Ranking de produtos por unidades vendidas
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RankedProduct {
    pub rank: u32,
    pub product_id: i32,
    pub product_name: String,
    pub brand_name: String,
    pub price: Decimal,
    pub total_sold: i64,
    pub total_revenue: Decimal,
}
