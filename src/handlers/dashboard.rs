// src/handlers/dashboard.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    // Importamos os models para referenciar no Swagger
    models::dashboard::{DashboardStats, RankedProduct, RevenueBucket},
    services::dashboard_service::{MAX_SERIES_MONTHS, MAX_TOP_PRODUCTS},
};

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardStatsQuery {
    /// Ano de referência (padrão: ano atual)
    #[validate(range(min = 1, max = 9999, message = "O ano deve estar entre 1 e 9999."))]
    pub year: Option<i32>,
    /// Mês de referência, 1 a 12 (padrão: mês atual)
    #[validate(range(min = 1, max = 12, message = "O mês deve estar entre 1 e 12."))]
    pub month: Option<u32>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RevenueSeriesQuery {
    /// Quantidade de meses da série (padrão: 12)
    #[validate(range(min = 1, max = MAX_SERIES_MONTHS, message = "months fora do intervalo permitido."))]
    pub months: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TopProductsQuery {
    /// Tamanho do ranking (padrão: 5)
    #[validate(range(min = 1, max = MAX_TOP_PRODUCTS, message = "limit fora do intervalo permitido."))]
    pub limit: Option<i32>,
}

// Query string malformada (ex: "month=abc") vira 400 no formato padrão
fn parse_query<T>(query: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    query
        .map(|Query(params)| params)
        .map_err(|rejection| AppError::InvalidInput(rejection.body_text()))
}

// GET /api/dashboard/stats
#[utoipa::path(
    get,
    path = "/api/dashboard/stats",
    tag = "Dashboard",
    params(DashboardStatsQuery),
    responses(
        (status = 200, description = "KPIs do mês com variação contra o mês anterior", body = DashboardStats),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autorizado"),
        (status = 500, description = "Falha ao consultar o ledger"),
        (status = 503, description = "Servidor encerrando, consulta cancelada"),
        (status = 504, description = "Consulta excedeu o tempo limite")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_stats(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<DashboardStatsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params = parse_query(query)?;
    params.validate()?;

    tracing::info!("Dashboard stats solicitado por {}", user.0.sub);

    let stats = app_state
        .dashboard_service
        .get_stats(&app_state.query_scope(), app_state.now(), params.year, params.month)
        .await?;

    Ok((StatusCode::OK, Json(stats)))
}

// GET /api/dashboard/revenue
#[utoipa::path(
    get,
    path = "/api/dashboard/revenue",
    tag = "Dashboard",
    params(RevenueSeriesQuery),
    responses(
        (status = 200, description = "Receita mensal concluída, um item por mês (meses sem venda = 0)", body = Vec<RevenueBucket>),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autorizado"),
        (status = 500, description = "Falha ao consultar o ledger"),
        (status = 503, description = "Servidor encerrando, consulta cancelada"),
        (status = 504, description = "Consulta excedeu o tempo limite")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_revenue_series(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    locale: Locale,
    query: Result<Query<RevenueSeriesQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params = parse_query(query)?;
    params.validate()?;

    tracing::info!("Série de receita solicitada por {}", user.0.sub);

    let series = app_state
        .dashboard_service
        .get_revenue_series(&app_state.query_scope(), app_state.now(), params.months, &locale.0)
        .await?;

    Ok((StatusCode::OK, Json(series)))
}

// GET /api/dashboard/top-products
#[utoipa::path(
    get,
    path = "/api/dashboard/top-products",
    tag = "Dashboard",
    params(TopProductsQuery),
    responses(
        (status = 200, description = "Ranking dos produtos mais vendidos (unidades)", body = Vec<RankedProduct>),
        (status = 400, description = "Parâmetros inválidos"),
        (status = 401, description = "Não autorizado"),
        (status = 500, description = "Falha ao consultar o ledger"),
        (status = 503, description = "Servidor encerrando, consulta cancelada"),
        (status = 504, description = "Consulta excedeu o tempo limite")
    ),
    security(
        ("api_jwt" = [])
    )
)]
pub async fn get_top_products(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    query: Result<Query<TopProductsQuery>, QueryRejection>,
) -> Result<impl IntoResponse, AppError> {
    let params = parse_query(query)?;
    params.validate()?;

    tracing::info!("Top produtos solicitado por {}", user.0.sub);

    let products = app_state
        .dashboard_service
        .get_top_products(&app_state.query_scope(), params.limit)
        .await?;

    Ok((StatusCode::OK, Json(products)))
}
